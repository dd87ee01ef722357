// Domain layer - Configuration tree and generated artifacts
pub mod alert;
pub mod config_tree;
pub mod layout;
