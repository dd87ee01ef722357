// Infrastructure layer - Document loading, settings and output encoders
pub mod alert_file;
pub mod config;
pub mod error;
pub mod manifest;
