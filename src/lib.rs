// Dashboard layout and alert rule generation engine
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
