use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode dashboard document: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("invalid range [{min}, {max}] on {owner}: bounds must be finite with min <= max")]
    InvalidRange { owner: String, min: f64, max: f64 },

    #[error("failed to load generator settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("failed to encode dashboard manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("failed to encode alert rules: {0}")]
    Alerts(#[source] serde_yaml::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
