use crate::application::layout_engine::{DEFAULT_BANNER_HEIGHT, DEFAULT_GRID_WIDTH, LayoutOptions};
use crate::domain::config_tree::Dashboard;
use crate::infrastructure::error::{GeneratorError, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_SETTINGS_FILE: &str = "config/generator";
pub const ENV_PREFIX: &str = "DASHGEN";

/// Tool settings; the dashboard document itself is loaded by `load_dashboard`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub grid_width: u32,
    pub banner_height: u32,
    pub manifests_directory: String,
}

impl GeneratorSettings {
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            grid_width: self.grid_width,
            banner_height: self.banner_height,
        }
    }
}

/// Defaults, then an optional settings file, then `DASHGEN_*` variables.
pub fn load_generator_settings(path: Option<&Path>) -> Result<GeneratorSettings> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_SETTINGS_FILE).required(false),
    };

    let settings = config::Config::builder()
        .set_default("grid_width", i64::from(DEFAULT_GRID_WIDTH))?
        .set_default("banner_height", i64::from(DEFAULT_BANNER_HEIGHT))?
        .set_default("manifests_directory", "./resources")?
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn parse_dashboard(document: &str) -> Result<Dashboard> {
    let dashboard: Dashboard = serde_yaml::from_str(document)?;
    dashboard
        .validate()
        .map_err(|violation| GeneratorError::InvalidRange {
            owner: violation.item,
            min: violation.min,
            max: violation.max,
        })?;
    Ok(dashboard)
}

pub fn load_dashboard(path: &Path) -> Result<Dashboard> {
    let document = std::fs::read_to_string(path).map_err(|source| GeneratorError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded dashboard document {}", path.display());
    parse_dashboard(&document)
}
