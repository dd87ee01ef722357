// Alert rule file encoder
use crate::domain::alert::AlertGroups;
use crate::infrastructure::error::{GeneratorError, Result};
use std::path::Path;

pub fn render_alerts(alerts: &AlertGroups) -> Result<String> {
    serde_yaml::to_string(alerts).map_err(GeneratorError::Alerts)
}

pub fn write_alerts(path: &Path, alerts: &AlertGroups) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| GeneratorError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, render_alerts(alerts)?).map_err(|source| GeneratorError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Wrote alert rules {}", path.display());
    Ok(())
}
