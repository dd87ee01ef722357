// Command line entry - wires document loading, generation and output
use crate::application::generator_service::GeneratorService;
use crate::infrastructure::alert_file::write_alerts;
use crate::infrastructure::config::{load_dashboard, load_generator_settings};
use crate::infrastructure::manifest::{dashboard_manifest, render_manifest, write_manifest};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Generate a dashboard manifest and alert rules from a YAML dashboard description"
)]
pub struct Cli {
    /// Dashboard configuration file
    #[arg(long, value_name = "FILE", default_value = "dashboard.yaml")]
    pub config: PathBuf,

    /// Write the manifest to disk instead of printing it
    #[arg(long)]
    pub manifests: bool,

    /// Directory in which the manifests will be generated
    #[arg(long, value_name = "DIR")]
    pub manifests_directory: Option<PathBuf>,

    /// Write the generated alert rules to this file
    #[arg(long, value_name = "FILE")]
    pub alerts: Option<PathBuf>,

    /// Generator settings file (defaults to config/generator.*)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_generator_settings(cli.settings.as_deref())?;
    let dashboard = load_dashboard(&cli.config)
        .with_context(|| format!("Cannot load dashboard {}", cli.config.display()))?;

    let service = GeneratorService::new(settings.layout_options());
    let artifacts = service.generate(&dashboard);

    if let Some(path) = &cli.alerts {
        write_alerts(path, &artifacts.alerts)?;
    }

    if cli.manifests {
        let directory = cli
            .manifests_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(&settings.manifests_directory));
        let manifest =
            dashboard_manifest(&dashboard.folder_uid, &artifacts.dashboard, &artifacts.layout);
        write_manifest(&directory, &dashboard.uid, &manifest)?;
        return Ok(());
    }

    // By default: print the manifest without a folder to stdout.
    let manifest = dashboard_manifest("", &artifacts.dashboard, &artifacts.layout);
    println!("{}", render_manifest(&manifest)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"
title: Platform
uid: platform
folderUid: ops
rows:
  - title: Core
    columns:
      - groups:
          - items: [{ title: api, expr: up, service: web }]
"#;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "dashgen",
            "--config",
            "board.yaml",
            "--manifests",
            "--alerts",
            "rules.yaml",
        ]);
        assert_eq!(cli.config, PathBuf::from("board.yaml"));
        assert!(cli.manifests);
        assert_eq!(cli.alerts, Some(PathBuf::from("rules.yaml")));
        assert_eq!(cli.manifests_directory, None);
    }

    #[test]
    fn test_run_writes_manifest_and_alerts() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("board.yaml");
        std::fs::write(&config, DOCUMENT).unwrap();
        let out = dir.path().join("resources");
        let alerts = dir.path().join("alerts.yaml");

        let cli = Cli {
            config,
            manifests: true,
            manifests_directory: Some(out.clone()),
            alerts: Some(alerts.clone()),
            settings: None,
        };
        run(&cli).unwrap();

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("platform.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["metadata"]["annotations"]["grafana.app/folder"], "ops");

        let rules: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(alerts).unwrap()).unwrap();
        assert_eq!(rules["groups"][0]["rules"].as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_run_fails_on_undecodable_document() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("board.yaml");
        std::fs::write(&config, "rows: {columns: 3}").unwrap();

        let cli = Cli::parse_from(["dashgen", "--config", config.to_str().unwrap()]);
        assert!(run(&cli).is_err());
    }
}
