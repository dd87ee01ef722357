// Generator service - Use case for turning one dashboard document into its artifacts
use crate::application::alert_synthesizer::synthesize;
use crate::application::layout_engine::{LayoutOptions, layout};
use crate::application::settings_resolver::resolve;
use crate::domain::alert::AlertGroups;
use crate::domain::config_tree::Dashboard;
use crate::domain::layout::Layout;

#[derive(Debug, Clone)]
pub struct GeneratedArtifacts {
    /// The resolved tree both artifacts were derived from.
    pub dashboard: Dashboard,
    pub layout: Layout,
    pub alerts: AlertGroups,
}

#[derive(Debug, Clone, Default)]
pub struct GeneratorService {
    options: LayoutOptions,
}

impl GeneratorService {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn generate(&self, dashboard: &Dashboard) -> GeneratedArtifacts {
        let resolved = resolve(dashboard);
        let layout = layout(&resolved, &self.options);
        let alerts = AlertGroups {
            groups: vec![synthesize(&resolved)],
        };

        tracing::info!(
            "Generated dashboard {}: {} placements, {} alert rules",
            resolved.uid,
            layout.placements.len(),
            alerts.groups[0].rules.len()
        );

        GeneratedArtifacts {
            dashboard: resolved,
            layout,
            alerts,
        }
    }
}
