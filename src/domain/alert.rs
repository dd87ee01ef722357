// Alerting rule domain model
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertGroups {
    pub groups: Vec<AlertGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertGroup {
    pub name: String,
    pub interval: String,
    pub rules: Vec<AlertRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRule {
    pub alert: String,
    pub expr: String,
    #[serde(rename = "for")]
    pub for_duration: String,
    pub labels: AlertLabels,
    pub annotations: AlertAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertLabels {
    pub severity: String,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertAnnotations {
    pub summary: String,
}

impl AlertGroup {
    pub fn new(name: String, interval: &str) -> Self {
        Self {
            name,
            interval: interval.to_string(),
            rules: Vec::new(),
        }
    }
}
