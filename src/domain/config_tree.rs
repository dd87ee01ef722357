// Configuration tree domain model
use serde::Deserialize;
use std::ops::BitOr;

pub const KIND_STAT: &str = "stat";
pub const KIND_TIMESERIES: &str = "timeseries";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct TimeRange {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub folder_uid: String,
    #[serde(default)]
    pub time_range: TimeRange,
    #[serde(default)]
    pub refresh: String,
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub default_item_settings: ItemSettings,
    #[serde(default)]
    pub default_group_settings: GroupSettings,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub item_settings: ItemSettings,
    #[serde(default)]
    pub group_settings: GroupSettings,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub item_settings: ItemSettings,
    #[serde(default)]
    pub group_settings: GroupSettings,
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub item_settings: ItemSettings,
    #[serde(default)]
    pub group_settings: GroupSettings,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A leaf panel. Its settings live inline next to the panel fields.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Item {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub expr: String,
    #[serde(default)]
    pub link: String,
    /// Legacy display bounds, superseded by `ranges`.
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(flatten)]
    pub settings: ItemSettings,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Range {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub color: String,
    /// Empty means display-only.
    #[serde(default)]
    pub severity: String,
}

impl Range {
    pub fn new(min: f64, max: f64, color: &str, severity: &str) -> Self {
        Self {
            min,
            max,
            color: color.to_string(),
            severity: severity.to_string(),
        }
    }

    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    pub fn is_alertable(&self) -> bool {
        !self.severity.is_empty()
    }
}

/// Sticky switches: once an ancestor sets one, no descendant can clear it.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DisableFlags {
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub alerting_disabled: bool,
    #[serde(default)]
    pub critical_disabled: bool,
    #[serde(default)]
    pub warning_disabled: bool,
}

impl BitOr for DisableFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            disabled: self.disabled || rhs.disabled,
            alerting_disabled: self.alerting_disabled || rhs.alerting_disabled,
            critical_disabled: self.critical_disabled || rhs.critical_disabled,
            warning_disabled: self.warning_disabled || rhs.warning_disabled,
        }
    }
}

impl DisableFlags {
    /// Whether a range with the given severity may produce an alert.
    pub fn allows_severity(&self, severity: &str) -> bool {
        match severity {
            "critical" => !self.critical_disabled,
            "warning" => !self.warning_disabled,
            _ => true,
        }
    }

    pub fn alerting_off(&self) -> bool {
        self.disabled || self.alerting_disabled
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemSettings {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub flags: DisableFlags,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub datasource_uid: String,
    #[serde(default)]
    pub ranges: Vec<Range>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct GroupSettings {
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub spacing: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelKind {
    Stat,
    TimeSeries,
    Unknown(String),
}

impl PanelKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            KIND_STAT => PanelKind::Stat,
            KIND_TIMESERIES => PanelKind::TimeSeries,
            other => PanelKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PanelKind::Stat => KIND_STAT,
            PanelKind::TimeSeries => KIND_TIMESERIES,
            PanelKind::Unknown(kind) => kind,
        }
    }
}

/// A numeric problem found in an otherwise well-formed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeViolation {
    pub item: String,
    pub min: f64,
    pub max: f64,
}

impl Dashboard {
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.rows
            .iter()
            .flat_map(|r| r.columns.iter())
            .flat_map(|c| c.groups.iter())
            .flat_map(|g| g.items.iter())
    }

    /// Every range must have finite bounds with `min <= max`.
    pub fn validate(&self) -> Result<(), RangeViolation> {
        let level_ranges = std::iter::once(("defaultItemSettings", &self.default_item_settings))
            .chain(self.rows.iter().map(|r| (r.title.as_str(), &r.item_settings)))
            .chain(
                self.rows
                    .iter()
                    .flat_map(|r| r.columns.iter())
                    .map(|c| (c.title.as_str(), &c.item_settings)),
            )
            .chain(
                self.rows
                    .iter()
                    .flat_map(|r| r.columns.iter())
                    .flat_map(|c| c.groups.iter())
                    .map(|g| (g.title.as_str(), &g.item_settings)),
            )
            .chain(self.items().map(|i| (i.title.as_str(), &i.settings)));

        for (owner, settings) in level_ranges {
            for range in &settings.ranges {
                if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                    return Err(RangeViolation {
                        item: owner.to_string(),
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }
        Ok(())
    }
}
