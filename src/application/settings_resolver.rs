// Settings resolver - cascades item and group settings down the configuration tree
use crate::domain::config_tree::{
    Column, Dashboard, DisableFlags, Group, GroupSettings, Item, ItemSettings, KIND_STAT, Range,
    Row,
};

pub const DEFAULT_WIDTH: u32 = 2;
pub const DEFAULT_HEIGHT: u32 = 1;
pub const DEFAULT_COLUMNS: u32 = 1;
pub const DEFAULT_SPACING: u32 = 0;

/// Green when healthy, red when down, yellow in between.
pub fn default_ranges() -> Vec<Range> {
    vec![
        Range::new(1.0, 1.0, "green", ""),
        Range::new(0.0, 0.0, "red", "critical"),
        Range::new(0.0, 1.0, "yellow", "warning"),
    ]
}

pub fn seed_item_settings() -> ItemSettings {
    ItemSettings {
        kind: KIND_STAT.to_string(),
        flags: DisableFlags::default(),
        service: String::new(),
        datasource_uid: String::new(),
        ranges: default_ranges(),
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
    }
}

pub fn seed_group_settings() -> GroupSettings {
    GroupSettings {
        columns: DEFAULT_COLUMNS,
        spacing: DEFAULT_SPACING,
    }
}

fn or_inherit(own: &str, parent: &str) -> String {
    let value = if own.is_empty() { parent } else { own };
    value.to_string()
}

fn positive_or(own: u32, parent: u32) -> u32 {
    if own > 0 { own } else { parent }
}

impl ItemSettings {
    /// Merge `parent` beneath these settings: unset fields take the parent's
    /// value and disable flags are OR-ed in.
    pub fn inherit(&self, parent: &ItemSettings) -> ItemSettings {
        ItemSettings {
            kind: or_inherit(&self.kind, &parent.kind),
            flags: self.flags | parent.flags,
            service: or_inherit(&self.service, &parent.service),
            datasource_uid: or_inherit(&self.datasource_uid, &parent.datasource_uid),
            ranges: if self.ranges.is_empty() {
                parent.ranges.clone()
            } else {
                self.ranges.clone()
            },
            width: positive_or(self.width, parent.width),
            height: positive_or(self.height, parent.height),
        }
    }
}

impl GroupSettings {
    pub fn inherit(&self, parent: &GroupSettings) -> GroupSettings {
        GroupSettings {
            columns: positive_or(self.columns, parent.columns),
            spacing: positive_or(self.spacing, parent.spacing),
        }
    }
}

/// Produce a copy of `dashboard` whose every node carries complete settings.
pub fn resolve(dashboard: &Dashboard) -> Dashboard {
    let items = dashboard.default_item_settings.inherit(&seed_item_settings());
    let groups = dashboard
        .default_group_settings
        .inherit(&seed_group_settings());

    let rows: Vec<Row> = dashboard
        .rows
        .iter()
        .map(|row| resolve_row(row, &items, &groups))
        .collect();

    tracing::debug!(
        "Resolved dashboard {} with {} rows and {} items",
        dashboard.uid,
        rows.len(),
        dashboard.items().count()
    );

    Dashboard {
        default_item_settings: items,
        default_group_settings: groups,
        rows,
        ..dashboard.clone()
    }
}

fn resolve_row(row: &Row, items: &ItemSettings, groups: &GroupSettings) -> Row {
    let item_settings = row.item_settings.inherit(items);
    let group_settings = row.group_settings.inherit(groups);
    let columns = row
        .columns
        .iter()
        .map(|column| resolve_column(column, &item_settings, &group_settings))
        .collect();

    Row {
        title: row.title.clone(),
        item_settings,
        group_settings,
        columns,
    }
}

fn resolve_column(column: &Column, items: &ItemSettings, groups: &GroupSettings) -> Column {
    let item_settings = column.item_settings.inherit(items);
    let group_settings = column.group_settings.inherit(groups);
    let groups = column
        .groups
        .iter()
        .map(|group| resolve_group(group, &item_settings, &group_settings))
        .collect();

    Column {
        title: column.title.clone(),
        item_settings,
        group_settings,
        groups,
    }
}

fn resolve_group(group: &Group, items: &ItemSettings, groups: &GroupSettings) -> Group {
    let item_settings = group.item_settings.inherit(items);
    let group_settings = group.group_settings.inherit(groups);
    let items = group
        .items
        .iter()
        .map(|item| Item {
            settings: item.settings.inherit(&item_settings),
            ..item.clone()
        })
        .collect();

    Group {
        title: group.title.clone(),
        item_settings,
        group_settings,
        items,
    }
}
