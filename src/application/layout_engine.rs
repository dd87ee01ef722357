// Layout engine - assigns grid rectangles to rows, columns, groups and panels
use crate::domain::config_tree::{Column, Dashboard, Group, Item, PanelKind, Row};
use crate::domain::layout::{ColorMapping, Element, GridRect, Layout, PanelView, Placement};

pub const DEFAULT_GRID_WIDTH: u32 = 24;
pub const DEFAULT_BANNER_HEIGHT: u32 = 2;
pub const ROW_HEADER_HEIGHT: u32 = 1;

pub const NO_DATA_COLOR: &str = "grey";
pub const DISABLED_COLOR: &str = "rgb(50,50,50)";

const DESCRIPTION_SEPARATOR: &str = "<br>\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    pub grid_width: u32,
    pub banner_height: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            banner_height: DEFAULT_BANNER_HEIGHT,
        }
    }
}

/// Next free position at one nesting level. For columns and groups the
/// returned cursor is the (right, bottom) extent of what was placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    x: u32,
    y: u32,
}

/// Place every element of a resolved dashboard on the grid.
pub fn layout(dashboard: &Dashboard, options: &LayoutOptions) -> Layout {
    let mut out = Layout::default();
    let mut margin = Cursor::default();

    if !dashboard.banner.is_empty() {
        out.place(
            Element::Banner {
                content: dashboard.banner.clone(),
            },
            GridRect::new(0, margin.y, options.grid_width, options.banner_height),
        );
        margin.y = margin.y.saturating_add(options.banner_height);
    }

    if dashboard.dry_run {
        tracing::info!("Dry run for {}: skipping rows", dashboard.uid);
        return out;
    }

    for row in &dashboard.rows {
        margin = layout_row(&mut out, row, margin, options);
    }

    tracing::debug!(
        "Placed {} elements, dashboard height {}",
        out.placements.len(),
        margin.y
    );
    out
}

fn layout_row(out: &mut Layout, row: &Row, margin: Cursor, options: &LayoutOptions) -> Cursor {
    out.place(
        Element::Row {
            title: row.title.clone(),
        },
        GridRect::new(0, margin.y, options.grid_width, ROW_HEADER_HEIGHT),
    );

    let top = margin.y.saturating_add(ROW_HEADER_HEIGHT);
    let mut column_origin = Cursor { x: 0, y: top };
    let mut row_bottom = top;

    for column in &row.columns {
        let extent = layout_column(out, column, column_origin);
        column_origin.x = extent.x;
        row_bottom = row_bottom.max(extent.y);
    }

    Cursor { x: 0, y: row_bottom }
}

fn layout_column(out: &mut Layout, column: &Column, origin: Cursor) -> Cursor {
    let slot = out.placements.len();
    let mut extent = origin;
    let mut group_origin = origin;

    for group in &column.groups {
        let group_extent = layout_group(out, group, group_origin);
        extent.x = extent.x.max(group_extent.x);
        extent.y = extent.y.max(group_extent.y);
        group_origin.y = extent.y;
    }

    out.placements.insert(
        slot,
        Placement {
            element: Element::Column {
                title: column.title.clone(),
            },
            rect: GridRect::new(origin.x, origin.y, extent.x - origin.x, extent.y - origin.y),
        },
    );
    extent
}

/// Row-major packing: panel `i` lands in cell `(i mod columns, i div columns)`.
/// The cell pitch is the largest resolved item size in the group, so an item
/// that overrides its own width or height never overlaps its neighbours.
fn layout_group(out: &mut Layout, group: &Group, origin: Cursor) -> Cursor {
    let cell_width = group
        .items
        .iter()
        .map(|item| item.settings.width)
        .max()
        .unwrap_or(group.item_settings.width);
    let cell_height = group
        .items
        .iter()
        .map(|item| item.settings.height)
        .max()
        .unwrap_or(group.item_settings.height);
    let columns = group.group_settings.columns.max(1);
    let count = u32::try_from(group.items.len()).unwrap_or(u32::MAX);
    let used_columns = columns.min(count);
    // Always one row past the last full row: 4 items in 3 columns need 2 rows,
    // which `(count + 1) / columns` would round down to 1.
    let used_rows = (count / columns).saturating_add(1);
    let group_width = used_columns.saturating_mul(cell_width);
    let group_height = used_rows.saturating_mul(cell_height);

    out.place(
        Element::Group {
            title: group.title.clone(),
        },
        GridRect::new(origin.x, origin.y, group_width, group_height),
    );

    for (index, item) in group.items.iter().enumerate() {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        let rect = GridRect::new(
            origin.x.saturating_add((index % columns).saturating_mul(cell_width)),
            origin.y.saturating_add((index / columns).saturating_mul(cell_height)),
            item.settings.width,
            item.settings.height,
        );

        match PanelKind::parse(&item.settings.kind) {
            PanelKind::Unknown(kind) => {
                tracing::debug!("Skipping panel {} of unknown kind {}", item.title, kind);
            }
            kind => out.place(Element::Panel(panel_view(item, kind)), rect),
        }
    }

    Cursor {
        x: origin
            .x
            .saturating_add(group_width)
            .saturating_add(group.group_settings.spacing),
        y: origin.y.saturating_add(group_height),
    }
}

fn panel_view(item: &Item, kind: PanelKind) -> PanelView {
    let settings = &item.settings;
    let disabled = settings.flags.disabled;

    if disabled {
        return PanelView {
            kind,
            title: String::new(),
            description: String::new(),
            expr: item.expr.clone(),
            link: String::new(),
            datasource_uid: settings.datasource_uid.clone(),
            color: DISABLED_COLOR.to_string(),
            mappings: Vec::new(),
            min: item.min,
            max: item.max,
            disabled,
        };
    }

    let mappings = match kind {
        PanelKind::Stat => settings
            .ranges
            .iter()
            .map(|range| {
                if range.is_point() {
                    ColorMapping::Value {
                        value: range.min,
                        color: range.color.clone(),
                    }
                } else {
                    ColorMapping::Range {
                        from: range.min,
                        to: range.max,
                        color: range.color.clone(),
                    }
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    PanelView {
        kind,
        title: item.title.clone(),
        description: item.description.join(DESCRIPTION_SEPARATOR),
        expr: item.expr.clone(),
        link: item.link.clone(),
        datasource_uid: settings.datasource_uid.clone(),
        color: NO_DATA_COLOR.to_string(),
        mappings,
        min: item.min,
        max: item.max,
        disabled,
    }
}
