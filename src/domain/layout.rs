// Layout domain model - placed elements on the dashboard grid
use super::config_tree::PanelKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GridRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn overlaps(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// A value mapping derived from one configured range.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorMapping {
    Value { value: f64, color: String },
    Range { from: f64, to: f64, color: String },
}

/// Fully resolved display attributes of one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub kind: PanelKind,
    pub title: String,
    pub description: String,
    pub expr: String,
    pub link: String,
    pub datasource_uid: String,
    pub color: String,
    pub mappings: Vec<ColorMapping>,
    pub min: f64,
    pub max: f64,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Banner { content: String },
    Row { title: String },
    Column { title: String },
    Group { title: String },
    Panel(PanelView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub element: Element,
    pub rect: GridRect,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub placements: Vec<Placement>,
}

impl Layout {
    pub fn place(&mut self, element: Element, rect: GridRect) {
        self.placements.push(Placement { element, rect });
    }

    pub fn panels(&self) -> impl Iterator<Item = (&PanelView, GridRect)> {
        self.placements.iter().filter_map(|p| match &p.element {
            Element::Panel(view) => Some((view, p.rect)),
            _ => None,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, GridRect)> {
        self.placements.iter().filter_map(|p| match &p.element {
            Element::Row { title } => Some((title.as_str(), p.rect)),
            _ => None,
        })
    }
}
