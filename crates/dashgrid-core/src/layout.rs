//! Arrangement data model and its JSON form.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Prefix of generated widget ids (`widget-<N>`).
pub const WIDGET_ID_PREFIX: &str = "widget-";

/// Largest right or bottom edge, in grid cells, a widget may reach.
pub const MAX_GRID_EXTENT: u32 = 10_000;

/// Errors raised when an arrangement fails structural validation.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Malformed layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate widget id: {0}")]
    DuplicateId(String),
    #[error("Widget {0} has zero width or height")]
    EmptyWidget(String),
    #[error("Widget {0} extends past the grid limit of {limit} cells", limit = MAX_GRID_EXTENT)]
    OutOfBounds(String),
}

/// One widget instance placed on the grid.
///
/// `id` and `type_id` never change after creation; position and size follow
/// drags and resizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedWidget {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Registry type id. May name a kind this build does not know.
    #[serde(rename = "widgetType")]
    pub type_id: String,
}

impl PlacedWidget {
    pub fn new(
        id: impl Into<String>,
        type_id: impl Into<String>,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
    ) -> Self {
        Self {
            id: id.into(),
            type_id: type_id.into(),
            x,
            y,
            w,
            h,
        }
    }

    /// Exclusive right edge, in columns.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge, in rows.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    fn check(&self) -> Result<(), LayoutError> {
        if self.w == 0 || self.h == 0 {
            return Err(LayoutError::EmptyWidget(self.id.clone()));
        }
        let fits = |start: u32, span: u32| {
            start.checked_add(span).is_some_and(|end| end <= MAX_GRID_EXTENT)
        };
        if !fits(self.x, self.w) || !fits(self.y, self.h) {
            return Err(LayoutError::OutOfBounds(self.id.clone()));
        }
        Ok(())
    }

    /// Whether the two cell rectangles share at least one cell.
    pub fn overlaps(&self, other: &PlacedWidget) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Ordered list of placed widgets describing a whole dashboard.
///
/// Order is insertion order and drives rendering order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arrangement {
    widgets: Vec<PlacedWidget>,
}

impl Arrangement {
    /// Create an empty arrangement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arrangement, rejecting duplicate ids and empty widgets.
    pub fn from_widgets(widgets: Vec<PlacedWidget>) -> Result<Self, LayoutError> {
        let arrangement = Self { widgets };
        arrangement.validate()?;
        Ok(arrangement)
    }

    /// Check the structural invariants: unique ids, non-empty widgets and
    /// edges within [`MAX_GRID_EXTENT`].
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        for widget in &self.widgets {
            if !seen.insert(widget.id.as_str()) {
                return Err(LayoutError::DuplicateId(widget.id.clone()));
            }
            widget.check()?;
        }
        Ok(())
    }

    /// Serialize to the persisted JSON array form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse and validate the persisted JSON array form.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let arrangement: Arrangement = serde_json::from_str(json)?;
        arrangement.validate()?;
        Ok(arrangement)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedWidget> {
        self.widgets.iter()
    }

    pub fn widgets(&self) -> &[PlacedWidget] {
        &self.widgets
    }

    /// Mutable access to positions and sizes. The slice cannot grow or shrink.
    pub(crate) fn widgets_mut(&mut self) -> &mut [PlacedWidget] {
        &mut self.widgets
    }

    pub fn get(&self, id: &str) -> Option<&PlacedWidget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append a widget. Fails if its id is already present.
    pub fn push(&mut self, widget: PlacedWidget) -> Result<(), LayoutError> {
        if self.contains(&widget.id) {
            return Err(LayoutError::DuplicateId(widget.id));
        }
        widget.check()?;
        self.widgets.push(widget);
        Ok(())
    }

    /// Remove a widget by id, returning it.
    pub fn remove(&mut self, id: &str) -> Option<PlacedWidget> {
        let index = self.widgets.iter().position(|w| w.id == id)?;
        Some(self.widgets.remove(index))
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
    }

    /// Whether both arrangements hold the same widgets, ignoring order.
    pub fn same_widgets(&self, other: &Arrangement) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mine: HashSet<&PlacedWidget> = self.widgets.iter().collect();
        other.widgets.iter().all(|w| mine.contains(w))
    }

    /// Number of grid rows spanned by the arrangement.
    pub fn rows(&self) -> u32 {
        self.widgets.iter().map(PlacedWidget::bottom).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Arrangement {
    type Item = &'a PlacedWidget;
    type IntoIter = std::slice::Iter<'a, PlacedWidget>;

    fn into_iter(self) -> Self::IntoIter {
        self.widgets.iter()
    }
}

/// Format a generated widget id.
pub fn widget_id(n: u32) -> String {
    format!("{WIDGET_ID_PREFIX}{n}")
}

/// Extract `N` from an id of the form `widget-<N>`.
pub fn parse_widget_id(id: &str) -> Option<u32> {
    let digits = id.strip_prefix(WIDGET_ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Next free widget counter: one past the largest `widget-<N>` id, or `0`.
///
/// Removed ids are never handed out again as long as a larger one remains.
/// Saturates at `u32::MAX`; a session seeded there refuses to generate ids.
pub fn next_widget_id(arrangement: &Arrangement) -> u32 {
    arrangement
        .iter()
        .filter_map(|w| parse_widget_id(&w.id))
        .map(|n| n.saturating_add(1))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(id: &str, type_id: &str) -> PlacedWidget {
        PlacedWidget::new(id, type_id, 0, 0, 4, 4)
    }

    #[test]
    fn test_json_uses_widget_type_key() {
        let arrangement = Arrangement::from_widgets(vec![widget("widget-0", "lineChart")]).unwrap();
        let json = arrangement.to_json().unwrap();
        assert_eq!(
            json,
            r#"[{"id":"widget-0","x":0,"y":0,"w":4,"h":4,"widgetType":"lineChart"}]"#
        );
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let json = r#"[
            {"id":"widget-0","x":0,"y":0,"w":4,"h":4,"widgetType":"lineChart"},
            {"id":"widget-0","x":4,"y":0,"w":4,"h":4,"widgetType":"barChart"}
        ]"#;
        assert!(matches!(
            Arrangement::from_json(json),
            Err(LayoutError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        assert!(matches!(
            Arrangement::from_json(r#"{"id":"widget-0"}"#),
            Err(LayoutError::Json(_))
        ));
        assert!(matches!(
            Arrangement::from_json(r#"[{"id":"widget-0","x":-1,"y":0,"w":4,"h":4,"widgetType":"metrics"}]"#),
            Err(LayoutError::Json(_))
        ));
        assert!(matches!(
            Arrangement::from_json(r#"[{"id":"widget-0","x":0,"y":0,"w":0,"h":4,"widgetType":"metrics"}]"#),
            Err(LayoutError::EmptyWidget(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_edges_past_the_limit() {
        let overflowing = r#"[{"id":"widget-0","x":0,"y":4294967295,"w":4,"h":4,"widgetType":"lineChart"}]"#;
        assert!(matches!(
            Arrangement::from_json(overflowing),
            Err(LayoutError::OutOfBounds(_))
        ));
        let too_wide = r#"[{"id":"widget-0","x":9999,"y":0,"w":2,"h":1,"widgetType":"lineChart"}]"#;
        assert!(matches!(
            Arrangement::from_json(too_wide),
            Err(LayoutError::OutOfBounds(_))
        ));
        let at_limit = r#"[{"id":"widget-0","x":0,"y":9996,"w":4,"h":4,"widgetType":"lineChart"}]"#;
        assert_eq!(Arrangement::from_json(at_limit).unwrap().rows(), MAX_GRID_EXTENT);
    }

    #[test]
    fn test_edges_saturate() {
        let widget = PlacedWidget::new("widget-0", "metrics", u32::MAX, u32::MAX, 4, 4);
        assert_eq!(widget.right(), u32::MAX);
        assert_eq!(widget.bottom(), u32::MAX);
        assert!(Arrangement::new().push(widget).is_err());
    }

    #[test]
    fn test_next_widget_id_saturates_at_max() {
        let arrangement = Arrangement::from_widgets(vec![widget("widget-4294967295", "metrics")]).unwrap();
        assert_eq!(next_widget_id(&arrangement), u32::MAX);
    }

    #[test]
    fn test_next_widget_id() {
        let arrangement = Arrangement::from_widgets(vec![
            widget("widget-0", "lineChart"),
            widget("widget-3", "barChart"),
            widget("widget-7", "metrics"),
        ])
        .unwrap();
        assert_eq!(next_widget_id(&arrangement), 8);
    }

    #[test]
    fn test_next_widget_id_empty() {
        assert_eq!(next_widget_id(&Arrangement::new()), 0);
    }

    #[test]
    fn test_next_widget_id_ignores_foreign_ids() {
        let arrangement = Arrangement::from_widgets(vec![
            widget("custom", "lineChart"),
            widget("widget-", "barChart"),
            widget("widget-x1", "metrics"),
        ])
        .unwrap();
        assert_eq!(next_widget_id(&arrangement), 0);
    }

    #[test]
    fn test_same_widgets_ignores_order() {
        let a = Arrangement::from_widgets(vec![
            widget("widget-0", "lineChart"),
            widget("widget-1", "barChart"),
        ])
        .unwrap();
        let b = Arrangement::from_widgets(vec![
            widget("widget-1", "barChart"),
            widget("widget-0", "lineChart"),
        ])
        .unwrap();
        assert!(a.same_widgets(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_push_and_remove() {
        let mut arrangement = Arrangement::new();
        arrangement.push(widget("widget-0", "lineChart")).unwrap();
        assert!(arrangement.push(widget("widget-0", "barChart")).is_err());
        assert_eq!(arrangement.remove("widget-0").unwrap().type_id, "lineChart");
        assert!(arrangement.is_empty());
    }

    #[test]
    fn test_overlaps() {
        let a = PlacedWidget::new("a", "metrics", 0, 0, 4, 4);
        let b = PlacedWidget::new("b", "metrics", 4, 0, 4, 4);
        let c = PlacedWidget::new("c", "metrics", 3, 3, 2, 2);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }
}
