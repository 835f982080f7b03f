//! Read-only view of a saved arrangement.
//!
//! Reconciles an [`Arrangement`] against the registry: every entry whose type
//! resolves becomes a [`ViewCell`], in arrangement order; the rest are left
//! out without error.

use crate::layout::Arrangement;
use crate::registry::{WidgetKind, WidgetRegistry};

/// One widget as it appears in view mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCell {
    pub id: String,
    pub kind: WidgetKind,
    pub title: &'static str,
    pub icon: &'static str,
    pub render_target: &'static str,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl ViewCell {
    /// CSS `grid-column` placement (1-based start, span).
    pub fn grid_column(&self) -> String {
        format!("{} / span {}", self.x.saturating_add(1), self.w)
    }

    /// CSS `grid-row` placement (1-based start, span).
    pub fn grid_row(&self) -> String {
        format!("{} / span {}", self.y.saturating_add(1), self.h)
    }
}

/// The cells to draw in view mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRender {
    pub cells: Vec<ViewCell>,
    /// Entries left out because their type is unknown.
    pub skipped: usize,
}

impl ViewRender {
    /// Reconcile `arrangement` against `registry`.
    pub fn build(arrangement: &Arrangement, registry: &WidgetRegistry) -> Self {
        let mut render = ViewRender::default();
        for item in arrangement {
            let Some(descriptor) = registry.resolve(&item.type_id) else {
                log::debug!("Not rendering {}: unknown type '{}'", item.id, item.type_id);
                render.skipped += 1;
                continue;
            };
            render.cells.push(ViewCell {
                id: item.id.clone(),
                kind: descriptor.kind,
                title: descriptor.title,
                icon: descriptor.icon,
                render_target: descriptor.render_target,
                x: item.x,
                y: item.y,
                w: item.w,
                h: item.h,
            });
        }
        render
    }

    /// Render targets in drawing order.
    pub fn render_targets(&self) -> Vec<&'static str> {
        self.cells.iter().map(|c| c.render_target).collect()
    }

    /// Rows needed to show every cell.
    pub fn rows(&self) -> u32 {
        self.cells.iter().map(|c| c.y.saturating_add(c.h)).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PlacedWidget;

    #[test]
    fn test_unknown_type_is_omitted() {
        let arrangement = Arrangement::from_widgets(vec![
            PlacedWidget::new("widget-0", "lineChart", 0, 0, 4, 4),
            PlacedWidget::new("widget-1", "doesNotExist", 4, 0, 4, 4),
            PlacedWidget::new("widget-2", "weather", 8, 0, 3, 4),
        ])
        .unwrap();

        let render = ViewRender::build(&arrangement, &WidgetRegistry::builtin());
        assert_eq!(render.render_targets(), vec!["line-chart-widget", "weather-widget"]);
        assert_eq!(render.skipped, 1);
    }

    #[test]
    fn test_follows_arrangement_order_not_position() {
        let arrangement = Arrangement::from_widgets(vec![
            PlacedWidget::new("b", "barChart", 0, 8, 4, 4),
            PlacedWidget::new("a", "pieChart", 0, 0, 4, 4),
        ])
        .unwrap();
        let render = ViewRender::build(&arrangement, &WidgetRegistry::builtin());
        let ids: Vec<_> = render.cells.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(render.rows(), 12);
    }

    #[test]
    fn test_css_placement() {
        let arrangement =
            Arrangement::from_widgets(vec![PlacedWidget::new("widget-0", "dataTable", 2, 3, 6, 5)]).unwrap();
        let render = ViewRender::build(&arrangement, &WidgetRegistry::builtin());
        let cell = &render.cells[0];
        assert_eq!(cell.grid_column(), "3 / span 6");
        assert_eq!(cell.grid_row(), "4 / span 5");
        assert_eq!(cell.title, "Data Table");
    }

    #[test]
    fn test_placement_saturates_at_the_edge() {
        let cell = ViewCell {
            id: "widget-0".to_string(),
            kind: WidgetKind::LineChart,
            title: "Line Chart",
            icon: "",
            render_target: "line-chart-widget",
            x: u32::MAX,
            y: u32::MAX,
            w: 4,
            h: 4,
        };
        assert_eq!(cell.grid_column(), format!("{} / span 4", u32::MAX));
        let render = ViewRender {
            cells: vec![cell],
            skipped: 0,
        };
        assert_eq!(render.rows(), u32::MAX);
    }
}
