//! UI rendering: mode bar, toolbox and grid board.

use std::collections::HashMap;

use dashgrid_core::{DashboardConfig, ModeController, Storage, WidgetKind};
use dashgrid_widgets::{
    section_label, GridBoard, GridCell, GridEvent, GridStyle, ModeBar, ModeBarAction, Toolbox,
    ToolboxEntry,
};
use egui::Context;

use crate::app::WidgetData;

/// Actions that can be triggered from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Enter edit mode, or leave it without saving.
    ToggleEdit,
    /// Persist the working copy and return to view mode.
    Save,
    /// Ask for confirmation before emptying the grid.
    Clear,
    /// Empty the grid (unsaved).
    ConfirmClear,
    /// Close the clear confirmation without touching the grid.
    DismissClear,
    /// Discard unsaved changes and return to view mode.
    Cancel,
    /// Add a widget of the given kind.
    AddWidget(WidgetKind),
    /// Move a widget to a new grid position.
    Move { id: String, x: u32, y: u32 },
    /// Resize a widget.
    Resize { id: String, w: u32, h: u32 },
    /// Remove a widget from the grid.
    Remove(String),
}

impl From<ModeBarAction> for UiAction {
    fn from(action: ModeBarAction) -> Self {
        match action {
            ModeBarAction::ToggleEdit => UiAction::ToggleEdit,
            ModeBarAction::Save => UiAction::Save,
            ModeBarAction::Clear => UiAction::Clear,
            ModeBarAction::ConfirmClear => UiAction::ConfirmClear,
            ModeBarAction::KeepWidgets => UiAction::DismissClear,
            ModeBarAction::Cancel => UiAction::Cancel,
        }
    }
}

/// Grid geometry from the dashboard config.
pub fn grid_style(config: &DashboardConfig) -> GridStyle {
    GridStyle {
        columns: config.columns,
        cell_height: config.cell_height,
        margin: config.margin,
    }
}

/// What the UI shows besides the controller state.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState<'a> {
    /// Outcome of the last action.
    pub status: Option<&'a str>,
    /// The clear confirmation is open.
    pub confirm_clear: bool,
    /// Fetched widget data by kind.
    pub data: Option<&'a HashMap<WidgetKind, WidgetData>>,
}

/// Render the dashboard and return any triggered action.
pub fn render_ui<S: Storage>(
    ctx: &Context,
    controller: &ModeController<S>,
    state: UiState<'_>,
) -> Option<UiAction> {
    let top_action = render_top_bar(ctx, controller, state);
    let board_action = render_board(ctx, controller, state.data);

    // Bar actions change the mode, so they win over grid gestures
    top_action.or(board_action)
}

fn render_top_bar<S: Storage>(
    ctx: &Context,
    controller: &ModeController<S>,
    state: UiState<'_>,
) -> Option<UiAction> {
    let editing = controller.is_editing();
    let mut action = None;

    egui::TopBottomPanel::top("mode_bar").show(ctx, |ui| {
        ui.add_space(6.0);
        let bar = ModeBar::new(editing)
            .confirm_clear(state.confirm_clear)
            .status(state.status);
        if let Some(bar_action) = bar.show(ui) {
            action = Some(bar_action.into());
        }

        if editing {
            ui.add_space(6.0);
            let buttons = controller.registry().toolbox_buttons();
            let entries: Vec<ToolboxEntry<'_, WidgetKind>> = buttons
                .iter()
                .map(|button| ToolboxEntry::new(button.kind, button.label, button.icon))
                .collect();
            if let Some(kind) = Toolbox::new(&entries).show(ui) {
                action = Some(UiAction::AddWidget(kind));
            }
        }
        ui.add_space(6.0);
    });

    action
}

/// Body text for a cell: the fetched summary, the local error, or the
/// render target while nothing has been fetched.
fn cell_body<'a>(
    data: Option<&'a HashMap<WidgetKind, WidgetData>>,
    kind: WidgetKind,
    render_target: &'a str,
) -> &'a str {
    data.and_then(|data| data.get(&kind))
        .map(WidgetData::text)
        .unwrap_or(render_target)
}

fn render_board<S: Storage>(
    ctx: &Context,
    controller: &ModeController<S>,
    data: Option<&HashMap<WidgetKind, WidgetData>>,
) -> Option<UiAction> {
    let style = grid_style(controller.config());
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(working) = controller.working() {
            let registry = controller.registry();
            let (ids, cells): (Vec<String>, Vec<GridCell<'_>>) = working
                .iter()
                .filter_map(|widget| {
                    let descriptor = registry.resolve(&widget.type_id)?;
                    let cell = GridCell {
                        title: descriptor.title,
                        body: cell_body(data, descriptor.kind, descriptor.render_target),
                        x: widget.x,
                        y: widget.y,
                        w: widget.w,
                        h: widget.h,
                    };
                    Some((widget.id.clone(), cell))
                })
                .unzip();

            if cells.is_empty() {
                section_label(ui, "Grid is empty. Pick a widget from the toolbox.");
            }
            let event = GridBoard::new(&cells).style(style).editable(true).show(ui);
            action = event.and_then(|event| event_to_action(event, &ids));
        } else {
            let render = controller.render_view();
            if render.is_empty() {
                section_label(ui, "No widgets yet. Click \"Edit Dashboard\" to add some.");
                return;
            }
            let cells: Vec<GridCell<'_>> = render
                .cells
                .iter()
                .map(|cell| GridCell {
                    title: cell.title,
                    body: cell_body(data, cell.kind, cell.render_target),
                    x: cell.x,
                    y: cell.y,
                    w: cell.w,
                    h: cell.h,
                })
                .collect();
            GridBoard::new(&cells).style(style).show(ui);
        }
    });

    action
}

/// Map a board gesture back to the widget id it concerns.
fn event_to_action(event: GridEvent, ids: &[String]) -> Option<UiAction> {
    match event {
        GridEvent::Moved { index, x, y } => {
            let id = ids.get(index)?.clone();
            Some(UiAction::Move { id, x, y })
        }
        GridEvent::Resized { index, w, h } => {
            let id = ids.get(index)?.clone();
            Some(UiAction::Resize { id, w, h })
        }
        GridEvent::Removed { index } => ids.get(index).cloned().map(UiAction::Remove),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_to_action_maps_index_to_id() {
        let ids = vec!["widget-0".to_string(), "widget-3".to_string()];
        assert_eq!(
            event_to_action(GridEvent::Moved { index: 1, x: 2, y: 5 }, &ids),
            Some(UiAction::Move {
                id: "widget-3".to_string(),
                x: 2,
                y: 5
            })
        );
        assert_eq!(
            event_to_action(GridEvent::Removed { index: 0 }, &ids),
            Some(UiAction::Remove("widget-0".to_string()))
        );
        assert_eq!(event_to_action(GridEvent::Resized { index: 7, w: 1, h: 1 }, &ids), None);
    }

    #[test]
    fn test_cell_body_prefers_fetched_data() {
        let mut data = HashMap::new();
        data.insert(WidgetKind::Weather, WidgetData::Ready("Lisbon 19.6°C".to_string()));
        data.insert(
            WidgetKind::Metrics,
            WidgetData::Failed("Fetch failed: 503".to_string()),
        );

        assert_eq!(cell_body(Some(&data), WidgetKind::Weather, "weather-widget"), "Lisbon 19.6°C");
        assert_eq!(
            cell_body(Some(&data), WidgetKind::Metrics, "metrics-widget"),
            "Fetch failed: 503"
        );
        assert_eq!(cell_body(Some(&data), WidgetKind::Calendar, "calendar-widget"), "calendar-widget");
        assert_eq!(cell_body(None, WidgetKind::Weather, "weather-widget"), "weather-widget");
    }

    #[test]
    fn test_mode_bar_actions_map() {
        assert_eq!(UiAction::from(ModeBarAction::Clear), UiAction::Clear);
        assert_eq!(UiAction::from(ModeBarAction::ConfirmClear), UiAction::ConfirmClear);
        assert_eq!(UiAction::from(ModeBarAction::KeepWidgets), UiAction::DismissClear);
    }

    #[test]
    fn test_grid_style_follows_config() {
        let config = DashboardConfig {
            columns: 6,
            cell_height: 40.0,
            ..DashboardConfig::default()
        };
        let style = grid_style(&config);
        assert_eq!(style.columns, 6);
        assert_eq!(style.cell_height, 40.0);
        assert_eq!(style.margin, 10.0);
    }
}
