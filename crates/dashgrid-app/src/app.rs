//! Application state: the mode controller, the status line and the data
//! each visible widget renders.

use std::collections::HashMap;

use dashgrid_core::{
    select_source, summarize, ControllerError, DashboardConfig, DataSource, LayoutStore, Mode,
    ModeController, Storage, WidgetKind, WidgetRegistry,
};
use egui::Context;

use crate::ui::{render_ui, UiAction, UiState};

/// Data fetched for one widget kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetData {
    /// One-line summary of the payload.
    Ready(String),
    /// The fetch or shaping error. Only the widget shows it.
    Failed(String),
}

impl WidgetData {
    pub fn text(&self) -> &str {
        match self {
            WidgetData::Ready(text) | WidgetData::Failed(text) => text,
        }
    }
}

/// Dashboard application.
pub struct DashboardApp<S: Storage> {
    controller: ModeController<S>,
    source: Box<dyn DataSource>,
    /// ISO date the calendar counts from.
    today: String,
    /// Fetched once per kind and kept for the app's lifetime.
    data: HashMap<WidgetKind, WidgetData>,
    /// Outcome of the last action, shown in the mode bar.
    status: Option<String>,
    confirm_clear: bool,
}

impl<S: Storage> DashboardApp<S> {
    /// Create an app reading widget data from the source `config` selects.
    pub fn new(store: LayoutStore<S>, config: DashboardConfig) -> Self {
        Self::with_remote_source(store, config, None)
    }

    /// Create an app that uses `remote` when the config asks for the
    /// remote data source.
    pub fn with_remote_source(
        store: LayoutStore<S>,
        config: DashboardConfig,
        remote: Option<Box<dyn DataSource>>,
    ) -> Self {
        let source = select_source(config.data_source, remote);
        let controller = ModeController::new(store, WidgetRegistry::builtin(), config);
        log::info!(
            "Dashboard loaded with {} saved widgets",
            controller.current().len()
        );
        Self {
            controller,
            source,
            today: dashgrid_core::today(),
            data: HashMap::new(),
            status: None,
            confirm_clear: false,
        }
    }

    pub fn controller(&self) -> &ModeController<S> {
        &self.controller
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_confirming_clear(&self) -> bool {
        self.confirm_clear
    }

    /// Data shown for `kind`, if it has been fetched.
    pub fn widget_data(&self, kind: WidgetKind) -> Option<&WidgetData> {
        self.data.get(&kind)
    }

    /// Draw one frame and apply whatever the user did.
    pub fn show(&mut self, ctx: &Context) {
        self.load_visible_data();
        let state = UiState {
            status: self.status.as_deref(),
            confirm_clear: self.confirm_clear,
            data: Some(&self.data),
        };
        if let Some(action) = render_ui(ctx, &self.controller, state) {
            self.apply(action);
        }
    }

    /// Fetch data for every kind on screen that has none yet.
    fn load_visible_data(&mut self) {
        let registry = self.controller.registry();
        let kinds: Vec<WidgetKind> = match self.controller.working() {
            Some(working) => working
                .iter()
                .filter_map(|w| registry.resolve(&w.type_id).map(|d| d.kind))
                .collect(),
            None => self
                .controller
                .render_view()
                .cells
                .iter()
                .map(|c| c.kind)
                .collect(),
        };

        for kind in kinds {
            if self.data.contains_key(&kind) {
                continue;
            }
            let data = match self
                .source
                .fetch(kind)
                .and_then(|payload| summarize(kind, &payload, &self.today))
            {
                Ok(line) => WidgetData::Ready(line),
                Err(e) => {
                    log::warn!("No data for {:?}: {}", kind, e);
                    WidgetData::Failed(e.to_string())
                }
            };
            self.data.insert(kind, data);
        }
    }

    /// Apply a UI action. Failures end up in the status line, never in a panic.
    pub fn apply(&mut self, action: UiAction) {
        log::debug!("UI action: {:?}", action);
        if action != UiAction::Clear {
            self.confirm_clear = false;
        }
        let result = match action {
            UiAction::ToggleEdit => {
                self.controller.toggle();
                self.status = None;
                Ok(())
            }
            UiAction::Save => self.controller.save().map(|()| {
                self.status = Some("Layout saved".to_string());
            }),
            UiAction::Clear => {
                if self.controller.is_editing() {
                    self.confirm_clear = true;
                    Ok(())
                } else {
                    Err(ControllerError::NotEditing)
                }
            }
            UiAction::ConfirmClear => self.controller.clear(),
            UiAction::DismissClear => Ok(()),
            UiAction::Cancel => self.controller.cancel().map(|()| {
                self.status = None;
            }),
            UiAction::AddWidget(kind) => self
                .controller
                .add_widget(kind.type_id())
                .map(|added| {
                    if added.is_none() {
                        log::warn!("Widget {:?} was not added", kind);
                    }
                }),
            UiAction::Move { id, x, y } => self.controller.move_widget(&id, x, y),
            UiAction::Resize { id, w, h } => self.controller.resize_widget(&id, w, h),
            UiAction::Remove(id) => self.controller.remove_widget(&id).map(|_| ()),
        };

        if let Err(e) = result {
            log::warn!("{}", e);
            self.status = Some(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashgrid_core::{Arrangement, MemoryStorage, SourceError, SourceMode};
    use serde_json::Value;
    use std::sync::Arc;

    const KEY: &str = "dashboardLayout";

    fn app() -> (DashboardApp<MemoryStorage>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = LayoutStore::new(Arc::clone(&storage), KEY);
        (DashboardApp::new(store, DashboardConfig::default()), storage)
    }

    fn stored(storage: &MemoryStorage) -> Arrangement {
        let raw = storage.read(KEY).unwrap().unwrap();
        Arrangement::from_json(&raw).unwrap()
    }

    #[test]
    fn test_add_and_save_through_actions() {
        let (mut app, storage) = app();
        app.apply(UiAction::ToggleEdit);
        assert_eq!(app.mode(), Mode::Edit);

        app.apply(UiAction::AddWidget(WidgetKind::LineChart));
        app.apply(UiAction::AddWidget(WidgetKind::DataTable));
        app.apply(UiAction::Save);

        assert_eq!(app.mode(), Mode::View);
        assert_eq!(app.status(), Some("Layout saved"));
        let saved = stored(&storage);
        assert_eq!(saved.len(), 2);
        assert_eq!(saved.widgets()[0].id, "widget-0");
        assert_eq!(saved.widgets()[1].type_id, "dataTable");
    }

    #[test]
    fn test_failed_save_reports_status_and_keeps_editing() {
        let (mut app, storage) = app();
        app.apply(UiAction::ToggleEdit);
        app.apply(UiAction::AddWidget(WidgetKind::Weather));
        storage.set_quota(Some(2)).unwrap();

        app.apply(UiAction::Save);

        assert_eq!(app.mode(), Mode::Edit);
        assert!(app.status().unwrap().starts_with("Failed to save layout"));
        assert_eq!(app.controller().working().unwrap().len(), 1);
    }

    #[test]
    fn test_grid_actions_outside_edit_mode_report_status() {
        let (mut app, _) = app();
        app.apply(UiAction::Remove("widget-0".to_string()));
        assert_eq!(app.mode(), Mode::View);
        assert_eq!(app.status(), Some("Dashboard is not in edit mode"));
    }

    #[test]
    fn test_toggle_from_edit_discards_changes() {
        let (mut app, storage) = app();
        app.apply(UiAction::ToggleEdit);
        app.apply(UiAction::AddWidget(WidgetKind::Metrics));
        app.apply(UiAction::ToggleEdit);

        assert_eq!(app.mode(), Mode::View);
        assert!(app.controller().current().is_empty());
        assert!(storage.read(KEY).unwrap().is_none());
    }

    #[test]
    fn test_move_and_remove_by_id() {
        let (mut app, _) = app();
        app.apply(UiAction::ToggleEdit);
        app.apply(UiAction::AddWidget(WidgetKind::PieChart));
        app.apply(UiAction::AddWidget(WidgetKind::Calendar));

        app.apply(UiAction::Move {
            id: "widget-1".to_string(),
            x: 0,
            y: 8,
        });
        app.apply(UiAction::Remove("widget-0".to_string()));

        let working = app.controller().working().unwrap();
        assert_eq!(working.len(), 1);
        let calendar = working.get("widget-1").unwrap();
        assert_eq!((calendar.x, calendar.y), (0, 8));
        assert_eq!(app.status(), None);
    }

    #[test]
    fn test_headless_frames_in_both_modes() {
        let (mut app, _) = app();
        let ctx = egui::Context::default();

        let _ = ctx.run(egui::RawInput::default(), |ctx| app.show(ctx));
        assert_eq!(app.mode(), Mode::View);

        app.apply(UiAction::ToggleEdit);
        app.apply(UiAction::AddWidget(WidgetKind::StockMarket));
        let _ = ctx.run(egui::RawInput::default(), |ctx| app.show(ctx));
        assert_eq!(app.mode(), Mode::Edit);
        assert_eq!(app.controller().working().unwrap().len(), 1);
    }

    struct FailingSource;

    impl DataSource for FailingSource {
        fn fetch(&self, _kind: WidgetKind) -> Result<Value, SourceError> {
            Err(SourceError::Fetch("503 Service Unavailable".to_string()))
        }
    }

    const SAVED: &str = r#"[{"id":"widget-0","x":0,"y":0,"w":3,"h":4,"widgetType":"weather"},
                            {"id":"widget-1","x":3,"y":0,"w":4,"h":4,"widgetType":"lineChart"}]"#;

    #[test]
    fn test_visible_widgets_get_fixture_summaries() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(KEY, SAVED).unwrap();
        let mut app = DashboardApp::new(
            LayoutStore::new(Arc::clone(&storage), KEY),
            DashboardConfig::default(),
        );

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| app.show(ctx));

        assert_eq!(
            app.widget_data(WidgetKind::Weather),
            Some(&WidgetData::Ready("Lisbon 19.6°C, few clouds, 64% humidity".to_string()))
        );
        assert!(matches!(
            app.widget_data(WidgetKind::LineChart),
            Some(WidgetData::Ready(_))
        ));
        assert_eq!(app.widget_data(WidgetKind::Calendar), None);
    }

    #[test]
    fn test_failing_source_stays_local_to_widgets() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(KEY, SAVED).unwrap();
        let config = DashboardConfig {
            data_source: SourceMode::Remote,
            ..DashboardConfig::default()
        };
        let mut app = DashboardApp::with_remote_source(
            LayoutStore::new(Arc::clone(&storage), KEY),
            config,
            Some(Box::new(FailingSource)),
        );
        let before = app.controller().current().clone();

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| app.show(ctx));

        assert_eq!(
            app.widget_data(WidgetKind::Weather),
            Some(&WidgetData::Failed("Fetch failed: 503 Service Unavailable".to_string()))
        );
        assert_eq!(app.mode(), Mode::View);
        assert_eq!(app.status(), None);
        assert_eq!(app.controller().current(), &before);
        assert_eq!(app.controller().render_view().cells.len(), 2);
        assert_eq!(storage.read(KEY).unwrap().as_deref(), Some(SAVED));
    }

    #[test]
    fn test_clear_waits_for_confirmation() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(KEY, SAVED).unwrap();
        let mut app = DashboardApp::new(
            LayoutStore::new(Arc::clone(&storage), KEY),
            DashboardConfig::default(),
        );
        app.apply(UiAction::ToggleEdit);

        app.apply(UiAction::Clear);
        assert!(app.is_confirming_clear());
        assert_eq!(app.controller().working().unwrap().len(), 2);

        app.apply(UiAction::DismissClear);
        assert!(!app.is_confirming_clear());
        assert_eq!(app.controller().working().unwrap().len(), 2);

        app.apply(UiAction::Clear);
        app.apply(UiAction::ConfirmClear);
        assert!(!app.is_confirming_clear());
        assert!(app.controller().working().unwrap().is_empty());
        assert_eq!(app.mode(), Mode::Edit);
        assert_eq!(storage.read(KEY).unwrap().as_deref(), Some(SAVED));

        // Leaving edit mode drops a pending confirmation
        app.apply(UiAction::Clear);
        app.apply(UiAction::Cancel);
        assert!(!app.is_confirming_clear());
        assert_eq!(app.controller().current().len(), 2);
    }

    #[test]
    fn test_clear_outside_edit_mode_reports_status() {
        let (mut app, _) = app();
        app.apply(UiAction::Clear);
        assert!(!app.is_confirming_clear());
        assert_eq!(app.status(), Some("Dashboard is not in edit mode"));
    }
}
