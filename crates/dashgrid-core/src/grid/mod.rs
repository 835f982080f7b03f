//! Interactive grid session used while the dashboard is in edit mode.
//!
//! A [`GridSession`] holds the live placement of widgets and reports the
//! complete arrangement to its change callback after every committed
//! mutation: adds, hydration, clears, drags, resizes and removals. It never
//! touches storage; the owner decides what to persist.

mod packing;

use crate::layout::{parse_widget_id, widget_id, Arrangement, PlacedWidget, MAX_GRID_EXTENT};
use crate::registry::WidgetRegistry;
use thiserror::Error;

/// Receives the full arrangement after each committed change.
pub type ChangeCallback = Box<dyn FnMut(&Arrangement)>;

/// Errors from user interactions on the grid.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("No widget with id {0} on the grid")]
    UnknownWidget(String),
    #[error("Invalid size {w}x{h} for widget {id}")]
    InvalidSize { id: String, w: u32, h: u32 },
}

/// Live grid state for one edit session.
pub struct GridSession {
    registry: WidgetRegistry,
    columns: u32,
    widgets: Arrangement,
    /// Next generated id suffix. Always above every `widget-<N>` seen.
    counter: u32,
    on_change: ChangeCallback,
}

impl GridSession {
    /// Start a session on a `columns`-wide grid.
    ///
    /// `next_id` seeds the id counter, normally from
    /// [`next_widget_id`](crate::layout::next_widget_id) of the loaded layout.
    pub fn new(
        registry: WidgetRegistry,
        columns: u32,
        next_id: u32,
        on_change: impl FnMut(&Arrangement) + 'static,
    ) -> Self {
        Self {
            registry,
            columns: columns.max(1),
            widgets: Arrangement::new(),
            counter: next_id,
            on_change: Box::new(on_change),
        }
    }

    /// Add a widget of `type_id` at the first free slot.
    ///
    /// Returns `None` without touching the grid when the type is unknown or
    /// `explicit_id` is already in use.
    pub fn add_widget(&mut self, type_id: &str, explicit_id: Option<String>) -> Option<PlacedWidget> {
        let Some(descriptor) = self.registry.resolve(type_id).copied() else {
            log::warn!("Ignoring add of unknown widget type '{}'", type_id);
            return None;
        };

        let id = match explicit_id {
            Some(id) if self.widgets.contains(&id) => {
                log::warn!("Ignoring add of duplicate widget id '{}'", id);
                return None;
            }
            Some(id) => {
                self.observe_id(&id);
                id
            }
            None => {
                let Some(next) = self.counter.checked_add(1) else {
                    log::warn!("Widget ids exhausted, not adding '{}'", type_id);
                    return None;
                };
                let id = widget_id(self.counter);
                self.counter = next;
                id
            }
        };

        let w = descriptor.default_width.clamp(1, self.columns);
        let h = descriptor.default_height.max(1);
        let (x, y) = packing::first_fit(self.widgets.widgets(), w, h, self.columns);
        let widget = PlacedWidget::new(id, type_id, x, y, w, h);

        if let Err(e) = self.widgets.push(widget.clone()) {
            log::warn!("Failed to place widget: {}", e);
            return None;
        }
        log::debug!("Added {} ({}) at {},{} size {}x{}", widget.id, type_id, x, y, w, h);
        self.emit();
        Some(widget)
    }

    /// Replace the grid contents with `arrangement`, keeping each entry's id,
    /// position and size. Entries of unknown type are skipped.
    pub fn hydrate(&mut self, arrangement: &Arrangement) {
        self.widgets.clear();

        for item in arrangement {
            self.observe_id(&item.id);
            if self.registry.resolve(&item.type_id).is_none() {
                log::warn!(
                    "Skipping widget {} of unknown type '{}'",
                    item.id,
                    item.type_id
                );
                continue;
            }
            if let Err(e) = self.widgets.push(item.clone()) {
                log::warn!("Skipping widget {}: {}", item.id, e);
            }
        }

        log::debug!("Hydrated grid with {} widgets", self.widgets.len());
        self.emit();
    }

    /// Remove every widget from the grid.
    pub fn clear(&mut self) {
        self.widgets.clear();
        self.emit();
    }

    /// Drag a widget to `(x, y)`. Overlapped widgets are pushed down.
    pub fn move_widget(&mut self, id: &str, x: u32, y: u32) -> Result<(), GridError> {
        let index = self.index_of(id)?;
        let columns = self.columns;
        let slots = self.widgets.widgets_mut();
        let widget = &mut slots[index];
        widget.x = x.min(columns.saturating_sub(widget.w));
        widget.y = y.min(MAX_GRID_EXTENT.saturating_sub(widget.h));

        let pushed = packing::push_down(slots, index);
        log::debug!(
            "Moved {} to {},{}; pushed {:?}",
            id,
            slots[index].x,
            slots[index].y,
            pushed
        );
        self.emit();
        Ok(())
    }

    /// Resize a widget. Width is clamped to the columns right of it.
    pub fn resize_widget(&mut self, id: &str, w: u32, h: u32) -> Result<(), GridError> {
        if w == 0 || h == 0 {
            return Err(GridError::InvalidSize {
                id: id.to_string(),
                w,
                h,
            });
        }
        let index = self.index_of(id)?;
        let columns = self.columns;
        let slots = self.widgets.widgets_mut();
        let widget = &mut slots[index];
        widget.w = w.min(columns.saturating_sub(widget.x)).max(1);
        widget.h = h.min(MAX_GRID_EXTENT.saturating_sub(widget.y)).max(1);

        let pushed = packing::push_down(slots, index);
        log::debug!(
            "Resized {} to {}x{}; pushed {:?}",
            id,
            slots[index].w,
            slots[index].h,
            pushed
        );
        self.emit();
        Ok(())
    }

    /// Remove one widget. Its id is not reused by later adds.
    pub fn remove_widget(&mut self, id: &str) -> Result<PlacedWidget, GridError> {
        let removed = self
            .widgets
            .remove(id)
            .ok_or_else(|| GridError::UnknownWidget(id.to_string()))?;
        log::debug!("Removed {}", id);
        self.emit();
        Ok(removed)
    }

    /// Report the current arrangement without changing it, as the grid does
    /// when a drag ends where it started.
    pub fn commit(&mut self) {
        self.emit();
    }

    /// Current live arrangement.
    pub fn arrangement(&self) -> &Arrangement {
        &self.widgets
    }

    /// Suffix the next generated id will use.
    pub fn next_id(&self) -> u32 {
        self.counter
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    fn index_of(&self, id: &str) -> Result<usize, GridError> {
        self.widgets
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| GridError::UnknownWidget(id.to_string()))
    }

    fn observe_id(&mut self, id: &str) {
        if let Some(n) = parse_widget_id(id) {
            self.counter = self.counter.max(n.saturating_add(1));
        }
    }

    fn emit(&mut self) {
        (self.on_change)(&self.widgets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Session plus a log of every arrangement the callback saw.
    fn session(next_id: u32) -> (GridSession, Rc<RefCell<Vec<Arrangement>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let session = GridSession::new(WidgetRegistry::builtin(), 12, next_id, move |a| {
            sink.borrow_mut().push(a.clone())
        });
        (session, seen)
    }

    fn assert_no_overlap(arrangement: &Arrangement) {
        let widgets = arrangement.widgets();
        for i in 0..widgets.len() {
            for j in (i + 1)..widgets.len() {
                assert!(
                    !widgets[i].overlaps(&widgets[j]),
                    "{} overlaps {}",
                    widgets[i].id,
                    widgets[j].id
                );
            }
        }
    }

    #[test]
    fn test_add_widget_generates_ids_and_emits() {
        let (mut grid, seen) = session(0);
        let first = grid.add_widget("lineChart", None).unwrap();
        let second = grid.add_widget("barChart", None).unwrap();

        assert_eq!(first.id, "widget-0");
        assert_eq!(second.id, "widget-1");
        assert_eq!((first.x, first.y, first.w, first.h), (0, 0, 4, 4));
        assert_eq!((second.x, second.y), (4, 0));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].len(), 2);
    }

    #[test]
    fn test_add_unknown_type_is_noop() {
        let (mut grid, seen) = session(0);
        assert!(grid.add_widget("doesNotExist", None).is_none());
        assert!(grid.is_empty());
        assert!(seen.borrow().is_empty());
        assert_eq!(grid.next_id(), 0);
    }

    #[test]
    fn test_add_with_explicit_id_bumps_counter() {
        let (mut grid, _) = session(0);
        grid.add_widget("metrics", Some("widget-5".to_string())).unwrap();
        assert!(grid.add_widget("metrics", Some("widget-5".to_string())).is_none());
        assert_eq!(grid.add_widget("metrics", None).unwrap().id, "widget-6");
    }

    #[test]
    fn test_added_widgets_never_overlap() {
        let (mut grid, _) = session(0);
        for kind in ["dataTable", "lineChart", "profileCard", "calendar", "dataTable", "weather"] {
            grid.add_widget(kind, None).unwrap();
        }
        assert_no_overlap(grid.arrangement());
        assert!(grid.arrangement().iter().all(|w| w.right() <= 12));
    }

    #[test]
    fn test_hydrate_preserves_placement() {
        let (mut grid, seen) = session(0);
        grid.add_widget("metrics", None).unwrap();

        let layout = Arrangement::from_widgets(vec![
            PlacedWidget::new("widget-4", "lineChart", 2, 3, 5, 2),
            PlacedWidget::new("widget-9", "pieChart", 0, 0, 2, 2),
        ])
        .unwrap();
        grid.hydrate(&layout);

        assert!(grid.arrangement().same_widgets(&layout));
        assert!(seen.borrow().last().unwrap().same_widgets(&layout));
        assert_eq!(grid.next_id(), 10);

        // A no-op report still matches the hydrated layout
        grid.commit();
        assert!(seen.borrow().last().unwrap().same_widgets(&layout));
    }

    #[test]
    fn test_hydrate_skips_unknown_types() {
        let (mut grid, _) = session(0);
        let layout = Arrangement::from_widgets(vec![
            PlacedWidget::new("widget-0", "lineChart", 0, 0, 4, 4),
            PlacedWidget::new("widget-1", "doesNotExist", 4, 0, 4, 4),
        ])
        .unwrap();
        grid.hydrate(&layout);

        assert_eq!(grid.len(), 1);
        assert!(grid.arrangement().contains("widget-0"));
        // Skipped ids are still never handed out again
        assert_eq!(grid.next_id(), 2);
    }

    #[test]
    fn test_clear_emits_empty() {
        let (mut grid, seen) = session(0);
        grid.add_widget("metrics", None).unwrap();
        grid.clear();
        assert!(grid.is_empty());
        assert!(seen.borrow().last().unwrap().is_empty());
        assert_eq!(grid.add_widget("metrics", None).unwrap().id, "widget-1");
    }

    #[test]
    fn test_move_pushes_overlapped_widgets_down() {
        let (mut grid, seen) = session(0);
        grid.add_widget("lineChart", None).unwrap(); // 0,0
        grid.add_widget("barChart", None).unwrap(); // 4,0

        grid.move_widget("widget-1", 2, 0).unwrap();

        let arrangement = grid.arrangement();
        assert_eq!(arrangement.get("widget-1").map(|w| (w.x, w.y)), Some((2, 0)));
        assert_eq!(arrangement.get("widget-0").map(|w| (w.x, w.y)), Some((0, 4)));
        assert_no_overlap(arrangement);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_move_clamps_to_columns() {
        let (mut grid, _) = session(0);
        grid.add_widget("lineChart", None).unwrap();
        grid.move_widget("widget-0", 20, 1).unwrap();
        assert_eq!(grid.arrangement().get("widget-0").map(|w| (w.x, w.y)), Some((8, 1)));
    }

    #[test]
    fn test_resize() {
        let (mut grid, _) = session(0);
        grid.add_widget("lineChart", None).unwrap();
        grid.add_widget("barChart", None).unwrap();

        grid.resize_widget("widget-0", 6, 2).unwrap();
        let arrangement = grid.arrangement();
        assert_eq!(arrangement.get("widget-0").map(|w| (w.w, w.h)), Some((6, 2)));
        assert_no_overlap(arrangement);

        grid.resize_widget("widget-0", 40, 2).unwrap();
        assert_eq!(grid.arrangement().get("widget-0").map(|w| w.w), Some(12));

        assert!(matches!(
            grid.resize_widget("widget-0", 0, 2),
            Err(GridError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_add_widget_stops_when_ids_run_out() {
        let (mut grid, seen) = session(0);
        let layout = Arrangement::from_widgets(vec![PlacedWidget::new(
            "widget-4294967295",
            "lineChart",
            0,
            0,
            4,
            4,
        )])
        .unwrap();
        grid.hydrate(&layout);
        assert_eq!(grid.next_id(), u32::MAX);
        let emitted = seen.borrow().len();

        assert!(grid.add_widget("barChart", None).is_none());
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.next_id(), u32::MAX);
        assert_eq!(seen.borrow().len(), emitted);

        // Explicit ids still work
        let added = grid.add_widget("barChart", Some("widget-7".to_string())).unwrap();
        assert_eq!(added.id, "widget-7");
    }

    #[test]
    fn test_move_and_resize_stay_inside_the_grid_limit() {
        let (mut grid, _) = session(0);
        grid.add_widget("lineChart", None).unwrap();

        grid.move_widget("widget-0", 0, u32::MAX).unwrap();
        let moved = grid.arrangement().get("widget-0").cloned().unwrap();
        assert_eq!(moved.y, MAX_GRID_EXTENT - 4);
        assert_eq!(moved.bottom(), MAX_GRID_EXTENT);

        grid.resize_widget("widget-0", 4, u32::MAX).unwrap();
        let resized = grid.arrangement().get("widget-0").cloned().unwrap();
        assert_eq!(resized.bottom(), MAX_GRID_EXTENT);
        assert!(grid.arrangement().validate().is_ok());
    }

    #[test]
    fn test_remove_widget() {
        let (mut grid, seen) = session(0);
        grid.add_widget("lineChart", None).unwrap();
        grid.add_widget("barChart", None).unwrap();

        let removed = grid.remove_widget("widget-1").unwrap();
        assert_eq!(removed.type_id, "barChart");
        assert!(matches!(
            grid.remove_widget("widget-1"),
            Err(GridError::UnknownWidget(_))
        ));
        assert_eq!(seen.borrow().last().unwrap().len(), 1);
        assert_eq!(grid.add_widget("barChart", None).unwrap().id, "widget-2");
    }
}
