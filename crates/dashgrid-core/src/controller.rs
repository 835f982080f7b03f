//! Edit/view mode controller.
//!
//! The controller owns the saved arrangement. Entering edit mode starts a
//! [`GridSession`] hydrated from it; the session's change reports keep a
//! working copy current. Save persists the working copy and promotes it,
//! cancel throws it away.

use crate::config::DashboardConfig;
use crate::grid::{GridError, GridSession};
use crate::layout::{Arrangement, PlacedWidget};
use crate::registry::WidgetRegistry;
use crate::storage::{LayoutStore, Storage, StorageError};
use crate::view::ViewRender;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Dashboard display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Static render of the saved arrangement.
    #[default]
    View,
    /// Interactive grid editing a working copy.
    Edit,
}

/// Errors surfaced to the user-facing layer.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Failed to save layout: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("Dashboard is not in edit mode")]
    NotEditing,
}

/// Drives transitions between view and edit mode.
pub struct ModeController<S: Storage> {
    store: LayoutStore<S>,
    registry: WidgetRegistry,
    config: DashboardConfig,
    /// Last saved arrangement.
    current: Arrangement,
    /// Mirror of the live session, updated by its change callback.
    working: Rc<RefCell<Arrangement>>,
    session: Option<GridSession>,
    /// Lowest id suffix no session has handed out yet.
    next_id: u32,
}

impl<S: Storage> ModeController<S> {
    /// Load the saved arrangement and start in view mode.
    pub fn new(store: LayoutStore<S>, registry: WidgetRegistry, config: DashboardConfig) -> Self {
        let current = store.load();
        let next_id = store.next_widget_id(&current);
        Self {
            store,
            registry,
            config,
            current,
            working: Rc::new(RefCell::new(Arrangement::new())),
            session: None,
            next_id,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.session.is_some() {
            Mode::Edit
        } else {
            Mode::View
        }
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Switch to edit mode. Does nothing if already editing.
    pub fn enter_edit(&mut self) {
        if self.session.is_some() {
            return;
        }

        let seed = self.next_id.max(self.store.next_widget_id(&self.current));
        let working = Rc::clone(&self.working);
        let mut session = GridSession::new(
            self.registry.clone(),
            self.config.columns,
            seed,
            move |arrangement: &Arrangement| {
                *working.borrow_mut() = arrangement.clone();
            },
        );
        session.hydrate(&self.current);
        self.session = Some(session);
        log::info!("Entered edit mode with {} widgets", self.working.borrow().len());
    }

    /// Leave edit mode, discarding unsaved changes.
    pub fn cancel(&mut self) -> Result<(), ControllerError> {
        if self.session.is_none() {
            return Err(ControllerError::NotEditing);
        }
        self.end_session();
        log::info!("Edit cancelled");
        Ok(())
    }

    /// Persist the working copy and return to view mode.
    ///
    /// On failure the controller stays in edit mode with the working copy
    /// untouched, so the save can be retried.
    pub fn save(&mut self) -> Result<(), ControllerError> {
        if self.session.is_none() {
            return Err(ControllerError::NotEditing);
        }
        let working = self.working.borrow().clone();
        if let Err(e) = self.store.save(&working) {
            log::error!("Failed to save layout: {}", e);
            return Err(e.into());
        }
        self.current = working;
        self.end_session();
        Ok(())
    }

    /// Empty the grid and the working copy. Stays in edit mode and does not
    /// persist anything.
    pub fn clear(&mut self) -> Result<(), ControllerError> {
        let session = self.session.as_mut().ok_or(ControllerError::NotEditing)?;
        session.clear();
        self.working.borrow_mut().clear();
        Ok(())
    }

    /// Mode toggle: view enters edit, edit cancels back to view.
    pub fn toggle(&mut self) -> Mode {
        match self.mode() {
            Mode::View => self.enter_edit(),
            Mode::Edit => {
                self.end_session();
            }
        }
        self.mode()
    }

    /// Add a widget of `type_id`; `Ok(None)` when the type is unknown.
    pub fn add_widget(&mut self, type_id: &str) -> Result<Option<PlacedWidget>, ControllerError> {
        Ok(self.session_mut()?.add_widget(type_id, None))
    }

    pub fn move_widget(&mut self, id: &str, x: u32, y: u32) -> Result<(), ControllerError> {
        Ok(self.session_mut()?.move_widget(id, x, y)?)
    }

    pub fn resize_widget(&mut self, id: &str, w: u32, h: u32) -> Result<(), ControllerError> {
        Ok(self.session_mut()?.resize_widget(id, w, h)?)
    }

    pub fn remove_widget(&mut self, id: &str) -> Result<PlacedWidget, ControllerError> {
        Ok(self.session_mut()?.remove_widget(id)?)
    }

    /// Cells for view mode, from the last saved arrangement.
    pub fn render_view(&self) -> ViewRender {
        ViewRender::build(&self.current, &self.registry)
    }

    /// Last saved arrangement.
    pub fn current(&self) -> &Arrangement {
        &self.current
    }

    /// Unsaved working copy, while editing.
    pub fn working(&self) -> Option<Arrangement> {
        self.session.as_ref().map(|_| self.working.borrow().clone())
    }

    /// The live grid, while editing.
    pub fn session(&self) -> Option<&GridSession> {
        self.session.as_ref()
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn store(&self) -> &LayoutStore<S> {
        &self.store
    }

    fn session_mut(&mut self) -> Result<&mut GridSession, ControllerError> {
        self.session.as_mut().ok_or(ControllerError::NotEditing)
    }

    fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            self.next_id = self.next_id.max(session.next_id());
        }
        self.working.borrow_mut().clear();
    }
}
