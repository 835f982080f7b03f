//! Dashgrid Core Library
//!
//! Platform-agnostic layout model, persistence and mode control for the
//! dashgrid dashboard.

pub mod config;
pub mod controller;
pub mod grid;
pub mod layout;
pub mod registry;
pub mod source;
pub mod storage;
pub mod view;

pub use config::{ConfigError, DashboardConfig, DEFAULT_COLUMNS, DEFAULT_STORAGE_KEY};
pub use controller::{ControllerError, Mode, ModeController};
pub use grid::{ChangeCallback, GridError, GridSession};
pub use layout::{
    next_widget_id, parse_widget_id, widget_id, Arrangement, LayoutError, PlacedWidget, MAX_GRID_EXTENT,
};
pub use registry::{ToolboxButton, WidgetKind, WidgetRegistry, WidgetTypeDescriptor};
pub use source::{select_source, summarize, today, DataSource, FixtureSource, SourceError, SourceMode};
pub use storage::{LayoutStore, LoadReport, MemoryStorage, Storage, StorageError, StorageResult};
pub use view::{ViewCell, ViewRender};
