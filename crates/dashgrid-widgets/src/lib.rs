//! Reusable egui components for dashboard grids, with Tailwind-inspired styling.
//!
//! This crate provides the pieces a dashboard shell draws:
//!
//! - **Buttons**: toggle buttons and labelled action buttons
//! - **Toolbox**: one button per widget kind, returning the clicked value
//! - **Mode bar**: edit/view toggle plus save, clear and cancel
//! - **Grid**: column-grid board that paints cells and reports drags,
//!   resizes and removals in grid units
//! - **Layout**: muted labels and the toolbar frame

pub mod buttons;
pub mod grid;
pub mod layout;
pub mod mode_bar;
pub mod toolbox;

pub use buttons::{ActionButton, ActionStyle, ToggleButton};
pub use grid::{GridBoard, GridCell, GridEvent, GridStyle};
pub use layout::{section_label, toolbar_frame};
pub use mode_bar::{ModeBar, ModeBarAction};
pub use toolbox::{Toolbox, ToolboxEntry};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Standard button height
    pub const BUTTON_HEIGHT: f32 = 28.0;
    /// Cell header height
    pub const HEADER_HEIGHT: f32 = 24.0;
    /// Resize grip size
    pub const GRIP: f32 = 10.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Destructive action color (red)
    pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Cell background
    pub const CELL_BG: Color32 = Color32::WHITE;
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
