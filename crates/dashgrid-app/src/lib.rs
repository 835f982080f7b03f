//! Dashgrid Application
//!
//! The application shell tying the mode controller to the egui widgets,
//! the winit/egui-wgpu window that hosts them, and logging setup for native
//! and WASM.

mod app;
mod ui;

#[cfg(any(feature = "native", target_arch = "wasm32"))]
mod shell;

pub use app::{DashboardApp, WidgetData};
pub use ui::{grid_style, render_ui, UiAction, UiState};

#[cfg(any(feature = "native", target_arch = "wasm32"))]
pub use shell::{Shell, ShellError, WindowConfig};

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use shell::run;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{init_logging, start};

/// Initialize `env_logger`. `RUST_LOG` controls the level, info by default.
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
