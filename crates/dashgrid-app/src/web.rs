//! WebAssembly entry point and platform-specific code.

use dashgrid_core::storage::create_layout_store;
use dashgrid_core::DashboardConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::app::DashboardApp;
use crate::shell::{self, WindowConfig};

const CANVAS_ID: &str = "dashgrid-canvas";

/// Route panics and `log` output to the browser console.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// The page's dashboard canvas, created under `#app` (or `<body>`) when the
/// page has none, sized to the viewport in physical pixels.
pub(crate) fn dashboard_canvas() -> Option<HtmlCanvasElement> {
    let window = web_sys::window()?;
    let document = window.document()?;

    if let Some(loading) = document.get_element_by_id("loading") {
        loading.remove();
    }

    let canvas = match document
        .get_element_by_id(CANVAS_ID)
        .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
    {
        Some(canvas) => canvas,
        None => {
            let canvas = document.create_element("canvas").ok()?;
            canvas.set_id(CANVAS_ID);
            let parent = match document.get_element_by_id("app") {
                Some(app) => app,
                None => document.body()?.into(),
            };
            parent.append_child(&canvas).ok()?;
            canvas.dyn_into::<HtmlCanvasElement>().ok()?
        }
    };

    let dpr = window.device_pixel_ratio();
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1280.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
    canvas.set_width((width * dpr) as u32);
    canvas.set_height((height * dpr) as u32);

    let style = canvas.style();
    for (property, value) in [
        ("width", "100%"),
        ("height", "100%"),
        ("display", "block"),
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
    ] {
        let _ = style.set_property(property, value);
    }

    log::info!("Canvas {}x{} (dpr {})", width, height, dpr);
    Some(canvas)
}

/// Module start hook: load the saved layout from `localStorage` and attach
/// the dashboard to the page.
#[wasm_bindgen(start)]
pub fn start() {
    init_logging();
    log::info!("Starting Dashgrid (WASM)");

    let config = DashboardConfig::default();
    let store = match create_layout_store(&config) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open layout storage: {}", e);
            return;
        }
    };

    let app = DashboardApp::new(store, config);
    if let Err(e) = shell::spawn(app, WindowConfig::default()) {
        log::error!("Failed to start dashboard: {}", e);
    }
}
