//! Main application entry point (native).
//!
//! Usage: `dashgrid [config.json]`

#[cfg(feature = "native")]
fn main() {
    use dashgrid_app::{DashboardApp, WindowConfig};
    use dashgrid_core::storage::create_layout_store;
    use dashgrid_core::DashboardConfig;

    dashgrid_app::init_logging();
    log::info!("Starting Dashgrid");

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| DashboardConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to read config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => DashboardConfig::default(),
    };

    let store = match create_layout_store(&config) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open layout storage: {}", e);
            std::process::exit(1);
        }
    };

    let app = DashboardApp::new(store, config);
    if let Err(e) = dashgrid_app::run(app, WindowConfig::default()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
