use leptos::*;
use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::AppConfig;
use crate::domain::logging::LogComponent;

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

/// Entry point: wires logging from the page config and mounts the chart.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_document();

    let console_logger = Box::new(infrastructure::services::ConsoleLogger::new(config.log_level()));
    domain::logging::init_logger(console_logger);

    let browser_time_provider = Box::new(infrastructure::services::BrowserTimeProvider::new());
    domain::logging::init_time_provider(browser_time_provider);

    crate::log_info!(
        LogComponent::Presentation("Initialize"),
        "starting chart for {} {} (api {})",
        config.default_symbol,
        config.default_interval,
        config.api_base_url
    );

    mount_to_body(move || view! { <App config=config /> });
}
