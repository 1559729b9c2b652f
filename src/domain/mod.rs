//! Domain layer: pure chart geometry, drawing model and market data types.
//! Nothing in here touches the browser.

pub mod chart;
pub mod drawing;
pub mod errors;
pub mod logging;
pub mod market_data;
