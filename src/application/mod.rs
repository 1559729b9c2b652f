//! Application layer: reactive stores and the services that drive them.

pub mod chart_controller;
pub mod drawing_sync;
pub mod stores;

pub use chart_controller::ChartController;
pub use drawing_sync::DrawingSync;
