//! Browser-facing adapters: HTTP clients, canvas painting, console logging.

pub mod http;
pub mod rendering;
pub mod services;
