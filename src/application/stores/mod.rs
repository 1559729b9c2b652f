//! Reactive UI state built on Leptos signals. Stores are `Copy` handles
//! created once in the root component and passed down as props.

mod drawing_store;
mod indicator_store;
mod trading_store;

pub use drawing_store::DrawingStore;
pub use indicator_store::IndicatorStore;
pub use trading_store::TradingStore;
