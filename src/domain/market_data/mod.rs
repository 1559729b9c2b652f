//! Market data aggregate: candles, value objects and indicator math.

pub mod entities;
pub mod indicators;
pub mod value_objects;

pub use entities::*;
pub use indicators::*;
pub use value_objects::*;
