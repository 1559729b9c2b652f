//! Chart aggregate: viewport value objects, pixel helpers, the host and the
//! overlays it paints.

pub mod coordinates;
pub mod host;
pub mod paint;
pub mod primitives;
pub mod series;
pub mod value_objects;

pub use host::{ChartHost, CoordinateSource, SubscriptionId, VisibleRange};
pub use paint::{PaintCommand, PaintTarget, RecordingTarget, TextAlign, TextBaseline};
pub use value_objects::*;
