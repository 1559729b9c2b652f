//! Drawing primitives: self-contained overlays that convert their own
//! time/price data to pixels on every host update and paint themselves.

mod horizontal_line;
mod rectangle;
mod trend_line;
mod vertical_line;

pub use horizontal_line::{HorizontalLinePrimitive, HorizontalLineOptions};
pub use rectangle::{RectanglePrimitive, RectangleOptions};
pub use trend_line::{TrendLinePrimitive, TrendLineOptions};
pub use vertical_line::{VerticalLinePrimitive, VerticalLineOptions};

use super::host::CoordinateSource;
use super::paint::PaintTarget;

pub const LABEL_FONT: &str = "12px sans-serif";
pub const LABEL_PADDING: f64 = 4.0;

/// Capability set shared by every overlay the chart host can carry.
pub trait Primitive {
    fn id(&self) -> &str;

    /// Called once when the host takes ownership.
    fn attached(&mut self, source: &dyn CoordinateSource) {
        self.update_all_views(source);
    }

    /// Called when the host lets go; the primitive must forget cached pixels.
    fn detached(&mut self);

    /// Re-derive pixel geometry from domain data. A value the host cannot
    /// map leaves the view empty for this cycle.
    fn update_all_views(&mut self, source: &dyn CoordinateSource);

    fn draw(&self, target: &mut dyn PaintTarget);
}

/// Pixel position of a (time, price) pair, if both axes can map it.
pub(crate) fn to_pixel(source: &dyn CoordinateSource, time: i64, price: f64) -> Option<(f64, f64)> {
    Some((source.time_to_coordinate(time)?, source.price_to_coordinate(price)?))
}
