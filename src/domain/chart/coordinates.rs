//! Media-to-bitmap pixel alignment helpers shared by every primitive.
//!
//! Canvas drawing happens in bitmap (device) pixels; chart coordinates come in
//! media (CSS) pixels. These helpers snap strokes and boxes to whole device
//! pixels so one-pixel lines stay crisp at fractional pixel ratios.

use super::value_objects::LineStyle;

/// A run of whole bitmap pixels along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedSpan {
    pub position: f64,
    pub length: f64,
}

/// Place a stroke of `width_media` centred on `position_media`.
///
/// The scaled width never drops below one device pixel. Works for either axis;
/// pass the pixel ratio of the axis being aligned.
pub fn align_line(position_media: f64, pixel_ratio: f64, width_media: f64) -> AlignedSpan {
    let scaled_position = (position_media * pixel_ratio).round();
    let length = (width_media * pixel_ratio).round().max(1.0);
    AlignedSpan { position: scaled_position - (length * 0.5).floor(), length }
}

/// Span between two media coordinates, independent of their order.
pub fn align_box(pos1_media: f64, pos2_media: f64, pixel_ratio: f64) -> AlignedSpan {
    let a = (pos1_media * pixel_ratio).round();
    let b = (pos2_media * pixel_ratio).round();
    AlignedSpan { position: a.min(b), length: (b - a).abs() }
}

/// Canvas dash pattern for a line style. Solid is the empty pattern.
pub fn dash_pattern(style: LineStyle) -> Vec<f64> {
    match style {
        LineStyle::Solid => Vec::new(),
        LineStyle::Dotted => vec![1.0, 1.0],
        LineStyle::Dashed => vec![4.0, 4.0],
        LineStyle::LargeDashed => vec![8.0, 8.0],
        LineStyle::SparseDotted => vec![1.0, 4.0],
    }
}

/// Same as [`dash_pattern`] for a raw style code; unknown codes are solid.
pub fn dash_pattern_for_code(code: u8) -> Vec<f64> {
    dash_pattern(LineStyle::from_code(code))
}
