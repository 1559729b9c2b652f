//! Canvas-like paint target. All drawing coordinates are bitmap pixels; the
//! target reports its media size and per-axis pixel ratios so primitives can
//! convert with the helpers in [`super::coordinates`].

use super::value_objects::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

pub trait PaintTarget {
    /// Size in media (CSS) pixels.
    fn media_size(&self) -> (f64, f64);
    fn horizontal_pixel_ratio(&self) -> f64;
    fn vertical_pixel_ratio(&self) -> f64;

    fn bitmap_size(&self) -> (f64, f64) {
        let (w, h) = self.media_size();
        (
            (w * self.horizontal_pixel_ratio()).round(),
            (h * self.vertical_pixel_ratio()).round(),
        )
    }

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn set_line_dash(&mut self, pattern: &[f64]);
    fn set_font(&mut self, font: &str);

    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_segment(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, baseline: TextBaseline);
}

/// One recorded paint call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    FillColor(String),
    StrokeColor(String),
    LineWidth(f64),
    LineDash(Vec<f64>),
    Font(String),
    Clear,
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    StrokeRect { x: f64, y: f64, width: f64, height: f64 },
    Segment { x1: f64, y1: f64, x2: f64, y2: f64 },
    Circle { cx: f64, cy: f64, radius: f64 },
    Text { text: String, x: f64, y: f64, align: TextAlign, baseline: TextBaseline },
}

/// Headless target that records every call. Used for tests and for measuring
/// what a frame would paint without a browser.
#[derive(Debug, Clone)]
pub struct RecordingTarget {
    width: f64,
    height: f64,
    pixel_ratio: f64,
    pub commands: Vec<PaintCommand>,
}

impl RecordingTarget {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self { width, height, pixel_ratio, commands: Vec::new() }
    }

    /// Commands that put pixels on the target, skipping state changes.
    pub fn shapes(&self) -> Vec<&PaintCommand> {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    PaintCommand::FillRect { .. }
                        | PaintCommand::StrokeRect { .. }
                        | PaintCommand::Segment { .. }
                        | PaintCommand::Circle { .. }
                        | PaintCommand::Text { .. }
                )
            })
            .collect()
    }

    pub fn take(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl PaintTarget for RecordingTarget {
    fn media_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn horizontal_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn vertical_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(PaintCommand::FillColor(color.to_css()));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.commands.push(PaintCommand::StrokeColor(color.to_css()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(PaintCommand::LineWidth(width));
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.commands.push(PaintCommand::LineDash(pattern.to_vec()));
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(PaintCommand::Font(font.to_string()));
    }

    fn clear(&mut self) {
        self.commands.push(PaintCommand::Clear);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(PaintCommand::FillRect { x, y, width, height });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(PaintCommand::StrokeRect { x, y, width, height });
    }

    fn stroke_segment(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.commands.push(PaintCommand::Segment { x1, y1, x2, y2 });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64) {
        self.commands.push(PaintCommand::Circle { cx, cy, radius });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, baseline: TextBaseline) {
        self.commands.push(PaintCommand::Text { text: text.to_string(), x, y, align, baseline });
    }
}
