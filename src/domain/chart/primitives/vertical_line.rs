use super::{LABEL_FONT, LABEL_PADDING, Primitive};
use crate::domain::chart::coordinates::align_line;
use crate::domain::chart::host::CoordinateSource;
use crate::domain::chart::paint::{PaintTarget, TextAlign, TextBaseline};
use crate::domain::chart::value_objects::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct VerticalLineOptions {
    pub color: Color,
    pub width: f64,
    pub label: Option<String>,
    pub label_color: Color,
}

impl Default for VerticalLineOptions {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0x787B86),
            width: 1.0,
            label: None,
            label_color: Color::WHITE,
        }
    }
}

/// Full-height line at a fixed time.
#[derive(Debug, Clone)]
pub struct VerticalLinePrimitive {
    id: String,
    time: i64,
    options: VerticalLineOptions,
    x: Option<f64>,
}

impl VerticalLinePrimitive {
    pub fn new(id: impl Into<String>, time: i64, options: VerticalLineOptions) -> Self {
        Self { id: id.into(), time, options, x: None }
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn set_time(&mut self, time: i64) {
        self.time = time;
    }

    pub fn apply_options(&mut self, options: VerticalLineOptions) {
        self.options = options;
    }

    pub fn view_x(&self) -> Option<f64> {
        self.x
    }
}

impl Primitive for VerticalLinePrimitive {
    fn id(&self) -> &str {
        &self.id
    }

    fn detached(&mut self) {
        self.x = None;
    }

    fn update_all_views(&mut self, source: &dyn CoordinateSource) {
        self.x = source.time_to_coordinate(self.time);
    }

    fn draw(&self, target: &mut dyn PaintTarget) {
        let Some(x) = self.x else { return };
        let (_, bitmap_height) = target.bitmap_size();
        let hr = target.horizontal_pixel_ratio();
        let vr = target.vertical_pixel_ratio();
        let span = align_line(x, hr, self.options.width);

        target.set_fill_color(self.options.color);
        target.fill_rect(span.position, 0.0, span.length, bitmap_height);

        if let Some(label) = &self.options.label {
            target.set_font(LABEL_FONT);
            target.set_fill_color(self.options.label_color);
            target.fill_text(
                label,
                span.position + span.length + LABEL_PADDING * hr,
                LABEL_PADDING * vr,
                TextAlign::Left,
                TextBaseline::Top,
            );
        }
    }
}
