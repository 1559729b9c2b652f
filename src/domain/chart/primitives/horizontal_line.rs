use super::{LABEL_FONT, LABEL_PADDING, Primitive};
use crate::domain::chart::coordinates::align_line;
use crate::domain::chart::host::CoordinateSource;
use crate::domain::chart::paint::{PaintTarget, TextAlign, TextBaseline};
use crate::domain::chart::value_objects::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalLineOptions {
    pub color: Color,
    pub width: f64,
    pub label: Option<String>,
    pub label_color: Color,
}

impl Default for HorizontalLineOptions {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0x2196F3),
            width: 1.0,
            label: None,
            label_color: Color::WHITE,
        }
    }
}

/// Full-width line at a fixed price.
#[derive(Debug, Clone)]
pub struct HorizontalLinePrimitive {
    id: String,
    price: f64,
    options: HorizontalLineOptions,
    y: Option<f64>,
}

impl HorizontalLinePrimitive {
    pub fn new(id: impl Into<String>, price: f64, options: HorizontalLineOptions) -> Self {
        Self { id: id.into(), price, options, y: None }
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = price;
    }

    pub fn options(&self) -> &HorizontalLineOptions {
        &self.options
    }

    pub fn apply_options(&mut self, options: HorizontalLineOptions) {
        self.options = options;
    }

    /// Media-pixel y from the last update, if the price was on scale.
    pub fn view_y(&self) -> Option<f64> {
        self.y
    }
}

impl Primitive for HorizontalLinePrimitive {
    fn id(&self) -> &str {
        &self.id
    }

    fn detached(&mut self) {
        self.y = None;
    }

    fn update_all_views(&mut self, source: &dyn CoordinateSource) {
        self.y = source.price_to_coordinate(self.price);
    }

    fn draw(&self, target: &mut dyn PaintTarget) {
        let Some(y) = self.y else { return };
        let (bitmap_width, _) = target.bitmap_size();
        let hr = target.horizontal_pixel_ratio();
        let vr = target.vertical_pixel_ratio();
        let span = align_line(y, vr, self.options.width);

        target.set_fill_color(self.options.color);
        target.fill_rect(0.0, span.position, bitmap_width, span.length);

        if let Some(label) = &self.options.label {
            target.set_font(LABEL_FONT);
            target.set_fill_color(self.options.label_color);
            target.fill_text(
                label,
                bitmap_width - LABEL_PADDING * hr,
                span.position - LABEL_PADDING * vr,
                TextAlign::Right,
                TextBaseline::Bottom,
            );
        }
    }
}
