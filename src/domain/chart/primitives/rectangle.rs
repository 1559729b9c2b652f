use super::{Primitive, to_pixel};
use crate::domain::chart::coordinates::align_box;
use crate::domain::chart::host::CoordinateSource;
use crate::domain::chart::paint::PaintTarget;
use crate::domain::chart::value_objects::Color;
use crate::domain::drawing::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct RectangleOptions {
    pub fill_color: Color,
    pub fill_alpha: f32,
    pub border_color: Color,
    /// Zero disables the border.
    pub border_width: f64,
}

impl Default for RectangleOptions {
    fn default() -> Self {
        Self {
            fill_color: Color::from_hex(0x2196F3),
            fill_alpha: 0.2,
            border_color: Color::from_hex(0x2196F3),
            border_width: 1.0,
        }
    }
}

/// Box spanned by two opposite (time, price) corners.
#[derive(Debug, Clone)]
pub struct RectanglePrimitive {
    id: String,
    corners: [Point; 2],
    options: RectangleOptions,
    view: Option<[(f64, f64); 2]>,
}

impl RectanglePrimitive {
    pub fn new(id: impl Into<String>, corners: [Point; 2], options: RectangleOptions) -> Self {
        Self { id: id.into(), corners, options, view: None }
    }

    pub fn corners(&self) -> [Point; 2] {
        self.corners
    }

    pub fn set_corners(&mut self, corners: [Point; 2]) {
        self.corners = corners;
    }

    pub fn apply_options(&mut self, options: RectangleOptions) {
        self.options = options;
    }

    pub fn view(&self) -> Option<[(f64, f64); 2]> {
        self.view
    }
}

impl Primitive for RectanglePrimitive {
    fn id(&self) -> &str {
        &self.id
    }

    fn detached(&mut self) {
        self.view = None;
    }

    fn update_all_views(&mut self, source: &dyn CoordinateSource) {
        let [a, b] = self.corners;
        self.view = to_pixel(source, a.time, a.price)
            .zip(to_pixel(source, b.time, b.price))
            .map(|(p1, p2)| [p1, p2]);
    }

    fn draw(&self, target: &mut dyn PaintTarget) {
        let Some([(x1, y1), (x2, y2)]) = self.view else { return };
        let horizontal = align_box(x1, x2, target.horizontal_pixel_ratio());
        let vertical = align_box(y1, y2, target.vertical_pixel_ratio());

        target.set_fill_color(self.options.fill_color.with_alpha(self.options.fill_alpha));
        target.fill_rect(horizontal.position, vertical.position, horizontal.length, vertical.length);

        if self.options.border_width > 0.0 {
            target.set_stroke_color(self.options.border_color);
            target.set_line_width(self.options.border_width * target.horizontal_pixel_ratio());
            target.stroke_rect(horizontal.position, vertical.position, horizontal.length, vertical.length);
        }
    }
}
