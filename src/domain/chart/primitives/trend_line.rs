use super::{LABEL_FONT, LABEL_PADDING, Primitive, to_pixel};
use crate::domain::chart::coordinates::dash_pattern;
use crate::domain::chart::host::CoordinateSource;
use crate::domain::chart::paint::{PaintTarget, TextAlign, TextBaseline};
use crate::domain::chart::value_objects::{Color, LineStyle};
use crate::domain::drawing::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendLineOptions {
    pub color: Color,
    pub width: f64,
    pub line_style: LineStyle,
    /// Filled handles at both ends.
    pub show_endpoints: bool,
    pub endpoint_radius: f64,
    pub label: Option<String>,
}

impl Default for TrendLineOptions {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0xFF9800),
            width: 2.0,
            line_style: LineStyle::Solid,
            show_endpoints: true,
            endpoint_radius: 4.0,
            label: None,
        }
    }
}

/// Straight segment between two (time, price) points.
#[derive(Debug, Clone)]
pub struct TrendLinePrimitive {
    id: String,
    points: [Point; 2],
    options: TrendLineOptions,
    view: Option<[(f64, f64); 2]>,
}

impl TrendLinePrimitive {
    pub fn new(id: impl Into<String>, points: [Point; 2], options: TrendLineOptions) -> Self {
        Self { id: id.into(), points, options, view: None }
    }

    pub fn points(&self) -> [Point; 2] {
        self.points
    }

    pub fn set_points(&mut self, points: [Point; 2]) {
        self.points = points;
    }

    pub fn options(&self) -> &TrendLineOptions {
        &self.options
    }

    pub fn apply_options(&mut self, options: TrendLineOptions) {
        self.options = options;
    }

    /// Media-pixel endpoints from the last update; `None` if either point was off scale.
    pub fn view(&self) -> Option<[(f64, f64); 2]> {
        self.view
    }
}

impl Primitive for TrendLinePrimitive {
    fn id(&self) -> &str {
        &self.id
    }

    fn detached(&mut self) {
        self.view = None;
    }

    fn update_all_views(&mut self, source: &dyn CoordinateSource) {
        let [a, b] = self.points;
        self.view = to_pixel(source, a.time, a.price)
            .zip(to_pixel(source, b.time, b.price))
            .map(|(p1, p2)| [p1, p2]);
    }

    fn draw(&self, target: &mut dyn PaintTarget) {
        let Some([(x1, y1), (x2, y2)]) = self.view else { return };
        let hr = target.horizontal_pixel_ratio();
        let vr = target.vertical_pixel_ratio();
        let (x1, y1, x2, y2) = (x1 * hr, y1 * vr, x2 * hr, y2 * vr);
        let line_width = (self.options.width * vr).max(1.0);

        // Dash lengths are expressed in line widths.
        let dash: Vec<f64> = dash_pattern(self.options.line_style)
            .into_iter()
            .map(|d| d * line_width)
            .collect();

        target.set_stroke_color(self.options.color);
        target.set_line_width(line_width);
        target.set_line_dash(&dash);
        target.stroke_segment(x1, y1, x2, y2);
        target.set_line_dash(&[]);

        if self.options.show_endpoints {
            let radius = self.options.endpoint_radius * hr;
            target.set_fill_color(self.options.color);
            target.fill_circle(x1, y1, radius);
            target.fill_circle(x2, y2, radius);
        }

        if let Some(label) = &self.options.label {
            target.set_font(LABEL_FONT);
            target.set_fill_color(self.options.color);
            target.fill_text(
                label,
                x2 + LABEL_PADDING * hr,
                y2 - LABEL_PADDING * vr,
                TextAlign::Left,
                TextBaseline::Bottom,
            );
        }
    }
}
