use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::domain::chart::paint::{PaintTarget, TextAlign, TextBaseline};
use crate::domain::chart::value_objects::Color;
use crate::domain::errors::{AppError, RenderingResult};

/// [`PaintTarget`] over a 2D canvas context.
///
/// The canvas backing store is sized in bitmap pixels while its CSS size stays
/// at the media size, so one canvas unit is one device pixel.
pub struct CanvasTarget {
    context: CanvasRenderingContext2d,
    media_width: f64,
    media_height: f64,
    pixel_ratio: f64,
    background: Option<Color>,
}

impl CanvasTarget {
    pub fn for_canvas(
        canvas: &HtmlCanvasElement,
        media_width: u32,
        media_height: u32,
        pixel_ratio: f64,
    ) -> RenderingResult<Self> {
        if media_width == 0 || media_height == 0 {
            return Err(AppError::RenderingError("canvas has no size".to_string()));
        }
        canvas.set_width((media_width as f64 * pixel_ratio).round() as u32);
        canvas.set_height((media_height as f64 * pixel_ratio).round() as u32);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{media_width}px"));
        let _ = style.set_property("height", &format!("{media_height}px"));

        let context = canvas
            .get_context("2d")
            .map_err(|e| AppError::RenderingError(format!("2d context unavailable: {e:?}")))?
            .ok_or_else(|| AppError::RenderingError("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AppError::RenderingError("failed to cast to 2d context".to_string()))?;

        Ok(Self {
            context,
            media_width: media_width as f64,
            media_height: media_height as f64,
            pixel_ratio,
            background: None,
        })
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.context
    }
}

impl PaintTarget for CanvasTarget {
    fn media_size(&self) -> (f64, f64) {
        (self.media_width, self.media_height)
    }

    fn horizontal_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn vertical_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn set_fill_color(&mut self, color: Color) {
        self.context.set_fill_style(&JsValue::from_str(&color.to_css()));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.context.set_stroke_style(&JsValue::from_str(&color.to_css()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        let segments: js_sys::Array = pattern.iter().map(|d| JsValue::from_f64(*d)).collect();
        let _ = self.context.set_line_dash(&segments);
    }

    fn set_font(&mut self, font: &str) {
        self.context.set_font(font);
    }

    fn clear(&mut self) {
        let (w, h) = self.bitmap_size();
        self.context.clear_rect(0.0, 0.0, w, h);
        if let Some(background) = self.background {
            self.set_fill_color(background);
            self.context.fill_rect(0.0, 0.0, w, h);
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.fill_rect(x, y, width, height);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.stroke_rect(x, y, width, height);
    }

    fn stroke_segment(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.context.begin_path();
        self.context.move_to(x1, y1);
        self.context.line_to(x2, y2);
        self.context.stroke();
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64) {
        self.context.begin_path();
        if self.context.arc(cx, cy, radius, 0.0, std::f64::consts::TAU).is_ok() {
            self.context.fill();
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, baseline: TextBaseline) {
        self.context.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        self.context.set_text_baseline(match baseline {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
            TextBaseline::Bottom => "bottom",
        });
        let _ = self.context.fill_text(text, x, y);
    }
}
