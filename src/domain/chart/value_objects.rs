use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - Chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[display(fmt = "Candlestick")]
    #[strum(serialize = "candlestick")]
    Candlestick,
    #[display(fmt = "Line")]
    #[strum(serialize = "line")]
    Line,
    #[display(fmt = "OHLC")]
    #[strum(serialize = "ohlc")]
    Ohlc,
    #[display(fmt = "Heikin")]
    #[strum(serialize = "heikin")]
    Heikin,
}

/// Value Object - Stroke dash style, numbered the way chart libraries number it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Serialize, Deserialize)]
#[repr(u8)]
pub enum LineStyle {
    #[default]
    Solid = 0,
    Dotted = 1,
    Dashed = 2,
    LargeDashed = 3,
    SparseDotted = 4,
}

impl LineStyle {
    /// Unknown codes fall back to solid.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => LineStyle::Dotted,
            2 => LineStyle::Dashed,
            3 => LineStyle::LargeDashed,
            4 => LineStyle::SparseDotted,
            _ => LineStyle::Solid,
        }
    }
}

/// Value Object - Viewport: the visible time/price window and the media-pixel
/// size it is laid out on. Time is in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub start_time: f64,
    pub end_time: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            end_time: 0.0,
            min_price: 0.0,
            max_price: 100.0,
            width: 800,
            height: 600,
        }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Default::default() }
    }

    pub fn time_range(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn price_range(&self) -> f64 {
        self.max_price - self.min_price
    }

    /// A viewport with no size or degenerate ranges cannot map coordinates yet.
    pub fn is_measured(&self) -> bool {
        self.width > 0 && self.height > 0 && self.time_range() > 0.0 && self.price_range() > 0.0
    }

    pub fn contains_time(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }

    pub fn contains_price(&self, price: f64) -> bool {
        price >= self.min_price && price <= self.max_price
    }

    pub fn zoom(&mut self, factor: f64, center_x: f64) {
        if factor <= 0.0 {
            return;
        }
        let current_range = self.time_range();
        let new_range = current_range / factor;
        let center_time = self.start_time + current_range * center_x;

        self.start_time = center_time - new_range / 2.0;
        self.end_time = center_time + new_range / 2.0;
    }

    /// Scale prices vertically around `center_y` (0 = top, 1 = bottom).
    pub fn zoom_price(&mut self, factor: f64, center_y: f64) {
        if factor <= 0.0 {
            return;
        }
        let current_range = self.price_range();
        let new_range = current_range / factor;
        let center_price = self.max_price - current_range * center_y;

        self.min_price = center_price - new_range / 2.0;
        self.max_price = center_price + new_range / 2.0;
    }

    /// Pan by fractions of the current ranges.
    pub fn pan(&mut self, delta_x: f64, delta_y: f64) {
        let time_delta = self.time_range() * delta_x;
        self.start_time += time_delta;
        self.end_time += time_delta;

        let price_delta = self.price_range() * delta_y;
        self.min_price += price_delta;
        self.max_price += price_delta;
    }

    pub fn time_to_x(&self, time: f64) -> f64 {
        if self.time_range() == 0.0 {
            return 0.0;
        }
        let normalized = (time - self.start_time) / self.time_range();
        normalized * self.width as f64
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        if self.price_range() == 0.0 {
            return self.height as f64 / 2.0;
        }
        let normalized = (price - self.min_price) / self.price_range();
        self.height as f64 * (1.0 - normalized)
    }

    pub fn x_to_time(&self, x: f64) -> f64 {
        let normalized = x / self.width.max(1) as f64;
        self.start_time + self.time_range() * normalized
    }

    pub fn y_to_price(&self, y: f64) -> f64 {
        let normalized = 1.0 - (y / self.height.max(1) as f64);
        self.min_price + self.price_range() * normalized
    }
}

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_css(css: &str) -> Option<Self> {
        let hex = css.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as f32 / 255.0));
                Some(Self::rgb(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Parse a CSS hex colour, falling back when it is malformed.
    pub fn from_css_or(css: &str, fallback: Color) -> Self {
        Self::from_css(css).unwrap_or(fallback)
    }

    pub fn to_hex(&self) -> u32 {
        let r = (self.r * 255.0).round() as u32;
        let g = (self.g * 255.0).round() as u32;
        let b = (self.b * 255.0).round() as u32;
        (r << 16) | (g << 8) | b
    }

    /// `rgba(r, g, b, a)` string for canvas fill/stroke styles.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha, ..*self }
    }

    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0, a: 1.0 };
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}
