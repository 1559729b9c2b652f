//! Chart host: owns the viewport, maps between (time, price) and media pixels,
//! and carries the overlays painted on top of the price series.

use super::paint::PaintTarget;
use super::primitives::{
    HorizontalLineOptions, HorizontalLinePrimitive, Primitive, RectangleOptions,
    RectanglePrimitive, TrendLineOptions, TrendLinePrimitive,
};
use super::value_objects::{Color, LineStyle, Viewport};
use crate::domain::drawing::{
    DEFAULT_FIBONACCI_COLOR, DEFAULT_HORIZONTAL_COLOR, DEFAULT_TREND_COLOR, DrawingSnapshot,
    FibonacciRetracement, Point,
};
use crate::domain::errors::{AppError, RenderingResult};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Candle, price_range};
use crate::log_debug;

/// Mapping from domain values to media pixels, as seen by primitives.
pub trait CoordinateSource {
    /// `None` when the scale is not measured yet or the price is off screen.
    fn price_to_coordinate(&self, price: f64) -> Option<f64>;

    /// `None` when the scale is not measured yet or the time is off screen.
    fn time_to_coordinate(&self, time: i64) -> Option<f64>;

    /// Like [`price_to_coordinate`](Self::price_to_coordinate) but lets
    /// off-screen prices through so series can be clipped by the canvas.
    fn price_to_coordinate_unclipped(&self, price: f64) -> Option<f64>;

    fn media_size(&self) -> (f64, f64);
}

/// Read-only view of a viewport, handed to primitives while the host mutates
/// its primitive list.
struct ViewportMapper<'a> {
    viewport: &'a Viewport,
}

impl CoordinateSource for ViewportMapper<'_> {
    fn price_to_coordinate(&self, price: f64) -> Option<f64> {
        if !self.viewport.is_measured() || !self.viewport.contains_price(price) {
            return None;
        }
        Some(self.viewport.price_to_y(price))
    }

    fn time_to_coordinate(&self, time: i64) -> Option<f64> {
        let time = time as f64;
        if !self.viewport.is_measured() || !self.viewport.contains_time(time) {
            return None;
        }
        Some(self.viewport.time_to_x(time))
    }

    fn price_to_coordinate_unclipped(&self, price: f64) -> Option<f64> {
        (self.viewport.is_measured() && price.is_finite()).then(|| self.viewport.price_to_y(price))
    }

    fn media_size(&self) -> (f64, f64) {
        (self.viewport.width as f64, self.viewport.height as f64)
    }
}

/// Visible window reported to range subscribers. Times are seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    pub from: f64,
    pub to: f64,
}

pub type SubscriptionId = u64;

type RangeCallback = Box<dyn Fn(VisibleRange)>;

const DRAWING_PREFIX: &str = "drawing:";
const FIB_BAND_ALPHA: f32 = 0.08;

pub struct ChartHost {
    viewport: Viewport,
    pixel_ratio: f64,
    /// Price series layer, painted first.
    series: Vec<Box<dyn Primitive>>,
    /// Overlay layer, painted in attach order.
    primitives: Vec<Box<dyn Primitive>>,
    subscribers: Vec<(SubscriptionId, RangeCallback)>,
    next_subscription: SubscriptionId,
}

impl ChartHost {
    /// Host for a canvas measured by layout. Negative sizes count as zero, so an
    /// unlaid-out canvas fails and can be retried once it has a size.
    pub fn from_measured(width: i32, height: i32, pixel_ratio: f64) -> RenderingResult<Self> {
        Self::new(width.max(0) as u32, height.max(0) as u32, pixel_ratio)
    }

    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> RenderingResult<Self> {
        if width == 0 || height == 0 {
            return Err(AppError::RenderingError(format!(
                "chart container has no size ({width}x{height})"
            )));
        }
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        Ok(Self {
            viewport: Viewport::new(width, height),
            pixel_ratio,
            series: Vec::new(),
            primitives: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 1,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn visible_range(&self) -> VisibleRange {
        VisibleRange { from: self.viewport.start_time, to: self.viewport.end_time }
    }

    pub fn x_to_time(&self, x: f64) -> Option<i64> {
        self.viewport.is_measured().then(|| self.viewport.x_to_time(x).round() as i64)
    }

    pub fn y_to_price(&self, y: f64) -> Option<f64> {
        self.viewport.is_measured().then(|| self.viewport.y_to_price(y))
    }

    // --- visible range subscription ---

    pub fn subscribe_visible_range_change(&mut self, callback: impl Fn(VisibleRange) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    // --- viewport changes ---

    pub fn set_visible_range(&mut self, start_time: f64, end_time: f64, min_price: f64, max_price: f64) {
        self.viewport.start_time = start_time.min(end_time);
        self.viewport.end_time = start_time.max(end_time);
        self.viewport.min_price = min_price.min(max_price);
        self.viewport.max_price = min_price.max(max_price);
        self.range_changed();
    }

    /// Time zoom around `center_x` (0 = left edge, 1 = right edge).
    pub fn zoom(&mut self, factor: f64, center_x: f64) {
        self.viewport.zoom(factor, center_x.clamp(0.0, 1.0));
        self.range_changed();
    }

    pub fn zoom_price(&mut self, factor: f64, center_y: f64) {
        self.viewport.zoom_price(factor, center_y.clamp(0.0, 1.0));
        self.range_changed();
    }

    /// Pan by fractions of the visible ranges.
    pub fn pan(&mut self, delta_x: f64, delta_y: f64) {
        self.viewport.pan(delta_x, delta_y);
        self.range_changed();
    }

    pub fn resize(&mut self, width: u32, height: u32) -> RenderingResult<()> {
        if width == 0 || height == 0 {
            return Err(AppError::RenderingError(format!(
                "cannot resize chart to {width}x{height}"
            )));
        }
        self.viewport.width = width;
        self.viewport.height = height;
        self.range_changed();
        Ok(())
    }

    /// Frame all candles with a little breathing room on both axes.
    pub fn fit_to_candles(&mut self, candles: &[Candle]) {
        let (Some(first), Some(last), Some((low, high))) =
            (candles.first(), candles.last(), price_range(candles))
        else {
            return;
        };
        let (start, end) = (first.timestamp.value() as f64, last.timestamp.value() as f64);
        let time_pad = ((end - start) * 0.02).max(60.0);
        let price_pad = ((high - low) * 0.05).max(high.abs() * 0.001).max(f64::EPSILON);
        self.set_visible_range(start - time_pad, end + time_pad, low - price_pad, high + price_pad);
    }

    /// Fit the price axis to arbitrary values, keeping the time window.
    pub fn fit_prices(&mut self, values: impl IntoIterator<Item = f64>) {
        let bounds = values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| {
            Some(match acc {
                Some((lo, hi)) => (f64::min(lo, v), f64::max(hi, v)),
                None => (v, v),
            })
        });
        let Some((low, high)) = bounds else { return };
        let pad = ((high - low) * 0.05).max(1e-6);
        let (start, end) = (self.viewport.start_time, self.viewport.end_time);
        self.set_visible_range(start, end, low - pad, high + pad);
    }

    fn range_changed(&mut self) {
        self.refresh_views();
        let range = self.visible_range();
        for (_, callback) in &self.subscribers {
            callback(range);
        }
    }

    fn refresh_views(&mut self) {
        let mapper = ViewportMapper { viewport: &self.viewport };
        for primitive in self.series.iter_mut().chain(self.primitives.iter_mut()) {
            primitive.update_all_views(&mapper);
        }
    }

    // --- layers ---

    /// Replace the series layer (candles, indicator lines).
    pub fn set_series(&mut self, series: Vec<Box<dyn Primitive>>) {
        for mut old in self.series.drain(..) {
            old.detached();
        }
        let mapper = ViewportMapper { viewport: &self.viewport };
        self.series = series;
        for primitive in &mut self.series {
            primitive.attached(&mapper);
        }
    }

    /// Attach an overlay. An overlay with the same id is replaced.
    pub fn attach_primitive(&mut self, mut primitive: Box<dyn Primitive>) {
        self.detach_primitive(primitive.id());
        primitive.attached(&ViewportMapper { viewport: &self.viewport });
        self.primitives.push(primitive);
    }

    pub fn detach_primitive(&mut self, id: &str) -> bool {
        let Some(index) = self.primitives.iter().position(|p| p.id() == id) else {
            return false;
        };
        self.primitives.remove(index).detached();
        true
    }

    pub fn detach_all(&mut self) {
        for mut primitive in self.primitives.drain(..).chain(self.series.drain(..)) {
            primitive.detached();
        }
    }

    pub fn primitive_ids(&self) -> Vec<&str> {
        self.primitives.iter().map(|p| p.id()).collect()
    }

    pub fn paint(&self, target: &mut dyn PaintTarget) {
        target.clear();
        for primitive in self.series.iter().chain(self.primitives.iter()) {
            primitive.draw(target);
        }
    }

    /// Rebuild the overlays that mirror the drawing store. Other overlays stay.
    pub fn sync_drawings(&mut self, snapshot: &DrawingSnapshot) {
        self.primitives.retain_mut(|p| {
            let keep = !p.id().starts_with(DRAWING_PREFIX);
            if !keep {
                p.detached();
            }
            keep
        });

        for line in &snapshot.horizontal_lines {
            let options = HorizontalLineOptions {
                color: Color::from_css_or(&line.color, Color::from_css_or(DEFAULT_HORIZONTAL_COLOR, Color::WHITE)),
                width: 1.0,
                label: Some(line.label.clone().unwrap_or_else(|| format!("{:.2}", line.price))),
                ..Default::default()
            };
            let id = format!("{DRAWING_PREFIX}{}", line.id);
            self.attach_primitive(Box::new(HorizontalLinePrimitive::new(id, line.price, options)));
        }

        for line in &snapshot.trend_lines {
            let options = TrendLineOptions {
                color: Color::from_css_or(&line.color, Color::from_css_or(DEFAULT_TREND_COLOR, Color::WHITE)),
                label: line.label.clone(),
                ..Default::default()
            };
            let id = format!("{DRAWING_PREFIX}{}", line.id);
            self.attach_primitive(Box::new(TrendLinePrimitive::new(id, line.points, options)));
        }

        for fib in &snapshot.fibonacci_retracements {
            for primitive in fibonacci_primitives(fib) {
                self.attach_primitive(primitive);
            }
        }

        log_debug!(
            LogComponent::Domain("ChartHost"),
            "synced {} drawings, {} overlays attached",
            snapshot.len(),
            self.primitives.len()
        );
    }
}

/// A translucent band between the anchors plus one dashed segment per level.
fn fibonacci_primitives(fib: &FibonacciRetracement) -> Vec<Box<dyn Primitive>> {
    let color = Color::from_css_or(&fib.color, Color::from_css_or(DEFAULT_FIBONACCI_COLOR, Color::WHITE));
    let (t0, t1) = (fib.start_point.time, fib.end_point.time);
    let mut out: Vec<Box<dyn Primitive>> = Vec::with_capacity(8);

    out.push(Box::new(RectanglePrimitive::new(
        format!("{DRAWING_PREFIX}{}:band", fib.id),
        fib.points(),
        RectangleOptions {
            fill_color: color,
            fill_alpha: FIB_BAND_ALPHA,
            border_color: color,
            border_width: 0.0,
        },
    )));

    for level in fib.levels() {
        let ratio = level.ratio;
        let options = TrendLineOptions {
            color,
            width: 1.0,
            line_style: if ratio == 0.0 || ratio == 1.0 { LineStyle::Solid } else { LineStyle::Dashed },
            show_endpoints: false,
            endpoint_radius: 0.0,
            label: Some(format!("{} ({:.2})", level.label(), level.price)),
        };
        out.push(Box::new(TrendLinePrimitive::new(
            format!("{DRAWING_PREFIX}{}:{}", fib.id, level.label()),
            [Point::new(t0, level.price), Point::new(t1, level.price)],
            options,
        )));
    }
    out
}

impl CoordinateSource for ChartHost {
    fn price_to_coordinate(&self, price: f64) -> Option<f64> {
        ViewportMapper { viewport: &self.viewport }.price_to_coordinate(price)
    }

    fn time_to_coordinate(&self, time: i64) -> Option<f64> {
        ViewportMapper { viewport: &self.viewport }.time_to_coordinate(time)
    }

    fn price_to_coordinate_unclipped(&self, price: f64) -> Option<f64> {
        ViewportMapper { viewport: &self.viewport }.price_to_coordinate_unclipped(price)
    }

    fn media_size(&self) -> (f64, f64) {
        ViewportMapper { viewport: &self.viewport }.media_size()
    }
}

