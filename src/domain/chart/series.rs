//! Price series painted beneath the drawing overlays.

use super::coordinates::{align_box, align_line};
use super::host::CoordinateSource;
use super::paint::PaintTarget;
use super::primitives::Primitive;
use super::value_objects::Color;
use crate::domain::market_data::Candle;

#[derive(Debug, Clone, Copy, PartialEq)]
struct CandleBar {
    x: f64,
    open_y: f64,
    high_y: f64,
    low_y: f64,
    close_y: f64,
    bullish: bool,
}

/// How each bar is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarStyle {
    /// Wick plus filled open-close body.
    #[default]
    Candle,
    /// High-low bar with an open tick on the left and a close tick on the right.
    Ohlc,
}

/// Price bars for the loaded history.
#[derive(Debug, Clone)]
pub struct CandlestickSeries {
    candles: Vec<Candle>,
    style: BarStyle,
    bullish_color: Color,
    bearish_color: Color,
    bars: Vec<CandleBar>,
    bar_width: f64,
}

impl CandlestickSeries {
    pub const ID: &'static str = "series:candles";

    pub fn new(candles: Vec<Candle>) -> Self {
        Self {
            candles,
            style: BarStyle::Candle,
            bullish_color: Color::from_hex(0x26A69A),
            bearish_color: Color::from_hex(0xEF5350),
            bars: Vec::new(),
            bar_width: 1.0,
        }
    }

    pub fn with_style(mut self, style: BarStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> BarStyle {
        self.style
    }

    pub fn visible_bars(&self) -> usize {
        self.bars.len()
    }
}

impl Primitive for CandlestickSeries {
    fn id(&self) -> &str {
        Self::ID
    }

    fn detached(&mut self) {
        self.bars.clear();
    }

    fn update_all_views(&mut self, source: &dyn CoordinateSource) {
        self.bars.clear();
        for candle in &self.candles {
            let Some(x) = source.time_to_coordinate(candle.timestamp.value()) else { continue };
            let y = |price: f64| source.price_to_coordinate_unclipped(price);
            let ohlcv = &candle.ohlcv;
            let (Some(open_y), Some(high_y), Some(low_y), Some(close_y)) = (
                y(ohlcv.open.value()),
                y(ohlcv.high.value()),
                y(ohlcv.low.value()),
                y(ohlcv.close.value()),
            ) else {
                continue;
            };
            self.bars.push(CandleBar { x, open_y, high_y, low_y, close_y, bullish: candle.is_bullish() });
        }

        // Body width follows the tightest spacing between neighbouring bars.
        let spacing = self
            .bars
            .windows(2)
            .map(|w| (w[1].x - w[0].x).abs())
            .filter(|d| *d > 0.0)
            .fold(f64::INFINITY, f64::min);
        self.bar_width = if spacing.is_finite() { (spacing * 0.7).max(1.0) } else { 6.0 };
    }

    fn draw(&self, target: &mut dyn PaintTarget) {
        let hr = target.horizontal_pixel_ratio();
        let vr = target.vertical_pixel_ratio();
        for bar in &self.bars {
            let color = if bar.bullish { self.bullish_color } else { self.bearish_color };
            target.set_fill_color(color);

            let wick_x = align_line(bar.x, hr, 1.0);
            let wick_y = align_box(bar.high_y, bar.low_y, vr);
            target.fill_rect(wick_x.position, wick_y.position, wick_x.length, wick_y.length);

            match self.style {
                BarStyle::Candle => {
                    let body_x = align_line(bar.x, hr, self.bar_width);
                    let body_y = align_box(bar.open_y, bar.close_y, vr);
                    target.fill_rect(body_x.position, body_y.position, body_x.length, body_y.length.max(1.0));
                }
                BarStyle::Ohlc => {
                    let tick = ((self.bar_width * 0.5) * hr).round().max(1.0);
                    let open_y = align_line(bar.open_y, vr, 1.0);
                    let close_y = align_line(bar.close_y, vr, 1.0);
                    target.fill_rect(wick_x.position - tick, open_y.position, tick, open_y.length);
                    target.fill_rect(wick_x.position + wick_x.length, close_y.position, tick, close_y.length);
                }
            }
        }
    }
}

/// Polyline through (time, value) samples; gaps break the line.
#[derive(Debug, Clone)]
pub struct LineSeries {
    id: String,
    samples: Vec<(i64, Option<f64>)>,
    color: Color,
    width: f64,
    view: Vec<Option<(f64, f64)>>,
}

impl LineSeries {
    pub fn new(id: impl Into<String>, samples: Vec<(i64, Option<f64>)>, color: Color, width: f64) -> Self {
        Self { id: id.into(), samples, color, width, view: Vec::new() }
    }

    /// Values that can be plotted, for fitting a price axis.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().filter_map(|(_, v)| *v)
    }
}

impl Primitive for LineSeries {
    fn id(&self) -> &str {
        &self.id
    }

    fn detached(&mut self) {
        self.view.clear();
    }

    fn update_all_views(&mut self, source: &dyn CoordinateSource) {
        self.view = self
            .samples
            .iter()
            .map(|(time, value)| {
                let value = (*value)?;
                Some((source.time_to_coordinate(*time)?, source.price_to_coordinate_unclipped(value)?))
            })
            .collect();
    }

    fn draw(&self, target: &mut dyn PaintTarget) {
        let hr = target.horizontal_pixel_ratio();
        let vr = target.vertical_pixel_ratio();
        target.set_stroke_color(self.color);
        target.set_line_width((self.width * vr).max(1.0));
        target.set_line_dash(&[]);
        for pair in self.view.windows(2) {
            if let [Some((x1, y1)), Some((x2, y2))] = pair {
                target.stroke_segment(x1 * hr, y1 * vr, x2 * hr, y2 * vr);
            }
        }
    }
}
