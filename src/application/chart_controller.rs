//! Glue between the chart host, the click state machine and the stores.

use crate::application::stores::DrawingStore;
use crate::domain::chart::{ChartHost, ChartType};
use crate::domain::chart::primitives::Primitive;
use crate::domain::chart::series::{BarStyle, CandlestickSeries, LineSeries};
use crate::domain::chart::value_objects::Color;
use crate::domain::drawing::{
    CompletedShape, DEFAULT_FIBONACCI_COLOR, DEFAULT_HORIZONTAL_COLOR, DEFAULT_TREND_COLOR, Drawing,
    DrawingId, DrawingTool, FibonacciRetracement, HorizontalLine, Point, ToolState, TrendLine,
};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Candle, IndicatorConfig, IndicatorOutput, heikin_ashi};
use crate::log_debug;

const COMPONENT: LogComponent = LogComponent::Application("ChartController");

pub struct ChartController {
    host: ChartHost,
    tool_state: ToolState,
    candles: Vec<Candle>,
    chart_type: ChartType,
}

impl ChartController {
    pub fn new(host: ChartHost) -> Self {
        Self { host, tool_state: ToolState::Idle, candles: Vec::new(), chart_type: ChartType::Candlestick }
    }

    pub fn host(&self) -> &ChartHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut ChartHost {
        &mut self.host
    }

    pub fn tool_state(&self) -> ToolState {
        self.tool_state
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Switch tools in the store and in the click machine; a half-placed
    /// drawing is abandoned.
    pub fn select_tool(&mut self, store: &DrawingStore, tool: DrawingTool) {
        store.set_active_tool(tool);
        self.tool_state.select(tool);
    }

    /// Bring the click machine in line with a tool chosen elsewhere (e.g. the
    /// toolbar writing straight to the store). No-op if already on that tool.
    pub fn follow_tool(&mut self, tool: DrawingTool) {
        if self.tool_state.active_tool() != tool {
            self.tool_state.select(tool);
        }
    }

    /// Feed a chart click. A finished drawing is added to the store and
    /// returned so the caller can persist it.
    pub fn handle_click_at(&mut self, store: &DrawingStore, point: Point) -> Option<Drawing> {
        let shape = self.tool_state.click(point)?;
        let drawing = build_drawing(shape);
        log_debug!(COMPONENT, "completed drawing {}", drawing.id());
        store.add(drawing.clone());
        Some(drawing)
    }

    /// Same as [`handle_click_at`](Self::handle_click_at) for a media-pixel
    /// position. Clicks the viewport cannot map are ignored.
    pub fn handle_click_px(&mut self, store: &DrawingStore, x: f64, y: f64) -> Option<Drawing> {
        let point = Point::new(self.host.x_to_time(x)?, self.host.y_to_price(y)?);
        self.handle_click_at(store, point)
    }

    pub fn refresh_from_store(&mut self, store: &DrawingStore) {
        self.host.sync_drawings(&store.snapshot_untracked());
    }

    /// Replace the price history and the overlaid indicator lines, refitting
    /// the viewport to the new candles.
    pub fn set_market_data(&mut self, candles: Vec<Candle>, indicators: &[IndicatorConfig]) {
        self.host.fit_to_candles(&candles);
        self.candles = candles;
        self.rebuild_series(indicators);
    }

    pub fn set_chart_type(&mut self, chart_type: ChartType, indicators: &[IndicatorConfig]) {
        self.chart_type = chart_type;
        self.rebuild_series(indicators);
    }

    /// Price series for the chart type plus main-panel indicator lines.
    /// Line charts plot closes; Heikin-Ashi bars are derived from the candles.
    pub fn rebuild_series(&mut self, indicators: &[IndicatorConfig]) {
        let price: Box<dyn Primitive> = match self.chart_type {
            ChartType::Line => {
                let samples = self.candles.iter().map(|c| (c.timestamp.value(), Some(c.close()))).collect();
                Box::new(LineSeries::new("series:close", samples, Color::from_hex(0x2962FF), 2.0))
            }
            ChartType::Candlestick => Box::new(CandlestickSeries::new(self.candles.clone())),
            ChartType::Ohlc => Box::new(CandlestickSeries::new(self.candles.clone()).with_style(BarStyle::Ohlc)),
            ChartType::Heikin => Box::new(CandlestickSeries::new(heikin_ashi(&self.candles))),
        };
        let mut series = vec![price];
        series.extend(indicator_lines(&self.candles, indicators).into_iter().map(|line| Box::new(line) as Box<dyn Primitive>));
        self.host.set_series(series);
    }
}

/// One line per plotted output of each indicator, aligned with candle times.
pub fn indicator_lines(candles: &[Candle], indicators: &[IndicatorConfig]) -> Vec<LineSeries> {
    let times: Vec<i64> = candles.iter().map(|c| c.timestamp.value()).collect();
    let mut lines = Vec::new();

    for config in indicators {
        let color = Color::from_css_or(&config.color, Color::WHITE);
        let outputs: Vec<(&str, Vec<Option<f64>>)> = match config.compute(candles) {
            IndicatorOutput::Single(values) => vec![("value", values)],
            IndicatorOutput::Bundle(parts) => parts,
        };
        for (index, (name, values)) in outputs.into_iter().enumerate() {
            // Secondary outputs are drawn fainter.
            let color = if index == 0 { color } else { color.with_alpha(0.6) };
            let samples = times.iter().copied().zip(values).collect();
            lines.push(LineSeries::new(format!("indicator:{}:{}", config.id, name), samples, color, 1.5));
        }
    }
    lines
}

fn build_drawing(shape: CompletedShape) -> Drawing {
    let id = DrawingId::generate();
    match shape {
        CompletedShape::Horizontal(point) => Drawing::Horizontal(HorizontalLine {
            id,
            time: point.time,
            price: point.price,
            color: DEFAULT_HORIZONTAL_COLOR.to_string(),
            label: None,
        }),
        CompletedShape::Trendline(points) => Drawing::Trend(TrendLine {
            id,
            points,
            color: DEFAULT_TREND_COLOR.to_string(),
            label: None,
        }),
        CompletedShape::Fibonacci([start_point, end_point]) => Drawing::Fibonacci(FibonacciRetracement {
            id,
            start_point,
            end_point,
            color: DEFAULT_FIBONACCI_COLOR.to_string(),
        }),
    }
}
