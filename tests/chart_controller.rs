use trading_chart_wasm::application::ChartController;
use trading_chart_wasm::application::chart_controller::indicator_lines;
use trading_chart_wasm::application::stores::DrawingStore;
use trading_chart_wasm::domain::chart::primitives::Primitive;
use trading_chart_wasm::domain::chart::{ChartHost, ChartType, PaintCommand, RecordingTarget};
use trading_chart_wasm::domain::drawing::{
    DEFAULT_HORIZONTAL_COLOR, DEFAULT_TREND_COLOR, Drawing, DrawingTool, HorizontalLine, Point, ToolState,
};
use trading_chart_wasm::domain::market_data::{
    Candle, IndicatorConfig, IndicatorKind, OHLCV, Price, Timestamp, Volume, heikin_ashi,
};

fn controller() -> ChartController {
    let mut host = ChartHost::new(200, 100, 1.0).unwrap();
    host.set_visible_range(0.0, 100.0, 0.0, 100.0);
    ChartController::new(host)
}

fn candles(n: i64) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 100.0 + i as f64;
            Candle::new(
                Timestamp::from(i * 60),
                OHLCV::new(
                    Price::from(close - 0.5),
                    Price::from(close + 1.0),
                    Price::from(close - 1.0),
                    Price::from(close),
                    Volume::from(10.0),
                ),
            )
        })
        .collect()
}

#[test]
fn two_pixel_clicks_make_a_trend_line() {
    let store = DrawingStore::new();
    let mut ctrl = controller();
    ctrl.select_tool(&store, DrawingTool::Trendline);

    assert!(ctrl.handle_click_px(&store, 20.0, 75.0).is_none());
    let drawing = ctrl.handle_click_px(&store, 180.0, 25.0).expect("second click completes");

    let Drawing::Trend(line) = drawing else { panic!("expected a trend line") };
    assert_eq!(line.points, [Point::new(10, 25.0), Point::new(90, 75.0)]);
    assert_eq!(line.color, DEFAULT_TREND_COLOR);
    assert_eq!(store.trend_lines(), vec![line]);
    assert_eq!(store.active_tool(), DrawingTool::None);
    assert_eq!(ctrl.tool_state(), ToolState::Idle);
}

#[test]
fn horizontal_line_remembers_the_clicked_time() {
    let store = DrawingStore::new();
    let mut ctrl = controller();
    ctrl.select_tool(&store, DrawingTool::Horizontal);

    let Some(Drawing::Horizontal(line)) = ctrl.handle_click_px(&store, 50.0, 50.0) else {
        panic!("expected a horizontal line")
    };
    assert_eq!(
        line,
        HorizontalLine {
            id: line.id.clone(),
            time: 25,
            price: 50.0,
            color: DEFAULT_HORIZONTAL_COLOR.to_string(),
            label: None,
        }
    );
    assert_eq!(Drawing::Horizontal(line).points(), vec![Point::new(25, 50.0)]);
}

#[test]
fn clicks_without_a_tool_do_nothing() {
    let store = DrawingStore::new();
    let mut ctrl = controller();
    assert!(ctrl.handle_click_px(&store, 50.0, 50.0).is_none());
    assert!(store.is_empty());
}

#[test]
fn unmeasured_chart_ignores_clicks() {
    let store = DrawingStore::new();
    let mut ctrl = ChartController::new(ChartHost::new(200, 100, 1.0).unwrap());
    ctrl.select_tool(&store, DrawingTool::Horizontal);
    assert!(ctrl.handle_click_px(&store, 50.0, 50.0).is_none());
    assert_eq!(ctrl.tool_state(), ToolState::AwaitingHorizontal);
}

#[test]
fn follow_tool_keeps_a_pending_point_for_the_same_tool() {
    let store = DrawingStore::new();
    let mut ctrl = controller();
    ctrl.select_tool(&store, DrawingTool::Fibonacci);
    ctrl.handle_click_at(&store, Point::new(10, 50.0));

    ctrl.follow_tool(DrawingTool::Fibonacci);
    assert_eq!(ctrl.tool_state().pending_point(), Some(Point::new(10, 50.0)));

    ctrl.follow_tool(DrawingTool::Horizontal);
    assert_eq!(ctrl.tool_state(), ToolState::AwaitingHorizontal);
}

#[test]
fn refresh_mirrors_the_store() {
    let store = DrawingStore::new();
    let mut ctrl = controller();
    ctrl.select_tool(&store, DrawingTool::Horizontal);
    let drawing = ctrl.handle_click_at(&store, Point::new(10, 50.0)).unwrap();

    ctrl.refresh_from_store(&store);
    let expected = format!("drawing:{}", drawing.id());
    assert_eq!(ctrl.host().primitive_ids(), vec![expected.as_str()]);
}

#[test]
fn market_data_fits_the_view_and_builds_series() {
    let mut ctrl = controller();
    let sma = IndicatorConfig::with_defaults(IndicatorKind::Sma);
    ctrl.set_market_data(candles(30), &[sma]);
    assert_eq!(ctrl.candles().len(), 30);

    let vp = ctrl.host().viewport();
    assert!(vp.start_time < 0.0 && vp.end_time > 29.0 * 60.0);

    let mut target = RecordingTarget::new(200.0, 100.0, 1.0);
    ctrl.host().paint(&mut target);
    let rects = target.shapes().iter().filter(|c| matches!(c, PaintCommand::FillRect { .. })).count();
    let segments = target.shapes().iter().filter(|c| matches!(c, PaintCommand::Segment { .. })).count();
    // wick + body per candle; SMA(20) is defined for the last 11 candles
    assert_eq!(rects, 60);
    assert_eq!(segments, 10);
}

#[test]
fn line_chart_plots_closes_instead_of_bars() {
    let mut ctrl = controller();
    ctrl.set_market_data(candles(5), &[]);
    ctrl.set_chart_type(ChartType::Line, &[]);

    let mut target = RecordingTarget::new(200.0, 100.0, 1.0);
    ctrl.host().paint(&mut target);
    let shapes = target.shapes();
    assert!(shapes.iter().all(|c| matches!(c, PaintCommand::Segment { .. })));
    assert_eq!(shapes.len(), 4);
}

#[test]
fn bundle_indicators_produce_one_line_per_output() {
    let macd = IndicatorConfig::with_defaults(IndicatorKind::Macd);
    let bands = IndicatorConfig::with_defaults(IndicatorKind::Bollinger);
    let lines = indicator_lines(&candles(40), &[macd.clone(), bands]);
    assert_eq!(lines.len(), 6);
    assert!(lines[0].id().starts_with(&format!("indicator:{}:", macd.id)));
}

fn paint_counts(ctrl: &ChartController) -> (usize, usize) {
    let mut target = RecordingTarget::new(200.0, 100.0, 1.0);
    ctrl.host().paint(&mut target);
    let shapes = target.shapes();
    let rects = shapes.iter().filter(|c| matches!(c, PaintCommand::FillRect { .. })).count();
    let segments = shapes.iter().filter(|c| matches!(c, PaintCommand::Segment { .. })).count();
    (rects, segments)
}

#[test]
fn ohlc_chart_draws_open_and_close_ticks() {
    let mut ctrl = controller();
    ctrl.set_market_data(candles(5), &[]);
    assert_eq!(paint_counts(&ctrl), (10, 0));

    ctrl.set_chart_type(ChartType::Ohlc, &[]);
    // high-low bar, open tick, close tick
    assert_eq!(paint_counts(&ctrl), (15, 0));
}

#[test]
fn heikin_chart_paints_derived_bars() {
    let mut ctrl = controller();
    ctrl.set_market_data(candles(5), &[]);
    ctrl.set_chart_type(ChartType::Heikin, &[]);
    assert_eq!(paint_counts(&ctrl), (10, 0));
}

#[test]
fn heikin_ashi_averages_the_previous_bar() {
    let bars = heikin_ashi(&candles(2));
    let ohlc = |c: &Candle| (c.ohlcv.open.value(), c.ohlcv.high.value(), c.ohlcv.low.value(), c.ohlcv.close.value());

    assert_eq!(ohlc(&bars[0]), (99.75, 101.0, 99.0, 99.875));
    assert_eq!(ohlc(&bars[1]), (99.8125, 102.0, 99.8125, 100.875));
    assert_eq!(bars[1].timestamp, Timestamp::from(60));
    assert_eq!(bars[1].ohlcv.volume, Volume::from(10.0));
    assert!(heikin_ashi(&[]).is_empty());
}

#[test]
fn oscillators_compute_from_candle_ranges() {
    let stoch = IndicatorConfig::with_defaults(IndicatorKind::Stochastic);
    let obv = IndicatorConfig::with_defaults(IndicatorKind::Obv);
    let lines = indicator_lines(&candles(30), &[stoch.clone(), obv.clone()]);
    let ids: Vec<String> = lines.iter().map(|l| l.id().to_string()).collect();
    assert_eq!(
        ids,
        vec![
            format!("indicator:{}:k", stoch.id),
            format!("indicator:{}:d", stoch.id),
            format!("indicator:{}:value", obv.id),
        ]
    );
    // every close is a new high, so OBV adds volume on each bar after the first
    assert_eq!(lines[2].values().last(), Some(290.0));
}
