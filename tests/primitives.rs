use trading_chart_wasm::domain::chart::primitives::{
    HorizontalLineOptions, HorizontalLinePrimitive, Primitive, RectangleOptions, RectanglePrimitive,
    TrendLineOptions, TrendLinePrimitive, VerticalLineOptions, VerticalLinePrimitive,
};
use trading_chart_wasm::domain::chart::series::{CandlestickSeries, LineSeries};
use trading_chart_wasm::domain::chart::{
    ChartHost, Color, LineStyle, PaintCommand, PaintTarget, RecordingTarget, TextAlign, TextBaseline,
};
use trading_chart_wasm::domain::drawing::Point;
use trading_chart_wasm::domain::market_data::{Candle, OHLCV, Price, Timestamp, Volume};
use wasm_bindgen_test::*;

/// 200x100 media px showing time 0..100 and price 0..100.
fn host() -> ChartHost {
    let mut host = ChartHost::new(200, 100, 1.0).unwrap();
    host.set_visible_range(0.0, 100.0, 0.0, 100.0);
    host
}

fn draw(primitive: &mut dyn Primitive, pixel_ratio: f64) -> RecordingTarget {
    primitive.update_all_views(&host());
    let mut target = RecordingTarget::new(200.0, 100.0, pixel_ratio);
    primitive.draw(&mut target);
    target
}

fn candle(time: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle::new(
        Timestamp::from(time),
        OHLCV::new(Price::from(open), Price::from(high), Price::from(low), Price::from(close), Volume::from(1.0)),
    )
}

#[wasm_bindgen_test]
fn horizontal_line_spans_the_bitmap_width() {
    let mut line = HorizontalLinePrimitive::new("h", 50.0, HorizontalLineOptions::default());
    let target = draw(&mut line, 2.0);
    assert_eq!(line.view_y(), Some(50.0));
    assert_eq!(
        target.shapes(),
        vec![&PaintCommand::FillRect { x: 0.0, y: 99.0, width: 400.0, height: 2.0 }]
    );
}

#[wasm_bindgen_test]
fn horizontal_line_label_sits_above_the_line() {
    let options = HorizontalLineOptions { label: Some("50.00".to_string()), ..Default::default() };
    let mut line = HorizontalLinePrimitive::new("h", 50.0, options);
    let target = draw(&mut line, 1.0);
    assert!(target.commands.contains(&PaintCommand::Text {
        text: "50.00".to_string(),
        x: 196.0,
        y: 46.0,
        align: TextAlign::Right,
        baseline: TextBaseline::Bottom,
    }));
}

#[wasm_bindgen_test]
fn off_scale_price_draws_nothing() {
    let mut line = HorizontalLinePrimitive::new("h", 150.0, HorizontalLineOptions::default());
    let target = draw(&mut line, 1.0);
    assert_eq!(line.view_y(), None);
    assert!(target.commands.is_empty());
}

#[wasm_bindgen_test]
fn vertical_line_spans_the_bitmap_height() {
    let mut line = VerticalLinePrimitive::new("v", 25, VerticalLineOptions::default());
    let target = draw(&mut line, 1.0);
    assert_eq!(line.view_x(), Some(50.0));
    assert_eq!(
        target.shapes(),
        vec![&PaintCommand::FillRect { x: 50.0, y: 0.0, width: 1.0, height: 100.0 }]
    );
}

#[wasm_bindgen_test]
fn trend_line_scales_dashes_by_line_width() {
    let options = TrendLineOptions {
        width: 2.0,
        line_style: LineStyle::Dashed,
        show_endpoints: false,
        ..Default::default()
    };
    let mut line = TrendLinePrimitive::new("t", [Point::new(0, 0.0), Point::new(100, 100.0)], options);
    let target = draw(&mut line, 1.0);

    assert!(target.commands.contains(&PaintCommand::LineDash(vec![8.0, 8.0])));
    assert!(target.commands.contains(&PaintCommand::Segment { x1: 0.0, y1: 100.0, x2: 200.0, y2: 0.0 }));
    // Dash is reset so later strokes are solid.
    assert_eq!(target.commands.last(), Some(&PaintCommand::LineDash(vec![])));
}

#[wasm_bindgen_test]
fn trend_line_endpoints_are_circles() {
    let options = TrendLineOptions { show_endpoints: true, endpoint_radius: 3.0, ..Default::default() };
    let mut line = TrendLinePrimitive::new("t", [Point::new(0, 0.0), Point::new(50, 50.0)], options);
    let target = draw(&mut line, 1.0);
    let circles = target.shapes().into_iter().filter(|c| matches!(c, PaintCommand::Circle { .. })).count();
    assert_eq!(circles, 2);
}

#[wasm_bindgen_test]
fn trend_line_with_one_point_off_screen_is_hidden() {
    let mut line = TrendLinePrimitive::new(
        "t",
        [Point::new(10, 10.0), Point::new(500, 10.0)],
        TrendLineOptions::default(),
    );
    let target = draw(&mut line, 1.0);
    assert_eq!(line.view(), None);
    assert!(target.shapes().is_empty());
}

#[wasm_bindgen_test]
fn rectangle_fills_with_alpha_and_optional_border() {
    let options = RectangleOptions {
        fill_color: Color::RED,
        fill_alpha: 0.25,
        border_color: Color::from_hex(0x0000FF),
        border_width: 0.0,
    };
    let mut rect = RectanglePrimitive::new("r", [Point::new(50, 75.0), Point::new(25, 25.0)], options.clone());
    let target = draw(&mut rect, 1.0);
    assert_eq!(
        target.commands,
        vec![
            PaintCommand::FillColor("rgba(255, 0, 0, 0.25)".to_string()),
            PaintCommand::FillRect { x: 50.0, y: 25.0, width: 50.0, height: 50.0 },
        ]
    );

    rect.apply_options(RectangleOptions { border_width: 1.0, ..options });
    let target = draw(&mut rect, 1.0);
    assert!(target.shapes().iter().any(|c| matches!(c, PaintCommand::StrokeRect { .. })));
}

#[wasm_bindgen_test]
fn detached_primitive_forgets_its_pixels() {
    let mut line = TrendLinePrimitive::new(
        "t",
        [Point::new(10, 10.0), Point::new(20, 20.0)],
        TrendLineOptions::default(),
    );
    line.update_all_views(&host());
    assert!(line.view().is_some());
    line.detached();
    let mut target = RecordingTarget::new(200.0, 100.0, 1.0);
    line.draw(&mut target);
    assert!(target.commands.is_empty());
}

#[wasm_bindgen_test]
fn candlestick_series_skips_bars_outside_the_window() {
    let mut series = CandlestickSeries::new(vec![
        candle(10, 40.0, 60.0, 30.0, 50.0),
        candle(20, 50.0, 55.0, 20.0, 30.0),
        candle(400, 50.0, 55.0, 20.0, 30.0),
    ]);
    let target = draw(&mut series, 1.0);
    assert_eq!(series.visible_bars(), 2);
    assert!(!target.shapes().is_empty());
    assert!(target.commands.contains(&PaintCommand::FillColor(Color::from_hex(0x26A69A).to_css())));
    assert!(target.commands.contains(&PaintCommand::FillColor(Color::from_hex(0xEF5350).to_css())));
}

#[wasm_bindgen_test]
fn line_series_breaks_at_gaps() {
    let mut series = LineSeries::new(
        "line",
        vec![(0, Some(10.0)), (10, Some(20.0)), (20, None), (30, Some(40.0)), (40, Some(50.0))],
        Color::WHITE,
        1.0,
    );
    let target = draw(&mut series, 1.0);
    let segments = target.shapes().into_iter().filter(|c| matches!(c, PaintCommand::Segment { .. })).count();
    assert_eq!(segments, 2);
    assert_eq!(series.values().count(), 4);
}

#[wasm_bindgen_test]
fn line_series_keeps_off_scale_values() {
    let mut series = LineSeries::new("line", vec![(0, Some(50.0)), (10, Some(250.0))], Color::WHITE, 1.0);
    let target = draw(&mut series, 1.0);
    assert!(target.commands.contains(&PaintCommand::Segment { x1: 0.0, y1: 50.0, x2: 20.0, y2: -150.0 }));
}

#[wasm_bindgen_test]
fn recording_target_reports_bitmap_size() {
    let target = RecordingTarget::new(200.0, 100.0, 1.5);
    assert_eq!(target.bitmap_size(), (300.0, 150.0));
}
