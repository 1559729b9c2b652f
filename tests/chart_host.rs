use std::cell::RefCell;
use std::rc::Rc;

use trading_chart_wasm::domain::errors::AppError;
use trading_chart_wasm::domain::chart::primitives::{HorizontalLineOptions, HorizontalLinePrimitive};
use trading_chart_wasm::domain::chart::{ChartHost, CoordinateSource, PaintCommand, RecordingTarget, VisibleRange};
use trading_chart_wasm::domain::drawing::{
    DrawingId, DrawingSnapshot, FibonacciRetracement, HorizontalLine, Point, TrendLine,
};
use trading_chart_wasm::domain::market_data::{Candle, OHLCV, Price, Timestamp, Volume};
use wasm_bindgen_test::*;

fn host() -> ChartHost {
    let mut host = ChartHost::new(200, 100, 1.0).unwrap();
    host.set_visible_range(0.0, 100.0, 0.0, 100.0);
    host
}

fn snapshot() -> DrawingSnapshot {
    DrawingSnapshot {
        horizontal_lines: vec![HorizontalLine {
            id: DrawingId::from("h1"),
            time: 50,
            price: 50.0,
            color: "#2196F3".to_string(),
            label: None,
        }],
        trend_lines: vec![TrendLine {
            id: DrawingId::from("t1"),
            points: [Point::new(10, 10.0), Point::new(90, 90.0)],
            color: "#FF9800".to_string(),
            label: None,
        }],
        fibonacci_retracements: vec![FibonacciRetracement {
            id: DrawingId::from("f1"),
            start_point: Point::new(20, 80.0),
            end_point: Point::new(80, 20.0),
            color: "#9C27B0".to_string(),
        }],
    }
}

#[wasm_bindgen_test]
fn zero_sized_container_is_rejected() {
    assert!(matches!(ChartHost::new(0, 100, 1.0), Err(AppError::RenderingError(_))));
    assert!(matches!(host().resize(100, 0), Err(AppError::RenderingError(_))));
}

#[wasm_bindgen_test]
fn unmeasured_canvas_fails_until_it_has_a_layout_size() {
    assert!(matches!(ChartHost::from_measured(0, 0, 1.0), Err(AppError::RenderingError(_))));
    assert!(matches!(ChartHost::from_measured(-1, 300, 2.0), Err(AppError::RenderingError(_))));

    let host = ChartHost::from_measured(640, 300, 2.0).expect("measured canvas");
    assert_eq!((host.viewport().width, host.viewport().height), (640, 300));
}

#[wasm_bindgen_test]
fn invalid_pixel_ratio_falls_back_to_one() {
    let host = ChartHost::new(10, 10, f64::NAN).unwrap();
    assert_eq!(host.pixel_ratio(), 1.0);
}

#[wasm_bindgen_test]
fn unmeasured_host_maps_nothing() {
    let host = ChartHost::new(200, 100, 1.0).unwrap();
    assert_eq!(host.time_to_coordinate(0), None);
    assert_eq!(host.x_to_time(10.0), None);
}

#[wasm_bindgen_test]
fn coordinates_round_trip_through_pixels() {
    let host = host();
    assert_eq!(host.time_to_coordinate(25), Some(50.0));
    assert_eq!(host.price_to_coordinate(75.0), Some(25.0));
    assert_eq!(host.x_to_time(50.0), Some(25));
    assert_eq!(host.y_to_price(25.0), Some(75.0));
    assert_eq!(host.price_to_coordinate(101.0), None);
    assert_eq!(host.price_to_coordinate_unclipped(200.0), Some(-100.0));
}

#[wasm_bindgen_test]
fn range_subscribers_hear_every_change_until_unsubscribed() {
    let mut host = host();
    let seen: Rc<RefCell<Vec<VisibleRange>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let id = host.subscribe_visible_range_change(move |range| sink.borrow_mut().push(range));

    host.pan(0.5, 0.0);
    host.zoom(2.0, 0.5);
    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(seen.borrow()[0], VisibleRange { from: 50.0, to: 150.0 });
    assert_eq!(seen.borrow()[1], VisibleRange { from: 75.0, to: 125.0 });

    assert!(host.unsubscribe(id));
    assert!(!host.unsubscribe(id));
    host.pan(0.1, 0.0);
    assert_eq!(seen.borrow().len(), 2);
}

#[wasm_bindgen_test]
fn viewport_change_moves_attached_primitives() {
    let mut host = host();
    host.attach_primitive(Box::new(HorizontalLinePrimitive::new("level", 50.0, HorizontalLineOptions::default())));

    let mut target = RecordingTarget::new(200.0, 100.0, 1.0);
    host.paint(&mut target);
    assert!(target.commands.contains(&PaintCommand::FillRect { x: 0.0, y: 50.0, width: 200.0, height: 1.0 }));

    host.set_visible_range(0.0, 100.0, 0.0, 200.0);
    let mut target = RecordingTarget::new(200.0, 100.0, 1.0);
    host.paint(&mut target);
    assert!(target.commands.contains(&PaintCommand::FillRect { x: 0.0, y: 75.0, width: 200.0, height: 1.0 }));
}

#[wasm_bindgen_test]
fn paint_clears_before_drawing() {
    let host = host();
    let mut target = RecordingTarget::new(200.0, 100.0, 1.0);
    host.paint(&mut target);
    assert_eq!(target.commands, vec![PaintCommand::Clear]);
}

#[wasm_bindgen_test]
fn attaching_the_same_id_replaces() {
    let mut host = host();
    host.attach_primitive(Box::new(HorizontalLinePrimitive::new("level", 10.0, HorizontalLineOptions::default())));
    host.attach_primitive(Box::new(HorizontalLinePrimitive::new("level", 20.0, HorizontalLineOptions::default())));
    assert_eq!(host.primitive_ids(), vec!["level"]);
    assert!(host.detach_primitive("level"));
    assert!(!host.detach_primitive("level"));
}

#[wasm_bindgen_test]
fn drawings_become_overlays() {
    let mut host = host();
    host.sync_drawings(&snapshot());
    let ids = host.primitive_ids();

    // 1 horizontal + 1 trend + band and 7 levels for the retracement
    assert_eq!(ids.len(), 10);
    assert!(ids.contains(&"drawing:h1"));
    assert!(ids.contains(&"drawing:t1"));
    assert!(ids.contains(&"drawing:f1:band"));
    assert!(ids.contains(&"drawing:f1:61.8%"));
    assert!(ids.contains(&"drawing:f1:0%"));
    assert!(ids.contains(&"drawing:f1:100%"));
}

#[wasm_bindgen_test]
fn resync_replaces_drawing_overlays_and_keeps_others() {
    let mut host = host();
    host.attach_primitive(Box::new(HorizontalLinePrimitive::new("alert", 42.0, HorizontalLineOptions::default())));
    host.sync_drawings(&snapshot());
    host.sync_drawings(&snapshot());
    assert_eq!(host.primitive_ids().len(), 11);

    host.sync_drawings(&DrawingSnapshot::default());
    assert_eq!(host.primitive_ids(), vec!["alert"]);
}

#[wasm_bindgen_test]
fn horizontal_drawing_is_labelled_with_its_price() {
    let mut host = host();
    host.sync_drawings(&snapshot());
    let mut target = RecordingTarget::new(200.0, 100.0, 1.0);
    host.paint(&mut target);
    let labels: Vec<&str> = target
        .commands
        .iter()
        .filter_map(|c| match c {
            PaintCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert!(labels.contains(&"50.00"));
    assert!(labels.contains(&"50% (50.00)"));
    assert!(labels.contains(&"61.8% (42.92)"));
}

#[wasm_bindgen_test]
fn detach_all_empties_both_layers() {
    let mut host = host();
    host.sync_drawings(&snapshot());
    host.detach_all();
    assert!(host.primitive_ids().is_empty());
    let mut target = RecordingTarget::new(200.0, 100.0, 1.0);
    host.paint(&mut target);
    assert_eq!(target.commands, vec![PaintCommand::Clear]);
}

#[wasm_bindgen_test]
fn fit_to_candles_pads_both_axes() {
    let candles: Vec<Candle> = (0..10)
        .map(|i| {
            let base = 100.0 + i as f64;
            Candle::new(
                Timestamp::from(i * 3_600),
                OHLCV::new(
                    Price::from(base),
                    Price::from(base + 2.0),
                    Price::from(base - 2.0),
                    Price::from(base + 1.0),
                    Volume::from(1.0),
                ),
            )
        })
        .collect();
    let mut host = ChartHost::new(200, 100, 1.0).unwrap();
    host.fit_to_candles(&candles);
    let vp = host.viewport();
    assert!(vp.start_time < 0.0 && vp.end_time > 32_400.0);
    assert!(vp.min_price < 98.0 && vp.max_price > 111.0);
    assert!(vp.is_measured());
}

#[wasm_bindgen_test]
fn fit_prices_keeps_the_time_window() {
    let mut host = host();
    host.fit_prices([30.0, 70.0, f64::NAN]);
    let vp = host.viewport();
    assert_eq!((vp.start_time, vp.end_time), (0.0, 100.0));
    assert!((vp.min_price - 28.0).abs() < 1e-9);
    assert!((vp.max_price - 72.0).abs() < 1e-9);
}
