use std::cell::Cell;
use std::rc::Rc;

use leptos::*;
use trading_chart_wasm::application::stores::DrawingStore;
use trading_chart_wasm::domain::drawing::{
    Drawing, DrawingId, DrawingTool, FibonacciRetracement, HorizontalLine, Point, TrendLine,
};

fn horizontal(id: &str, price: f64) -> HorizontalLine {
    HorizontalLine { id: DrawingId::from(id), time: 0, price, color: "#2196F3".to_string(), label: None }
}

fn trend(id: &str) -> TrendLine {
    TrendLine {
        id: DrawingId::from(id),
        points: [Point::new(0, 1.0), Point::new(60, 2.0)],
        color: "#FF9800".to_string(),
        label: None,
    }
}

fn fib(id: &str) -> FibonacciRetracement {
    FibonacciRetracement {
        id: DrawingId::from(id),
        start_point: Point::new(0, 100.0),
        end_point: Point::new(60, 200.0),
        color: "#9C27B0".to_string(),
    }
}

#[test]
fn adding_a_drawing_resets_the_tool() {
    let store = DrawingStore::new();
    store.set_active_tool(DrawingTool::Trendline);
    store.add_trend_line(trend("t1"));
    assert_eq!(store.active_tool(), DrawingTool::None);
    assert_eq!(store.trend_lines().len(), 1);
}

#[test]
fn add_routes_by_kind() {
    let store = DrawingStore::new();
    store.add(Drawing::Horizontal(horizontal("h1", 10.0)));
    store.add(Drawing::Trend(trend("t1")));
    store.add(Drawing::Fibonacci(fib("f1")));
    assert_eq!(store.horizontal_lines().len(), 1);
    assert_eq!(store.trend_lines().len(), 1);
    assert_eq!(store.fibonacci_retracements().len(), 1);
    assert_eq!(store.len(), 3);
}

#[test]
fn clear_all_is_idempotent() {
    let store = DrawingStore::new();
    store.add_horizontal_line(horizontal("h1", 10.0));
    store.set_active_tool(DrawingTool::Fibonacci);
    store.clear_all();
    assert!(store.is_empty());
    assert_eq!(store.active_tool(), DrawingTool::None);
    store.clear_all();
    assert!(store.is_empty());
}

#[test]
fn remove_by_id_touches_only_that_drawing() {
    let store = DrawingStore::new();
    store.add_horizontal_line(horizontal("h1", 10.0));
    store.add_horizontal_line(horizontal("h2", 20.0));
    store.add_fibonacci_retracement(fib("f1"));

    store.remove(&DrawingId::from("h1"));
    assert_eq!(store.horizontal_lines(), vec![horizontal("h2", 20.0)]);
    assert!(store.contains(&DrawingId::from("f1")));

    store.remove_fibonacci_retracement(&DrawingId::from("f1"));
    assert!(!store.contains(&DrawingId::from("f1")));
}

#[test]
fn replace_id_rekeys_in_place() {
    let store = DrawingStore::new();
    store.add_trend_line(trend("local"));
    assert!(store.replace_id(&DrawingId::from("local"), &DrawingId::from("42")));
    assert!(store.contains(&DrawingId::from("42")));
    assert!(!store.contains(&DrawingId::from("local")));
    assert!(!store.replace_id(&DrawingId::from("missing"), &DrawingId::from("43")));
}

#[test]
fn snapshot_effect_reruns_on_change() {
    let store = DrawingStore::new();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    create_effect(move |_| {
        let _ = store.snapshot();
        counter.set(counter.get() + 1);
    });
    let initial = runs.get();

    store.add_horizontal_line(horizontal("h1", 10.0));
    assert!(runs.get() > initial);

    // Removing something that is not there does not notify.
    let before = runs.get();
    store.remove(&DrawingId::from("nope"));
    assert_eq!(runs.get(), before);
}
