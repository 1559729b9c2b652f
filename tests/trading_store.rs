use trading_chart_wasm::application::stores::TradingStore;
use trading_chart_wasm::domain::chart::ChartType;
use trading_chart_wasm::domain::drawing::DrawingScope;
use trading_chart_wasm::domain::market_data::{Symbol, TimeInterval};

#[test]
fn scope_follows_the_selection() {
    let store = TradingStore::new(Symbol::new("btcusdt".to_string()).ok(), TimeInterval::OneHour);
    assert_eq!(store.scope_for("u1"), DrawingScope::new("u1", "BTCUSDT", "1h"));

    store.set_timeframe(TimeInterval::FourHours);
    store.set_symbol(Symbol::new("ETHUSDT".to_string()).ok());
    assert_eq!(store.scope_for("u1"), DrawingScope::new("u1", "ETHUSDT", "4h"));
}

#[test]
fn missing_symbol_gives_an_incomplete_scope() {
    let store = TradingStore::new(None, TimeInterval::OneDay);
    assert!(!store.scope_for("u1").is_complete());
}

#[test]
fn chart_type_defaults_to_candles() {
    let store = TradingStore::new(None, TimeInterval::OneMinute);
    assert_eq!(store.chart_type(), ChartType::Candlestick);
    store.set_chart_type(ChartType::Line);
    assert_eq!(store.chart_type(), ChartType::Line);
}
