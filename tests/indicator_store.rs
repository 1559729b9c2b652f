use trading_chart_wasm::application::stores::IndicatorStore;
use trading_chart_wasm::domain::market_data::IndicatorKind;

#[test]
fn each_instance_gets_its_own_id() {
    let store = IndicatorStore::new();
    let a = store.add_indicator(IndicatorKind::Sma);
    let b = store.add_indicator(IndicatorKind::Sma);
    assert_ne!(a, b);
    assert_eq!(store.list().len(), 2);
}

#[test]
fn panels_split_by_kind_and_visibility() {
    let store = IndicatorStore::new();
    let sma = store.add_indicator(IndicatorKind::Sma);
    store.add_indicator(IndicatorKind::Rsi);
    store.add_indicator(IndicatorKind::Bollinger);

    assert_eq!(store.main_panel().len(), 2);
    assert_eq!(store.lower_panel().len(), 1);

    store.toggle_visibility(&sma);
    assert_eq!(store.main_panel().len(), 1);
    assert_eq!(store.get(&sma).map(|c| c.visible), Some(false));
    store.toggle_visibility(&sma);
    assert_eq!(store.main_panel().len(), 2);
}

#[test]
fn parameters_and_colour_are_editable() {
    let store = IndicatorStore::new();
    let id = store.add_indicator(IndicatorKind::Ema);
    store.set_parameter(&id, "period", 50.0);
    store.set_color(&id, "#ffffff");

    let config = store.get(&id).unwrap();
    assert_eq!(config.parameters.get("period"), Some(&50.0));
    assert_eq!(config.color, "#ffffff");
    assert_eq!(config.title(), "EMA(50)");
}

#[test]
fn remove_and_unknown_ids() {
    let store = IndicatorStore::new();
    let id = store.add_indicator(IndicatorKind::Macd);
    store.toggle_visibility("missing");
    store.remove_indicator(&id);
    assert!(store.list().is_empty());
    assert!(store.get(&id).is_none());
}
