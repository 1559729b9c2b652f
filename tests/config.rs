use trading_chart_wasm::config::AppConfig;
use trading_chart_wasm::domain::errors::AppError;
use trading_chart_wasm::domain::logging::LogLevel;
use trading_chart_wasm::domain::market_data::TimeInterval;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn empty_object_gives_defaults() {
    let config = AppConfig::from_json("{}").unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.api_base_url, "http://localhost:8000/api");
    assert_eq!(config.default_interval, TimeInterval::OneHour);
    assert_eq!(config.log_level(), LogLevel::Info);
}

#[wasm_bindgen_test]
fn camel_case_overrides() {
    let config = AppConfig::from_json(
        r#"{"apiBaseUrl": "https://charts.example/api", "userId": "u-42",
            "defaultSymbol": "ethusdt", "defaultInterval": "15m", "logLevel": "debug",
            "chartWidth": 1280, "chartHeight": 720}"#,
    )
    .unwrap();
    assert_eq!(config.api_base_url, "https://charts.example/api");
    assert_eq!(config.user_id, "u-42");
    assert_eq!(config.symbol().map(|s| s.value().to_string()), Some("ETHUSDT".to_string()));
    assert_eq!(config.default_interval, TimeInterval::FifteenMinutes);
    assert_eq!(config.log_level(), LogLevel::Debug);
    assert_eq!((config.chart_width, config.chart_height), (1280, 720));
}

#[wasm_bindgen_test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{"apiBaseUrl": "  "}"#,
        r#"{"chartWidth": 0}"#,
        r#"{"pixelRatioOverride": -2.0}"#,
    ] {
        assert!(matches!(AppConfig::from_json(json), Err(AppError::ValidationError(_))), "{json}");
    }
    assert!(matches!(AppConfig::from_json("not json"), Err(AppError::ParseError(_))));
}

#[wasm_bindgen_test]
fn unknown_log_level_falls_back_to_info() {
    let config = AppConfig { log_level: "chatty".to_string(), ..AppConfig::default() };
    assert_eq!(config.log_level(), LogLevel::Info);
}

#[wasm_bindgen_test]
fn pixel_ratio_prefers_the_override() {
    let config = AppConfig::default();
    assert_eq!(config.pixel_ratio(2.0), 2.0);
    assert_eq!(config.pixel_ratio(0.0), 1.0);
    let fixed = AppConfig { pixel_ratio_override: Some(1.5), ..AppConfig::default() };
    assert_eq!(fixed.pixel_ratio(3.0), 1.5);
}

#[wasm_bindgen_test]
fn blank_symbol_has_no_value() {
    assert!(AppConfig::default().with_default_symbol("   ").symbol().is_none());
}
