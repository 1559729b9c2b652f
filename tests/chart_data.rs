use trading_chart_wasm::infrastructure::http::chart_data_client::ChartDataResponse;
use wasm_bindgen_test::*;

const BODY: &str = r#"{
    "symbol": "BTCUSDT",
    "timeframe": "1h",
    "source": "exchange",
    "candles": [
        {"time": 7200, "open": 101.0, "high": 103.0, "low": 100.0, "close": 102.0, "volume": 5.0},
        {"time": 3600, "open": 100.0, "high": 102.0, "low": 99.0, "close": 101.0, "volume": 4.0},
        {"time": 3600, "open": 100.0, "high": 102.0, "low": 99.0, "close": 101.0, "volume": 4.0},
        {"time": 10800, "open": 102.0, "high": 101.0, "low": 100.0, "close": 102.5},
        {"time": 14400, "open": 102.0, "high": 104.0, "low": 101.5, "close": 103.0}
    ]
}"#;

#[wasm_bindgen_test]
fn candles_are_sorted_deduplicated_and_validated() {
    let response: ChartDataResponse = serde_json::from_str(BODY).unwrap();
    assert_eq!(response.source, "exchange");

    let candles = response.into_candles();
    let times: Vec<i64> = candles.iter().map(|c| c.timestamp.value()).collect();
    assert_eq!(times, vec![3600, 7200, 14400]);
    assert_eq!(candles[2].ohlcv.volume.value(), 0.0);
    assert_eq!(candles[1].ohlcv.close.value(), 102.0);
}

#[wasm_bindgen_test]
fn missing_source_defaults_to_empty() {
    let response: ChartDataResponse =
        serde_json::from_str(r#"{"symbol": "ETHUSDT", "timeframe": "1d", "candles": []}"#).unwrap();
    assert!(response.source.is_empty());
    assert!(response.into_candles().is_empty());
}
