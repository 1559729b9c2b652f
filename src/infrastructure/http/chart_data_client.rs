use serde::Deserialize;

use super::GlooHttpClient;
use crate::domain::errors::NetworkResult;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Candle, OHLCV, Price, Symbol, TimeInterval, Timestamp, Volume};
use crate::{log_info, log_warn};

const COMPONENT: LogComponent = LogComponent::Infrastructure("ChartData");

/// One bar as served by the chart data endpoint. Time is seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct CandleDto {
    pub time: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartDataResponse {
    pub symbol: String,
    pub timeframe: String,
    pub candles: Vec<CandleDto>,
    #[serde(default)]
    pub source: String,
}

impl ChartDataResponse {
    /// Valid candles sorted by time; malformed bars are skipped.
    pub fn into_candles(self) -> Vec<Candle> {
        let total = self.candles.len();
        let mut candles: Vec<Candle> = self
            .candles
            .into_iter()
            .filter_map(|dto| {
                let ohlcv = OHLCV {
                    open: Price::from(dto.open),
                    high: Price::from(dto.high),
                    low: Price::from(dto.low),
                    close: Price::from(dto.close),
                    volume: Volume::from(dto.volume),
                };
                (dto.time.is_finite() && ohlcv.is_valid())
                    .then(|| Candle::new(Timestamp::from(dto.time as i64), ohlcv))
            })
            .collect();
        if candles.len() < total {
            log_warn!(COMPONENT, "skipped {} malformed candles", total - candles.len());
        }
        candles.sort_by_key(|c| c.timestamp.value());
        candles.dedup_by_key(|c| c.timestamp.value());
        candles
    }
}

/// Client for `GET {base}/chart/data/{symbol}`.
#[derive(Debug, Clone)]
pub struct ChartDataClient {
    http: GlooHttpClient,
    limit: u32,
}

impl ChartDataClient {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self { http: GlooHttpClient::new(api_base_url), limit: 500 }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, 5000);
        self
    }

    pub async fn fetch_candles(&self, symbol: &Symbol, interval: TimeInterval) -> NetworkResult<Vec<Candle>> {
        let endpoint = format!("chart/data/{}", super::HttpUtils::url_encode(symbol.value()));
        let limit = self.limit.to_string();
        let response: ChartDataResponse = self
            .http
            .get_json(
                &endpoint,
                &[
                    ("timeframe", interval.as_wire_str()),
                    ("limit", limit.as_str()),
                    ("include_alerts", "false"),
                ],
            )
            .await?;
        let source = response.source.clone();
        let candles = response.into_candles();
        log_info!(COMPONENT, "loaded {} candles for {} from {}", candles.len(), symbol, source);
        Ok(candles)
    }
}
