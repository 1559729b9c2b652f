pub use super::value_objects::{OHLCV, Price, Timestamp, Volume};
use serde::{Deserialize, Serialize};

/// Domain entity - Candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: Timestamp,
    pub ohlcv: OHLCV,
}

impl Candle {
    pub fn new(timestamp: Timestamp, ohlcv: OHLCV) -> Self {
        Self { timestamp, ohlcv }
    }

    pub fn is_bullish(&self) -> bool {
        self.ohlcv.close >= self.ohlcv.open
    }

    pub fn close(&self) -> f64 {
        self.ohlcv.close.value()
    }
}

/// Closing prices in candle order, the input every indicator consumes.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(Candle::close).collect()
}

/// Heikin-Ashi bars: each open averages the previous bar's open and close,
/// each close is the mean of the source OHLC. Highs and lows stretch to cover
/// the derived body. Times and volumes carry over unchanged.
pub fn heikin_ashi(candles: &[Candle]) -> Vec<Candle> {
    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        let c = &candle.ohlcv;
        let (open, high, low, close) = (c.open.value(), c.high.value(), c.low.value(), c.close.value());
        let ha_close = (open + high + low + close) / 4.0;
        let ha_open = match out.last() {
            Some(prev) => (prev.ohlcv.open.value() + prev.ohlcv.close.value()) / 2.0,
            None => (open + close) / 2.0,
        };
        let ohlcv = OHLCV::new(
            Price::new(ha_open),
            Price::new(high.max(ha_open).max(ha_close)),
            Price::new(low.min(ha_open).min(ha_close)),
            Price::new(ha_close),
            c.volume,
        );
        out.push(Candle::new(candle.timestamp, ohlcv));
    }
    out
}

/// `(min low, max high)` over the candles, or `None` when empty.
pub fn price_range(candles: &[Candle]) -> Option<(f64, f64)> {
    candles.iter().fold(None, |acc, c| {
        let (lo, hi) = (c.ohlcv.low.value(), c.ohlcv.high.value());
        Some(match acc {
            Some((min, max)) => (f64::min(min, lo), f64::max(max, hi)),
            None => (lo, hi),
        })
    })
}
