use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, EnumIter, EnumString};

use super::entities::Candle;

/// Upper bound for window parameters typed into the indicator panel.
pub const MAX_PERIOD: usize = 10_000;

/// Technical indicator types the chart can plot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    #[display(fmt = "SMA")]
    #[strum(serialize = "sma")]
    Sma,
    #[display(fmt = "EMA")]
    #[strum(serialize = "ema")]
    Ema,
    #[display(fmt = "RSI")]
    #[strum(serialize = "rsi")]
    Rsi,
    #[display(fmt = "MACD")]
    #[strum(serialize = "macd")]
    Macd,
    #[display(fmt = "Bollinger Bands")]
    #[strum(serialize = "bollinger")]
    Bollinger,
    #[display(fmt = "Stochastic")]
    #[strum(serialize = "stochastic")]
    Stochastic,
    #[display(fmt = "ATR")]
    #[strum(serialize = "atr")]
    Atr,
    #[display(fmt = "ADX")]
    #[strum(serialize = "adx")]
    Adx,
    #[display(fmt = "CCI")]
    #[strum(serialize = "cci")]
    Cci,
    #[display(fmt = "Williams %R")]
    #[strum(serialize = "williams_r")]
    #[serde(rename = "williams_r")]
    WilliamsR,
    #[display(fmt = "OBV")]
    #[strum(serialize = "obv")]
    Obv,
}

/// Chart region an indicator renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    /// Overlaid on the price series.
    #[display(fmt = "main")]
    Main,
    /// Separate sub-chart below the price series.
    #[display(fmt = "lower")]
    Lower,
}

impl IndicatorKind {
    /// Parameter names with their defaults, in display order.
    pub fn parameter_defaults(&self) -> &'static [(&'static str, f64)] {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema => &[("period", 20.0)],
            IndicatorKind::Rsi | IndicatorKind::Atr | IndicatorKind::Adx | IndicatorKind::WilliamsR => {
                &[("period", 14.0)]
            }
            IndicatorKind::Cci => &[("period", 20.0)],
            IndicatorKind::Macd => &[("fast", 12.0), ("slow", 26.0), ("signal", 9.0)],
            IndicatorKind::Bollinger => &[("period", 20.0), ("stdDev", 2.0)],
            IndicatorKind::Stochastic => &[("kPeriod", 14.0), ("dPeriod", 3.0)],
            IndicatorKind::Obv => &[],
        }
    }

    pub fn default_parameters(&self) -> BTreeMap<String, f64> {
        self.parameter_defaults().iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Price-scaled indicators overlay the candles; oscillators get their own panel.
    pub fn default_panel(&self) -> Panel {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema | IndicatorKind::Bollinger => Panel::Main,
            _ => Panel::Lower,
        }
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "#2196F3",
            IndicatorKind::Ema => "#FF9800",
            IndicatorKind::Rsi => "#9C27B0",
            IndicatorKind::Macd => "#4CAF50",
            IndicatorKind::Bollinger => "#607D8B",
            IndicatorKind::Stochastic => "#00BCD4",
            IndicatorKind::Atr => "#FF5722",
            IndicatorKind::Adx => "#FFC107",
            IndicatorKind::Cci => "#8BC34A",
            IndicatorKind::WilliamsR => "#E91E63",
            IndicatorKind::Obv => "#795548",
        }
    }
}

/// Time-aligned indicator values. `None` marks warm-up slots.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    Single(Vec<Option<f64>>),
    Bundle(Vec<(&'static str, Vec<Option<f64>>)>),
}

impl IndicatorOutput {
    pub fn series(&self, name: &str) -> Option<&[Option<f64>]> {
        match self {
            IndicatorOutput::Single(values) => (name == "value").then_some(values.as_slice()),
            IndicatorOutput::Bundle(parts) => parts
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, values)| values.as_slice()),
        }
    }
}

/// Indicator instance placed on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub id: String,
    pub kind: IndicatorKind,
    pub parameters: BTreeMap<String, f64>,
    pub color: String,
    pub panel: Panel,
    pub visible: bool,
}

impl IndicatorConfig {
    /// Fresh instance with the kind's defaults and a `<kind>-<uuid>` id.
    pub fn with_defaults(kind: IndicatorKind) -> Self {
        Self {
            id: format!("{}-{}", kind.as_ref(), uuid::Uuid::new_v4()),
            kind,
            parameters: kind.default_parameters(),
            color: kind.default_color().to_string(),
            panel: kind.default_panel(),
            visible: true,
        }
    }

    /// `"SMA(20)"`, `"MACD(12, 26, 9)"`, `"OBV"`.
    pub fn title(&self) -> String {
        let params: Vec<String> = self
            .kind
            .parameter_defaults()
            .iter()
            .filter_map(|(k, _)| self.parameters.get(*k))
            .map(|v| format!("{v}"))
            .collect();
        if params.is_empty() {
            self.kind.to_string()
        } else {
            format!("{}({})", self.kind, params.join(", "))
        }
    }

    pub fn compute(&self, candles: &[Candle]) -> IndicatorOutput {
        compute(self.kind, &self.parameters, candles)
    }
}

/// Window length from a user-edited parameter. Non-finite values use the
/// default; everything else is rounded into `1..=MAX_PERIOD`.
fn period_param(params: &BTreeMap<String, f64>, key: &str, default: f64) -> usize {
    let value = params.get(key).copied().filter(|v| v.is_finite()).unwrap_or(default);
    value.round().clamp(1.0, MAX_PERIOD as f64) as usize
}

/// Compute an indicator over candles using its parameter map.
pub fn compute(kind: IndicatorKind, params: &BTreeMap<String, f64>, candles: &[Candle]) -> IndicatorOutput {
    let close = super::entities::closes(candles);
    let high: Vec<f64> = candles.iter().map(|c| c.ohlcv.high.value()).collect();
    let low: Vec<f64> = candles.iter().map(|c| c.ohlcv.low.value()).collect();
    let period = |default| period_param(params, "period", default);

    match kind {
        IndicatorKind::Sma => IndicatorOutput::Single(sma(&close, period(20.0))),
        IndicatorKind::Ema => IndicatorOutput::Single(ema(&close, period(20.0))),
        IndicatorKind::Rsi => IndicatorOutput::Single(rsi(&close, period(14.0))),
        IndicatorKind::Macd => {
            let m = macd(
                &close,
                period_param(params, "fast", 12.0),
                period_param(params, "slow", 26.0),
                period_param(params, "signal", 9.0),
            );
            IndicatorOutput::Bundle(vec![("macd", m.macd), ("signal", m.signal), ("histogram", m.histogram)])
        }
        IndicatorKind::Bollinger => {
            let std_dev = params.get("stdDev").copied().filter(|v| v.is_finite()).unwrap_or(2.0);
            let b = bollinger(&close, period(20.0), std_dev);
            IndicatorOutput::Bundle(vec![("upper", b.upper), ("middle", b.middle), ("lower", b.lower)])
        }
        IndicatorKind::Stochastic => {
            let s = stochastic(
                &high,
                &low,
                &close,
                period_param(params, "kPeriod", 14.0),
                period_param(params, "dPeriod", 3.0),
            );
            IndicatorOutput::Bundle(vec![("k", s.k), ("d", s.d)])
        }
        IndicatorKind::Atr => IndicatorOutput::Single(atr(&high, &low, &close, period(14.0))),
        IndicatorKind::Adx => {
            let a = adx(&high, &low, &close, period(14.0));
            IndicatorOutput::Bundle(vec![("adx", a.adx), ("di_plus", a.di_plus), ("di_minus", a.di_minus)])
        }
        IndicatorKind::Cci => IndicatorOutput::Single(cci(&high, &low, &close, period(20.0))),
        IndicatorKind::WilliamsR => IndicatorOutput::Single(williams_r(&high, &low, &close, period(14.0))),
        IndicatorKind::Obv => {
            let volume: Vec<f64> = candles.iter().map(|c| c.ohlcv.volume.value()).collect();
            IndicatorOutput::Single(obv(&close, &volume))
        }
    }
}

/// Simple moving average; the first `period - 1` slots are empty.
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; data.len()];
    if period == 0 || data.len() < period {
        return out;
    }
    let mut sum: f64 = data[..period].iter().sum();
    out[period - 1] = Some(sum / period as f64);
    for i in period..data.len() {
        sum += data[i] - data[i - period];
        out[i] = Some(sum / period as f64);
    }
    out
}

/// Rolling mean over optional values; a window with a gap is a gap.
fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for i in period - 1..values.len() {
        let window = &values[i + 1 - period..=i];
        out[i] = window.iter().copied().sum::<Option<f64>>().map(|sum| sum / period as f64);
    }
    out
}

/// Span-based exponential moving average seeded with the first value.
pub fn ema(data: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || data.len() < period {
        return vec![None; data.len()];
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(data.len());
    let mut last: Option<f64> = None;
    for &x in data {
        let v = match last {
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
            None => x,
        };
        last = Some(v);
        out.push(Some(v));
    }
    out
}

/// Span-based EMA with bias-corrected weights: each value is the weighted
/// mean of everything so far with weights `(1 - alpha)^age`.
pub fn ema_adjusted(data: &[f64], span: usize) -> Vec<f64> {
    let decay = 1.0 - 2.0 / (span.max(1) as f64 + 1.0);
    let (mut numerator, mut denominator) = (0.0, 0.0);
    data.iter()
        .map(|&x| {
            numerator = x + decay * numerator;
            denominator = 1.0 + decay * denominator;
            numerator / denominator
        })
        .collect()
}

/// Relative strength index over rolling-mean gains and losses.
pub fn rsi(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; data.len()];
    if period == 0 || data.len() <= period {
        return out;
    }
    let deltas: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
    for i in period..data.len() {
        let window = &deltas[i - period..i];
        let gain = window.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
        let loss = -window.iter().filter(|d| **d < 0.0).sum::<f64>() / period as f64;
        out[i] = if loss == 0.0 {
            (gain > 0.0).then_some(100.0)
        } else {
            Some(100.0 - 100.0 / (1.0 + gain / loss))
        };
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD over bias-corrected EMAs; empty until `slow` closes exist.
pub fn macd(data: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    if data.len() < slow.max(1) {
        let empty = vec![None; data.len()];
        return MacdSeries { macd: empty.clone(), signal: empty.clone(), histogram: empty };
    }
    let fast_ema = ema_adjusted(data, fast);
    let slow_ema = ema_adjusted(data, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = ema_adjusted(&line, signal);
    MacdSeries {
        histogram: line.iter().zip(&signal_line).map(|(m, s)| Some(m - s)).collect(),
        macd: line.into_iter().map(Some).collect(),
        signal: signal_line.into_iter().map(Some).collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Bollinger bands around the SMA using the sample standard deviation.
pub fn bollinger(data: &[f64], period: usize, std_dev: f64) -> BollingerSeries {
    let middle = sma(data, period);
    let mut upper = vec![None; data.len()];
    let mut lower = vec![None; data.len()];
    if period >= 2 {
        for (i, mean) in middle.iter().enumerate() {
            if let Some(mean) = mean {
                let window = &data[i + 1 - period..=i];
                let var = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
                let sd = var.sqrt();
                upper[i] = Some(mean + sd * std_dev);
                lower[i] = Some(mean - sd * std_dev);
            }
        }
    }
    BollingerSeries { upper, middle, lower }
}

/// `(highest high, lowest low)` of the window ending at each index.
fn rolling_extremes(high: &[f64], low: &[f64], period: usize) -> Vec<Option<(f64, f64)>> {
    let n = high.len().min(low.len());
    let mut out = vec![None; n];
    if period == 0 || n < period {
        return out;
    }
    for i in period - 1..n {
        let range = i + 1 - period..=i;
        let hh = high[range.clone()].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let ll = low[range].iter().copied().fold(f64::INFINITY, f64::min);
        out[i] = Some((hh, ll));
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// %K: close within the `k_period` high-low range, 0..100. %D: its mean over `d_period`.
pub fn stochastic(high: &[f64], low: &[f64], close: &[f64], k_period: usize, d_period: usize) -> StochasticSeries {
    let k: Vec<Option<f64>> = rolling_extremes(high, low, k_period)
        .into_iter()
        .zip(close)
        .map(|(extremes, c)| {
            let (hh, ll) = extremes?;
            (hh > ll).then(|| 100.0 * (c - ll) / (hh - ll))
        })
        .collect();
    let d = rolling_mean(&k, d_period);
    StochasticSeries { k, d }
}

/// True range per bar; the first bar has no previous close and is `None`.
fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
    (0..close.len())
        .map(|i| {
            let prev = *close.get(i.checked_sub(1)?)?;
            Some((high[i] - low[i]).max((high[i] - prev).abs()).max((low[i] - prev).abs()))
        })
        .collect()
}

/// Average true range. The first bar counts with its high-low range.
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || close.len() <= period {
        return vec![None; close.len()];
    }
    let mut tr = true_range(high, low, close);
    tr[0] = Some(high[0] - low[0]);
    rolling_mean(&tr, period)
}

/// Williams %R, -100..0.
pub fn williams_r(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling_extremes(high, low, period)
        .into_iter()
        .zip(close)
        .map(|(extremes, c)| {
            let (hh, ll) = extremes?;
            (hh > ll).then(|| -100.0 * (hh - c) / (hh - ll))
        })
        .collect()
}

/// Commodity channel index over the typical price with mean absolute deviation.
pub fn cci(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    let typical: Vec<f64> = (0..close.len()).map(|i| (high[i] + low[i] + close[i]) / 3.0).collect();
    let mean = sma(&typical, period);
    mean.iter()
        .enumerate()
        .map(|(i, m)| {
            let m = (*m)?;
            let window = &typical[i + 1 - period..=i];
            let deviation = window.iter().map(|x| (x - m).abs()).sum::<f64>() / period as f64;
            (deviation > 0.0).then(|| (typical[i] - m) / (0.015 * deviation))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdxSeries {
    pub adx: Vec<Option<f64>>,
    pub di_plus: Vec<Option<f64>>,
    pub di_minus: Vec<Option<f64>>,
}

/// Average directional index with its +DI / -DI lines, all rolling means.
pub fn adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> AdxSeries {
    let n = close.len();
    if period == 0 || n < period.saturating_mul(2) {
        let empty = vec![None; n];
        return AdxSeries { adx: empty.clone(), di_plus: empty.clone(), di_minus: empty };
    }

    let mut dm_plus = vec![Some(0.0); n];
    let mut dm_minus = vec![Some(0.0); n];
    for i in 1..n {
        let up = high[i] - high[i - 1];
        let down = low[i - 1] - low[i];
        dm_plus[i] = Some(if up > down { up.max(0.0) } else { 0.0 });
        dm_minus[i] = Some(if down > up { down.max(0.0) } else { 0.0 });
    }

    let atr = rolling_mean(&true_range(high, low, close), period);
    let directional = |dm: &[Option<f64>]| -> Vec<Option<f64>> {
        rolling_mean(dm, period)
            .into_iter()
            .zip(&atr)
            .map(|(dm, tr)| match (dm, *tr) {
                (Some(dm), Some(tr)) if tr > 0.0 => Some(100.0 * dm / tr),
                _ => None,
            })
            .collect()
    };
    let di_plus = directional(&dm_plus);
    let di_minus = directional(&dm_minus);

    let dx: Vec<Option<f64>> = di_plus
        .iter()
        .zip(&di_minus)
        .map(|(p, m)| match (*p, *m) {
            (Some(p), Some(m)) if p + m > 0.0 => Some(100.0 * (p - m).abs() / (p + m)),
            _ => None,
        })
        .collect();

    AdxSeries { adx: rolling_mean(&dx, period), di_plus, di_minus }
}

/// On-balance volume: running sum of volume signed by the close-to-close move.
pub fn obv(close: &[f64], volume: &[f64]) -> Vec<Option<f64>> {
    if close.len() != volume.len() || close.len() < 2 {
        return vec![None; close.len()];
    }
    let mut total = 0.0;
    let mut out = Vec::with_capacity(close.len());
    out.push(Some(0.0));
    for i in 1..close.len() {
        let change = close[i] - close[i - 1];
        if change > 0.0 {
            total += volume[i];
        } else if change < 0.0 {
            total -= volume[i];
        }
        out.push(Some(total));
    }
    out
}
