use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};

/// A (time, price) anchor. Time is seconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: i64,
    pub price: f64,
}

impl Point {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }
}

/// Drawing identity. Locally created drawings get a random UUID; drawings
/// loaded from the backend keep the backend's id, which may arrive as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[serde(transparent)]
pub struct DrawingId(String);

impl DrawingId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DrawingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DrawingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for DrawingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

pub const DEFAULT_HORIZONTAL_COLOR: &str = "#2196F3";
pub const DEFAULT_TREND_COLOR: &str = "#FF9800";
pub const DEFAULT_FIBONACCI_COLOR: &str = "#9C27B0";

#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalLine {
    pub id: DrawingId,
    /// Time of the click that placed the line, kept for the stored record.
    pub time: i64,
    pub price: f64,
    pub color: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendLine {
    pub id: DrawingId,
    pub points: [Point; 2],
    pub color: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FibonacciRetracement {
    pub id: DrawingId,
    pub start_point: Point,
    pub end_point: Point,
    pub color: String,
}

/// Retracement ratios, top of the move to bottom.
pub const FIBONACCI_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
}

impl FibonacciLevel {
    /// `"61.8%"` style label.
    pub fn label(&self) -> String {
        let pct = format!("{:.1}", self.ratio * 100.0);
        format!("{}%", pct.trim_end_matches(".0"))
    }
}

impl FibonacciRetracement {
    /// One level per ratio, interpolated from the start price towards the end price.
    pub fn levels(&self) -> [FibonacciLevel; 7] {
        let start = self.start_point.price;
        let span = self.end_point.price - start;
        FIBONACCI_RATIOS.map(|ratio| FibonacciLevel { ratio, price: start + span * ratio })
    }

    pub fn points(&self) -> [Point; 2] {
        [self.start_point, self.end_point]
    }
}

/// A committed drawing of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawing {
    Horizontal(HorizontalLine),
    Trend(TrendLine),
    Fibonacci(FibonacciRetracement),
}

impl Drawing {
    pub fn id(&self) -> &DrawingId {
        match self {
            Drawing::Horizontal(line) => &line.id,
            Drawing::Trend(line) => &line.id,
            Drawing::Fibonacci(fib) => &fib.id,
        }
    }

    pub fn points(&self) -> Vec<Point> {
        match self {
            Drawing::Horizontal(line) => vec![Point::new(line.time, line.price)],
            Drawing::Trend(line) => line.points.to_vec(),
            Drawing::Fibonacci(fib) => fib.points().to_vec(),
        }
    }
}

/// Everything placed on the current chart, as plain data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingSnapshot {
    pub horizontal_lines: Vec<HorizontalLine>,
    pub trend_lines: Vec<TrendLine>,
    pub fibonacci_retracements: Vec<FibonacciRetracement>,
}

impl DrawingSnapshot {
    pub fn len(&self) -> usize {
        self.horizontal_lines.len() + self.trend_lines.len() + self.fibonacci_retracements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_labels() {
        let level = |ratio| FibonacciLevel { ratio, price: 0.0 }.label();
        assert_eq!(level(0.0), "0%");
        assert_eq!(level(0.236), "23.6%");
        assert_eq!(level(0.5), "50%");
        assert_eq!(level(1.0), "100%");
    }

    #[test]
    fn numeric_backend_ids_become_strings() {
        let id: DrawingId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
        let id: DrawingId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id, DrawingId::from("abc"));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(DrawingId::generate(), DrawingId::generate());
    }
}
