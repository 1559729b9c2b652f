//! Backend representation of drawings and the mapping to chart entities.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::entities::{
    Drawing, DrawingId, FibonacciRetracement, HorizontalLine, Point, TrendLine,
};
use crate::domain::errors::AppError;

/// Drawing type tag. Unrecognised tags are kept as [`DrawingKind::Unknown`]
/// instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DrawingKind {
    Horizontal,
    Trendline,
    Fibonacci,
    Unknown(String),
}

impl DrawingKind {
    pub fn as_str(&self) -> &str {
        match self {
            DrawingKind::Horizontal => "horizontal",
            DrawingKind::Trendline => "trendline",
            DrawingKind::Fibonacci => "fibonacci",
            DrawingKind::Unknown(tag) => tag,
        }
    }
}

impl From<&str> for DrawingKind {
    fn from(tag: &str) -> Self {
        match tag {
            "horizontal" => DrawingKind::Horizontal,
            "trendline" => DrawingKind::Trendline,
            "fibonacci" => DrawingKind::Fibonacci,
            other => DrawingKind::Unknown(other.to_string()),
        }
    }
}

impl Serialize for DrawingKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DrawingKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(DrawingKind::from(tag.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl DrawingStyle {
    pub fn colored(color: impl Into<String>) -> Self {
        Self { color: color.into(), ..Default::default() }
    }
}

/// Time/price extent of a drawing's anchor points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub t0: i64,
    pub t1: i64,
    pub p_min: f64,
    pub p_max: f64,
}

impl BoundingBox {
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let init = BoundingBox { t0: first.time, t1: first.time, p_min: first.price, p_max: first.price };
        Some(rest.iter().fold(init, |bbox, p| BoundingBox {
            t0: bbox.t0.min(p.time),
            t1: bbox.t1.max(p.time),
            p_min: bbox.p_min.min(p.price),
            p_max: bbox.p_max.max(p.price),
        }))
    }
}

/// Who and where a drawing belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DrawingScope {
    pub user_id: String,
    pub symbol_id: String,
    pub timeframe: String,
}

impl DrawingScope {
    pub fn new(user_id: impl Into<String>, symbol_id: impl Into<String>, timeframe: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), symbol_id: symbol_id.into(), timeframe: timeframe.into() }
    }

    /// Requests are only made for scopes with a user and a symbol.
    pub fn is_complete(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.symbol_id.trim().is_empty()
    }
}

/// A drawing record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDrawing {
    pub id: DrawingId,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub symbol_id: String,
    #[serde(default)]
    pub timeframe: String,
    #[serde(rename = "type")]
    pub kind: DrawingKind,
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub style: DrawingStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl PersistedDrawing {
    /// Chart entity for this record, or `None` for unknown types and records
    /// missing the points their type needs.
    pub fn to_drawing(&self) -> Option<Drawing> {
        let id = self.id.clone();
        let color = self.style.color.clone();
        match &self.kind {
            DrawingKind::Horizontal => {
                let first = self.points.first()?;
                Some(Drawing::Horizontal(HorizontalLine {
                    id,
                    time: first.time,
                    price: first.price,
                    color,
                    label: self.style.label.clone(),
                }))
            }
            DrawingKind::Trendline => {
                let [a, b, ..] = self.points.as_slice() else { return None };
                Some(Drawing::Trend(TrendLine { id, points: [*a, *b], color, label: self.style.label.clone() }))
            }
            DrawingKind::Fibonacci => {
                let [a, b, ..] = self.points.as_slice() else { return None };
                Some(Drawing::Fibonacci(FibonacciRetracement { id, start_point: *a, end_point: *b, color }))
            }
            DrawingKind::Unknown(_) => None,
        }
    }
}

/// POST body for a new drawing. The bounding box is always derived from the
/// points, so the only way to build one is [`NewDrawing::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDrawing {
    user_id: String,
    symbol_id: String,
    timeframe: String,
    #[serde(rename = "type")]
    kind: DrawingKind,
    points: Vec<Point>,
    style: DrawingStyle,
    bbox: BoundingBox,
}

impl NewDrawing {
    pub fn new(
        scope: &DrawingScope,
        kind: DrawingKind,
        points: Vec<Point>,
        style: DrawingStyle,
    ) -> Result<Self, AppError> {
        let bbox = BoundingBox::from_points(&points)
            .ok_or_else(|| AppError::ValidationError(format!("{} drawing has no points", kind.as_str())))?;
        Ok(Self {
            user_id: scope.user_id.clone(),
            symbol_id: scope.symbol_id.clone(),
            timeframe: scope.timeframe.clone(),
            kind,
            points,
            style,
            bbox,
        })
    }

    pub fn from_drawing(scope: &DrawingScope, drawing: &Drawing) -> Result<Self, AppError> {
        let (kind, style) = match drawing {
            Drawing::Horizontal(line) => (
                DrawingKind::Horizontal,
                DrawingStyle { label: line.label.clone(), ..DrawingStyle::colored(&line.color) },
            ),
            Drawing::Trend(line) => (
                DrawingKind::Trendline,
                DrawingStyle { label: line.label.clone(), ..DrawingStyle::colored(&line.color) },
            ),
            Drawing::Fibonacci(fib) => (DrawingKind::Fibonacci, DrawingStyle::colored(&fib.color)),
        };
        Self::new(scope, kind, drawing.points(), style)
    }

    pub fn kind(&self) -> &DrawingKind {
        &self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn style(&self) -> &DrawingStyle {
        &self.style
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn scope(&self) -> DrawingScope {
        DrawingScope::new(&self.user_id, &self.symbol_id, &self.timeframe)
    }

    /// The record the backend would store under `id`.
    pub fn into_persisted(self, id: DrawingId) -> PersistedDrawing {
        PersistedDrawing {
            id,
            user_id: self.user_id,
            symbol_id: self.symbol_id,
            timeframe: self.timeframe,
            kind: self.kind,
            points: self.points,
            style: self.style,
            bbox: Some(self.bbox),
        }
    }
}
