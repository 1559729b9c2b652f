//! Toolbar tools and the click state machine that turns chart clicks into
//! finished shapes.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

use super::entities::Point;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DrawingTool {
    #[default]
    #[display(fmt = "none")]
    None,
    #[display(fmt = "horizontal")]
    Horizontal,
    #[display(fmt = "trendline")]
    Trendline,
    #[display(fmt = "fibonacci")]
    Fibonacci,
}

impl DrawingTool {
    pub fn title(&self) -> &'static str {
        match self {
            DrawingTool::None => "Cursor",
            DrawingTool::Horizontal => "Horizontal line",
            DrawingTool::Trendline => "Trend line",
            DrawingTool::Fibonacci => "Fibonacci",
        }
    }

    fn two_point(self) -> Option<TwoPointTool> {
        match self {
            DrawingTool::Trendline => Some(TwoPointTool::Trendline),
            DrawingTool::Fibonacci => Some(TwoPointTool::Fibonacci),
            DrawingTool::None | DrawingTool::Horizontal => None,
        }
    }
}

/// Tools that need two anchor clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoPointTool {
    Trendline,
    Fibonacci,
}

impl From<TwoPointTool> for DrawingTool {
    fn from(tool: TwoPointTool) -> Self {
        match tool {
            TwoPointTool::Trendline => DrawingTool::Trendline,
            TwoPointTool::Fibonacci => DrawingTool::Fibonacci,
        }
    }
}

/// Shape produced by a completed click sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletedShape {
    Horizontal(Point),
    Trendline([Point; 2]),
    Fibonacci([Point; 2]),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ToolState {
    #[default]
    Idle,
    /// Horizontal tool armed; the next click completes.
    AwaitingHorizontal,
    AwaitingPoint(TwoPointTool),
    HaveFirstPoint(TwoPointTool, Point),
}

impl ToolState {
    pub fn for_tool(tool: DrawingTool) -> Self {
        match (tool, tool.two_point()) {
            (_, Some(two_point)) => ToolState::AwaitingPoint(two_point),
            (DrawingTool::Horizontal, None) => ToolState::AwaitingHorizontal,
            _ => ToolState::Idle,
        }
    }

    /// Switch tools. A pending first point is discarded.
    pub fn select(&mut self, tool: DrawingTool) {
        *self = Self::for_tool(tool);
    }

    pub fn active_tool(&self) -> DrawingTool {
        match self {
            ToolState::Idle => DrawingTool::None,
            ToolState::AwaitingHorizontal => DrawingTool::Horizontal,
            ToolState::AwaitingPoint(tool) | ToolState::HaveFirstPoint(tool, _) => (*tool).into(),
        }
    }

    pub fn pending_point(&self) -> Option<Point> {
        match self {
            ToolState::HaveFirstPoint(_, point) => Some(*point),
            _ => None,
        }
    }

    /// Feed a click. Returns the finished shape and goes back to idle once the
    /// tool has all its anchors; clicks while idle are ignored.
    pub fn click(&mut self, point: Point) -> Option<CompletedShape> {
        match *self {
            ToolState::Idle => None,
            ToolState::AwaitingHorizontal => {
                *self = ToolState::Idle;
                Some(CompletedShape::Horizontal(point))
            }
            ToolState::AwaitingPoint(tool) => {
                *self = ToolState::HaveFirstPoint(tool, point);
                None
            }
            ToolState::HaveFirstPoint(tool, first) => {
                *self = ToolState::Idle;
                Some(match tool {
                    TwoPointTool::Trendline => CompletedShape::Trendline([first, point]),
                    TwoPointTool::Fibonacci => CompletedShape::Fibonacci([first, point]),
                })
            }
        }
    }
}
