//! Drawing aggregate: chart annotations, their backend records and the click
//! state machine that creates them.

pub mod entities;
pub mod persisted;
pub mod repository;
pub mod tool;

pub use entities::*;
pub use persisted::*;
pub use repository::DrawingRepository;
pub use tool::{CompletedShape, DrawingTool, ToolState, TwoPointTool};
