pub mod canvas_target;

pub use canvas_target::CanvasTarget;
