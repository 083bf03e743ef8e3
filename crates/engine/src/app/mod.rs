mod geometry;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use geometry::{Rect, Vec2};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{text_width, Canvas, Renderer, SpriteCache, GLYPH_HEIGHT_PX, LINE_ADVANCE_PX};
pub use scene::{InputSnapshot, Scene, SceneCommand};
