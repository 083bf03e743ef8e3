mod canvas;
mod renderer;
mod sprites;
mod text;

pub use canvas::Canvas;
pub use renderer::Renderer;
pub use sprites::SpriteCache;
pub use text::{text_width, GLYPH_HEIGHT_PX, LINE_ADVANCE_PX};
