use std::path::PathBuf;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::canvas::Canvas;
use super::sprites::SpriteCache;
use crate::app::Scene;

const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];

/// Owns the pixel surface. The scene always draws into a fixed logical frame; `pixels` scales
/// it onto whatever size the window currently has.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    logical_width: u32,
    logical_height: u32,
    sprites: SpriteCache,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        logical_size: (u32, u32),
        sprite_dir: PathBuf,
    ) -> Result<Self, Error> {
        let (logical_width, logical_height) = logical_size;
        let surface = window.inner_size();
        let pixels = Self::build_pixels(
            Arc::clone(&window),
            (logical_width, logical_height),
            (surface.width, surface.height),
        )?;
        Ok(Self {
            window,
            pixels,
            logical_width,
            logical_height,
            sprites: SpriteCache::new(sprite_dir),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            Arc::clone(&self.window),
            (self.logical_width, self.logical_height),
            (width, height),
        )?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        logical_size: (u32, u32),
        surface_size: (u32, u32),
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_size.0, surface_size.1, window);
        Pixels::new(logical_size.0, logical_size.1, surface)
    }

    pub(crate) fn render_scene(&mut self, scene: &dyn Scene) -> Result<(), Error> {
        {
            let frame = self.pixels.frame_mut();
            let mut canvas = Canvas::new(
                frame,
                self.logical_width,
                self.logical_height,
                &mut self.sprites,
            );
            canvas.clear(CLEAR_COLOR);
            scene.render(&mut canvas);
        }
        self.pixels.render()
    }
}
