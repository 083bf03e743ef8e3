use super::sprites::{LoadedSprite, SpriteCache};
use super::text;
use crate::app::geometry::Rect;

/// Drawing surface over one RGBA8 frame. Every primitive clips against the frame bounds.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    sprites: &'a mut SpriteCache,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32, sprites: &'a mut SpriteCache) -> Self {
        Self {
            frame,
            width,
            height,
            sprites,
        }
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Reads one pixel back; `None` outside the frame.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = self.byte_offset(x, y)?;
        let mut color = [0; 4];
        color.copy_from_slice(&self.frame[offset..offset + 4]);
        Some(color)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let (x, y, w, h) = snap_rect(rect);
        self.fill_px(x, y, w, h, color);
    }

    pub fn outline_rect(&mut self, rect: Rect, thickness: i32, color: [u8; 4]) {
        let (x, y, w, h) = snap_rect(rect);
        let t = thickness.max(1).min(w / 2 + 1).min(h / 2 + 1);
        self.fill_px(x, y, w, t, color);
        self.fill_px(x, y + h - t, w, t, color);
        self.fill_px(x, y, t, h, color);
        self.fill_px(x + w - t, y, t, h, color);
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [u8; 4]) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let radius_sq = radius * radius;
        let top = (cy - radius).floor() as i32;
        let bottom = (cy + radius).ceil() as i32;
        let left = (cx - radius).floor() as i32;
        let right = (cx + radius).ceil() as i32;
        for py in top..bottom {
            for px in left..right {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius_sq {
                    self.write_pixel(px, py, color);
                }
            }
        }
    }

    pub fn draw_text(&mut self, x: i32, y: i32, value: &str, scale: i32, color: [u8; 4]) {
        text::draw_text(self, x, y, value, scale, color);
    }

    pub fn draw_text_centered(
        &mut self,
        center_x: i32,
        y: i32,
        value: &str,
        scale: i32,
        color: [u8; 4],
    ) {
        let x = center_x - text::text_width(value, scale) / 2;
        text::draw_text(self, x, y, value, scale, color);
    }

    /// Stretches the sprite stored under `key` over `rect`. When the sprite cannot be loaded
    /// the rectangle is filled with `placeholder` instead and `false` is returned.
    pub fn draw_sprite(&mut self, key: &str, rect: Rect, placeholder: [u8; 4]) -> bool {
        let (x, y, w, h) = snap_rect(rect);
        let drawn = match self.sprites.resolve(key) {
            Some(sprite) => {
                blit_stretched(self.frame, self.width, self.height, sprite, x, y, w, h);
                true
            }
            None => false,
        };
        if !drawn {
            self.fill_px(x, y, w, h, placeholder);
        }
        drawn
    }

    pub(super) fn fill_px(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 4]) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(w).min(self.width as i32);
        let end_y = y.saturating_add(h).min(self.height as i32);
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.write_pixel(px, py, color);
            }
        }
    }

    fn write_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        let Some(offset) = self.byte_offset(x, y) else {
            return;
        };
        if color[3] == u8::MAX {
            self.frame[offset..offset + 4].copy_from_slice(&color);
        } else {
            let blended = blend_over(&self.frame[offset..offset + 4], color);
            self.frame[offset..offset + 4].copy_from_slice(&blended);
        }
    }

    fn byte_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        (offset + 4 <= self.frame.len()).then_some(offset)
    }
}

fn snap_rect(rect: Rect) -> (i32, i32, i32, i32) {
    (
        rect.x.round() as i32,
        rect.y.round() as i32,
        rect.width.round().max(0.0) as i32,
        rect.height.round().max(0.0) as i32,
    )
}

fn blend_over(dst: &[u8], src: [u8; 4]) -> [u8; 4] {
    let alpha = u16::from(src[3]);
    let inv = 255 - alpha;
    let mix = |s: u8, d: u8| ((u16::from(s) * alpha + u16::from(d) * inv) / 255) as u8;
    [mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255]
}

#[allow(clippy::too_many_arguments)]
fn blit_stretched(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    sprite: &LoadedSprite,
    left: i32,
    top: i32,
    out_w: i32,
    out_h: i32,
) {
    if sprite.width == 0 || sprite.height == 0 || out_w <= 0 || out_h <= 0 {
        return;
    }
    if sprite.rgba.len() < sprite.width as usize * sprite.height as usize * 4 {
        return;
    }

    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = left.saturating_add(out_w).min(frame_width as i32);
    let draw_bottom = top.saturating_add(out_h).min(frame_height as i32);
    let sprite_width = sprite.width as usize;

    for out_y in draw_top..draw_bottom {
        let src_y = ((out_y - top) as u64 * u64::from(sprite.height) / out_h as u64) as usize;
        let src_row_offset = src_y.min(sprite.height as usize - 1) * sprite_width * 4;
        let dst_row_offset = out_y as usize * frame_width as usize * 4;

        for out_x in draw_left..draw_right {
            let src_x = ((out_x - left) as u64 * u64::from(sprite.width) / out_w as u64) as usize;
            let src_offset = src_row_offset + src_x.min(sprite_width - 1) * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let dst_offset = dst_row_offset + out_x as usize * 4;
            if dst_offset + 4 > frame.len() {
                return;
            }
            let mut src = [0; 4];
            src.copy_from_slice(&sprite.rgba[src_offset..src_offset + 4]);
            let out = if alpha == u8::MAX {
                src
            } else {
                blend_over(&frame[dst_offset..dst_offset + 4], src)
            };
            frame[dst_offset..dst_offset + 4].copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn with_canvas(width: u32, height: u32, draw: impl FnOnce(&mut Canvas<'_>)) -> Vec<u8> {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sprites = SpriteCache::new(dir.path().to_path_buf());
        let mut frame = vec![0; (width * height * 4) as usize];
        let mut canvas = Canvas::new(&mut frame, width, height, &mut sprites);
        draw(&mut canvas);
        frame
    }

    fn pixel_at(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let frame = with_canvas(4, 4, |canvas| {
            canvas.clear(BLACK);
            canvas.fill_rect(Rect::new(-2.0, 2.0, 4.0, 10.0), RED);
        });

        assert_eq!(pixel_at(&frame, 4, 0, 3), RED);
        assert_eq!(pixel_at(&frame, 4, 1, 2), RED);
        assert_eq!(pixel_at(&frame, 4, 2, 2), BLACK);
        assert_eq!(pixel_at(&frame, 4, 0, 1), BLACK);
    }

    #[test]
    fn missing_sprite_draws_placeholder() {
        let mut drawn = true;
        let frame = with_canvas(8, 8, |canvas| {
            drawn = canvas.draw_sprite("furniture/missing", Rect::new(2.0, 2.0, 3.0, 3.0), RED);
        });

        assert!(!drawn);
        assert_eq!(pixel_at(&frame, 8, 3, 3), RED);
        assert_eq!(pixel_at(&frame, 8, 6, 6), [0, 0, 0, 0]);
    }

    #[test]
    fn outline_leaves_interior_untouched() {
        let frame = with_canvas(10, 10, |canvas| {
            canvas.clear(BLACK);
            canvas.outline_rect(Rect::new(1.0, 1.0, 8.0, 8.0), 2, RED);
        });

        assert_eq!(pixel_at(&frame, 10, 1, 1), RED);
        assert_eq!(pixel_at(&frame, 10, 2, 5), RED);
        assert_eq!(pixel_at(&frame, 10, 5, 5), BLACK);
    }

    #[test]
    fn translucent_fill_blends_with_background() {
        let frame = with_canvas(1, 1, |canvas| {
            canvas.clear([0, 0, 200, 255]);
            canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), [200, 0, 0, 128]);
        });

        let pixel = pixel_at(&frame, 1, 0, 0);
        assert!(pixel[0] > 90 && pixel[0] < 110, "pixel={pixel:?}");
        assert!(pixel[2] > 90 && pixel[2] < 110, "pixel={pixel:?}");
    }

    #[test]
    fn text_is_drawn_and_clipped_safely() {
        let frame = with_canvas(16, 8, |canvas| {
            canvas.draw_text(-3, -2, "Coins: 100", 2, RED);
            canvas.draw_text(14, 6, "W", 3, RED);
        });

        assert!(frame.chunks_exact(4).any(|pixel| pixel == RED));
    }

    #[test]
    fn circle_covers_center_not_corners() {
        let frame = with_canvas(9, 9, |canvas| {
            canvas.fill_circle(4.5, 4.5, 3.0, RED);
        });

        assert_eq!(pixel_at(&frame, 9, 4, 4), RED);
        assert_eq!(pixel_at(&frame, 9, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn pixel_readback_is_none_outside_frame() {
        with_canvas(2, 2, |canvas| {
            canvas.clear(RED);
            assert_eq!(canvas.pixel(1, 1), Some(RED));
            assert_eq!(canvas.pixel(2, 0), None);
            assert_eq!(canvas.pixel(-1, 0), None);
        });
    }
}
