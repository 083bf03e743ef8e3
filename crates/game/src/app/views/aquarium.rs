use std::f32::consts::TAU;

use engine::{Canvas, InputAction, InputSnapshot, Rect};

use super::SubView;
use crate::app::items::draw_item;
use crate::app::profile::Collection;
use crate::app::session::SessionContext;
use crate::app::ui::{draw_hint, draw_title, fill_screen, BODY_SCALE, DIM_TEXT_COLOR};

const BACKDROP_COLOR: [u8; 4] = [18, 40, 70, 255];
const WATER_COLOR: [u8; 4] = [40, 120, 190, 255];
const SAND_COLOR: [u8; 4] = [220, 200, 140, 255];
const TANK: Rect = Rect::new(120.0, 140.0, 560.0, 360.0);
const SAND_HEIGHT: f32 = 40.0;
/// Full left-right-left swims per second.
const SWIM_CYCLES_PER_SECOND: f32 = 0.25;
const SWIM_RANGE: f32 = 180.0;

/// Swimmers move; everything else sits on the sand.
fn is_swimmer(id: &str) -> bool {
    matches!(id, "goldfish")
}

#[derive(Debug, Default)]
pub(crate) struct AquariumView {
    phase: f32,
    close_requested: bool,
}

impl AquariumView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> f32 {
        self.phase
    }

    /// Horizontal offset of a swimmer from its lane centre. Each swimmer gets its own phase
    /// shift so they do not move in lockstep.
    fn swim_offset(&self, lane: usize) -> f32 {
        (self.phase + lane as f32 * 1.7).sin() * SWIM_RANGE
    }
}

impl SubView for AquariumView {
    fn handle_key(&mut self, action: InputAction, _session: &mut SessionContext) {
        if action == InputAction::Cancel {
            self.close_requested = true;
        }
    }

    fn update(&mut self, dt_seconds: f32, _input: &InputSnapshot, _session: &mut SessionContext) {
        self.phase = (self.phase + dt_seconds * SWIM_CYCLES_PER_SECOND * TAU) % TAU;
    }

    fn render(&self, canvas: &mut Canvas<'_>, session: &SessionContext) {
        fill_screen(canvas, BACKDROP_COLOR);
        draw_title(canvas, "Aquarium View", 50);
        canvas.fill_rect(TANK, WATER_COLOR);
        canvas.fill_rect(
            Rect::new(TANK.x, TANK.bottom() - SAND_HEIGHT, TANK.width, SAND_HEIGHT),
            SAND_COLOR,
        );

        let contents = &session.profile.aquarium_contents;
        if contents.is_empty() {
            canvas.draw_text_centered(
                400,
                TANK.center().y as i32,
                "The tank is empty",
                BODY_SCALE,
                DIM_TEXT_COLOR,
            );
        }

        let mut decor_slot = 0usize;
        for (lane, id) in contents.iter().enumerate() {
            let rect = if is_swimmer(id) {
                let center_x = TANK.center().x + self.swim_offset(lane);
                Rect::new(center_x - 30.0, TANK.y + 60.0 + lane as f32 * 50.0, 60.0, 36.0)
            } else {
                decor_slot += 1;
                Rect::new(
                    TANK.x + decor_slot as f32 * 140.0,
                    TANK.bottom() - SAND_HEIGHT - 70.0,
                    70.0,
                    80.0,
                )
            };
            draw_item(canvas, Collection::Aquarium, id, rect);
        }
        draw_hint(canvas, "Esc: back");
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn reset_close_flag(&mut self) {
        self.close_requested = false;
    }
}
