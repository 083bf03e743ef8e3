use engine::{Canvas, InputSnapshot, Rect, Vec2};
use rand::rngs::StdRng;
use rand::Rng;

use super::{draw_run_status, ArcadeRules, RunState};
use crate::app::ui::fill_screen;

const PADDLE_SIZE: Vec2 = Vec2::new(70.0, 25.0);
const PADDLE_Y: f32 = 530.0;
const PADDLE_START_X: f32 = 400.0;
const PADDLE_SPEED: f32 = 1000.0;
const LANE_MIN_X: f32 = 120.0;
const LANE_MAX_X: f32 = 680.0;
const DROP_SIZE: f32 = 30.0;
const DROP_SPAWN_Y: f32 = 80.0;
const MISSED_BELOW_Y: f32 = 590.0;
const STARTING_LIVES: i32 = 2;
const START_FALL_SPEED: f32 = 180.0;
const FALL_SPEED_STEP: f32 = 10.0;
const FALL_SPEED_RAMP_LIMIT: f32 = 350.0;
const MAX_FALL_SPEED: f32 = 400.0;
const POINTS_PER_SPEEDUP: u32 = 7;
const BASE_SPAWN_DELAY: f32 = 1.3;
const SPAWN_DELAY_PER_POINT: f32 = 0.021;
const MIN_SPAWN_DELAY: f32 = 0.25;

const BACKGROUND: [u8; 4] = [30, 0, 80, 255];
const PADDLE_COLOR: [u8; 4] = [200, 200, 255, 255];
const GOOD_COLORS: [[u8; 4]; 2] = [[70, 255, 120, 255], [90, 210, 255, 255]];
const BAD_COLORS: [[u8; 4]; 2] = [[220, 60, 60, 255], [20, 20, 20, 255]];

#[derive(Debug, Clone, Copy, PartialEq)]
struct FallingDrop {
    center: Vec2,
    good: bool,
    color: [u8; 4],
}

impl FallingDrop {
    fn bounds(&self) -> Rect {
        centered_rect(self.center, Vec2::new(DROP_SIZE, DROP_SIZE))
    }
}

fn centered_rect(center: Vec2, size: Vec2) -> Rect {
    Rect::new(
        center.x - size.x * 0.5,
        center.y - size.y * 0.5,
        size.x,
        size.y,
    )
}

/// Catch the green and blue drops with the paddle and let the red and black ones fall.
pub(crate) struct CatchRules {
    rng: StdRng,
    paddle_x: f32,
    drops: Vec<FallingDrop>,
    lives: i32,
    score: u32,
    coins: u32,
    fall_speed: f32,
    spawn_timer: f32,
    spawn_delay: f32,
}

impl CatchRules {
    pub(crate) fn new(rng: StdRng) -> Self {
        let mut rules = Self {
            rng,
            paddle_x: PADDLE_START_X,
            drops: Vec::new(),
            lives: STARTING_LIVES,
            score: 0,
            coins: 0,
            fall_speed: START_FALL_SPEED,
            spawn_timer: 0.0,
            spawn_delay: BASE_SPAWN_DELAY,
        };
        rules.reset();
        rules
    }

    fn paddle_bounds(&self) -> Rect {
        centered_rect(Vec2::new(self.paddle_x, PADDLE_Y), PADDLE_SIZE)
    }

    fn spawn_drop(&mut self) {
        let x = self.rng.gen_range(LANE_MIN_X..=LANE_MAX_X);
        let good = self.rng.gen_bool(0.5);
        let palette = if good { &GOOD_COLORS } else { &BAD_COLORS };
        let color = palette[self.rng.gen_range(0..palette.len())];
        self.drops.push(FallingDrop {
            center: Vec2::new(x, DROP_SPAWN_Y),
            good,
            color,
        });
    }

    fn caught_good(&mut self) {
        self.score += 1;
        if self.score % POINTS_PER_SPEEDUP == 0 && self.fall_speed < FALL_SPEED_RAMP_LIMIT {
            self.fall_speed += FALL_SPEED_STEP;
        }
    }

    #[cfg(test)]
    fn push_drop(&mut self, center: Vec2, good: bool) {
        self.drops.push(FallingDrop {
            center,
            good,
            color: GOOD_COLORS[0],
        });
    }
}

impl ArcadeRules for CatchRules {
    fn title(&self) -> &'static str {
        "Catch Game"
    }

    fn instructions(&self) -> &'static [&'static str] {
        &[
            "Move the paddle with left and right.",
            "Catch green and blue drops for points.",
            "Red and black drops cost a life.",
            "Missing a good drop costs a life too.",
        ]
    }

    fn reset(&mut self) {
        self.paddle_x = PADDLE_START_X;
        self.drops.clear();
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.coins = 0;
        self.fall_speed = START_FALL_SPEED;
        self.spawn_timer = 0.0;
        self.spawn_delay = BASE_SPAWN_DELAY;
    }

    fn step(&mut self, dt_seconds: f32, input: &InputSnapshot) -> RunState {
        let (direction, _) = input.held_direction();
        self.paddle_x = (self.paddle_x + direction as f32 * PADDLE_SPEED * dt_seconds)
            .clamp(LANE_MIN_X, LANE_MAX_X);

        self.spawn_timer += dt_seconds;
        if self.spawn_timer >= self.spawn_delay {
            self.spawn_timer = 0.0;
            self.spawn_drop();
        }

        let fall = self.fall_speed * dt_seconds;
        let paddle = self.paddle_bounds();
        let mut index = 0;
        while index < self.drops.len() {
            let drop = &mut self.drops[index];
            drop.center.y += fall;
            let drop = *drop;
            if drop.bounds().intersects(&paddle) {
                self.drops.swap_remove(index);
                if drop.good {
                    self.caught_good();
                } else {
                    self.lives -= 1;
                    self.score = self.score.saturating_sub(1);
                }
            } else if drop.center.y > MISSED_BELOW_Y {
                self.drops.swap_remove(index);
                if drop.good {
                    self.lives -= 1;
                }
            } else {
                index += 1;
            }
        }

        self.spawn_delay =
            (BASE_SPAWN_DELAY - self.score as f32 * SPAWN_DELAY_PER_POINT).max(MIN_SPAWN_DELAY);
        self.fall_speed = self.fall_speed.min(MAX_FALL_SPEED);

        if self.lives < 0 {
            self.coins = self.score;
            return RunState::Over;
        }
        RunState::Running
    }

    fn render_play(&self, canvas: &mut Canvas<'_>) {
        fill_screen(canvas, BACKGROUND);
        for drop in &self.drops {
            canvas.fill_rect(drop.bounds(), drop.color);
        }
        canvas.draw_sprite("minigames/catch_paddle", self.paddle_bounds(), PADDLE_COLOR);
        draw_run_status(canvas, self.score, Some(self.lives));
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn coins_earned(&self) -> u32 {
        self.coins
    }
}
