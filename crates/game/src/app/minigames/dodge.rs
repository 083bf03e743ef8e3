use engine::{Canvas, InputSnapshot, Rect, Vec2};
use rand::rngs::StdRng;
use rand::Rng;

use super::{draw_run_status, ArcadeRules, RunState};
use crate::app::ui::fill_screen;

const PLAYER_SIZE: f32 = 40.0;
const PLAYER_START: Vec2 = Vec2::new(400.0, 340.0);
const PLAYER_SPEED: f32 = 370.0;
const FIELD_MIN: Vec2 = Vec2::new(120.0, 80.0);
const FIELD_MAX: Vec2 = Vec2::new(680.0, 600.0);
/// A drop whose centre leaves this box has been dodged.
const ARENA: Rect = Rect::new(110.0, 70.0, 580.0, 540.0);
const DROP_RADIUS: f32 = 18.0;
const STARTING_LIVES: i32 = 2;
const START_DROP_SPEED: f32 = 220.0;
const DROP_SPEED_STEP: f32 = 16.0;
const DROP_SPEED_RAMP_LIMIT: f32 = 400.0;
const POINTS_PER_SPEEDUP: u32 = 7;
const POINTS_PER_COIN: u32 = 4;
const BASE_SPAWN_DELAY: f32 = 1.0;
const SPAWN_DELAY_PER_POINT: f32 = 0.019;
const MIN_SPAWN_DELAY: f32 = 0.17;

const BACKGROUND: [u8; 4] = [10, 30, 20, 255];
const ARENA_COLOR: [u8; 4] = [20, 60, 40, 255];
const PLAYER_COLOR: [u8; 4] = [200, 255, 200, 255];
const DROP_COLOR: [u8; 4] = [230, 40, 40, 255];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Projectile {
    center: Vec2,
    velocity: Vec2,
}

impl Projectile {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - DROP_RADIUS,
            self.center.y - DROP_RADIUS,
            DROP_RADIUS * 2.0,
            DROP_RADIUS * 2.0,
        )
    }

    fn escaped(&self) -> bool {
        self.center.x < ARENA.x
            || self.center.x > ARENA.right()
            || self.center.y < ARENA.y
            || self.center.y > ARENA.bottom()
    }
}

/// Stay clear of red balls thrown in from the edges of the field.
pub(crate) struct DodgeRules {
    rng: StdRng,
    player: Vec2,
    drops: Vec<Projectile>,
    lives: i32,
    score: u32,
    coins: u32,
    drop_speed: f32,
    spawn_timer: f32,
    spawn_delay: f32,
}

impl DodgeRules {
    pub(crate) fn new(rng: StdRng) -> Self {
        let mut rules = Self {
            rng,
            player: PLAYER_START,
            drops: Vec::new(),
            lives: STARTING_LIVES,
            score: 0,
            coins: 0,
            drop_speed: START_DROP_SPEED,
            spawn_timer: 0.0,
            spawn_delay: BASE_SPAWN_DELAY,
        };
        rules.reset();
        rules
    }

    fn player_bounds(&self) -> Rect {
        Rect::new(
            self.player.x - PLAYER_SIZE * 0.5,
            self.player.y - PLAYER_SIZE * 0.5,
            PLAYER_SIZE,
            PLAYER_SIZE,
        )
    }

    /// Launches a drop from one of the four field edges, heading straight across.
    fn spawn_drop(&mut self) {
        let speed = self.drop_speed;
        let (center, velocity) = match self.rng.gen_range(0..4) {
            0 => (
                Vec2::new(self.rng.gen_range(FIELD_MIN.x..=FIELD_MAX.x), FIELD_MIN.y),
                Vec2::new(0.0, speed),
            ),
            1 => (
                Vec2::new(FIELD_MAX.x, self.rng.gen_range(FIELD_MIN.y..=FIELD_MAX.y)),
                Vec2::new(-speed, 0.0),
            ),
            2 => (
                Vec2::new(self.rng.gen_range(FIELD_MIN.x..=FIELD_MAX.x), FIELD_MAX.y),
                Vec2::new(0.0, -speed),
            ),
            _ => (
                Vec2::new(FIELD_MIN.x, self.rng.gen_range(FIELD_MIN.y..=FIELD_MAX.y)),
                Vec2::new(speed, 0.0),
            ),
        };
        self.drops.push(Projectile { center, velocity });
    }

    fn dodged(&mut self) {
        self.score += 1;
        if self.score % POINTS_PER_COIN == 0 {
            self.coins += 1;
        }
        if self.score % POINTS_PER_SPEEDUP == 0 && self.drop_speed < DROP_SPEED_RAMP_LIMIT {
            self.drop_speed += DROP_SPEED_STEP;
        }
    }

    #[cfg(test)]
    fn push_drop(&mut self, center: Vec2, velocity: Vec2) {
        self.drops.push(Projectile { center, velocity });
    }
}

impl ArcadeRules for DodgeRules {
    fn title(&self) -> &'static str {
        "Dodge Game"
    }

    fn instructions(&self) -> &'static [&'static str] {
        &[
            "Move in any direction with the arrows.",
            "Red balls fly in from the edges.",
            "Each dodged ball is a point.",
            "Every 4 points earns a coin.",
        ]
    }

    fn reset(&mut self) {
        self.player = PLAYER_START;
        self.drops.clear();
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.coins = 0;
        self.drop_speed = START_DROP_SPEED;
        self.spawn_timer = 0.0;
        self.spawn_delay = BASE_SPAWN_DELAY;
    }

    fn step(&mut self, dt_seconds: f32, input: &InputSnapshot) -> RunState {
        let (dx, dy) = input.held_direction();
        let heading = Vec2::new(dx as f32, dy as f32);
        let length = heading.length();
        if length > 0.0 {
            let travel = PLAYER_SPEED * dt_seconds / length;
            self.player.x += heading.x * travel;
            self.player.y += heading.y * travel;
        }
        self.player.x = self.player.x.clamp(FIELD_MIN.x, FIELD_MAX.x);
        self.player.y = self.player.y.clamp(FIELD_MIN.y, FIELD_MAX.y);

        self.spawn_timer += dt_seconds;
        if self.spawn_timer >= self.spawn_delay {
            self.spawn_timer = 0.0;
            self.spawn_drop();
        }

        for drop in &mut self.drops {
            drop.center.x += drop.velocity.x * dt_seconds;
            drop.center.y += drop.velocity.y * dt_seconds;
        }

        let player = self.player_bounds();
        let mut index = 0;
        while index < self.drops.len() {
            let drop = self.drops[index];
            if drop.escaped() {
                self.drops.swap_remove(index);
                self.dodged();
            } else if drop.bounds().intersects(&player) {
                self.drops.swap_remove(index);
                self.lives -= 1;
            } else {
                index += 1;
            }
        }

        self.spawn_delay =
            (BASE_SPAWN_DELAY - SPAWN_DELAY_PER_POINT * self.score as f32).max(MIN_SPAWN_DELAY);

        if self.lives < 0 {
            RunState::Over
        } else {
            RunState::Running
        }
    }

    fn render_play(&self, canvas: &mut Canvas<'_>) {
        fill_screen(canvas, BACKGROUND);
        canvas.fill_rect(ARENA, ARENA_COLOR);
        for drop in &self.drops {
            canvas.fill_circle(drop.center.x, drop.center.y, DROP_RADIUS, DROP_COLOR);
        }
        canvas.draw_sprite("minigames/dodge_player", self.player_bounds(), PLAYER_COLOR);
        draw_run_status(canvas, self.score, Some(self.lives));
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn coins_earned(&self) -> u32 {
        self.coins
    }
}

#[cfg(test)]
mod tests {
    use engine::InputAction;
    use rand::SeedableRng;

    use super::*;

    const TICK: f32 = 1.0 / 60.0;

    fn rules() -> DodgeRules {
        DodgeRules::new(StdRng::seed_from_u64(3))
    }

    #[test]
    fn diagonal_movement_is_normalised() {
        let mut rules = rules();
        let input = InputSnapshot::empty()
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::MoveDown, true);

        rules.step(0.1, &input);

        let moved = Vec2::new(rules.player.x - 400.0, rules.player.y - 340.0);
        assert!((moved.length() - 37.0).abs() < 1e-3, "moved {moved:?}");
        assert!((moved.x - moved.y).abs() < 1e-4);
    }

    #[test]
    fn player_is_kept_inside_the_field() {
        let mut rules = rules();
        let up_left = InputSnapshot::empty()
            .with_action_down(InputAction::MoveUp, true)
            .with_action_down(InputAction::MoveLeft, true);

        for _ in 0..200 {
            rules.step(TICK, &up_left);
        }

        assert_eq!(rules.player, FIELD_MIN);
    }

    #[test]
    fn escaping_drops_score_and_every_fourth_pays_a_coin() {
        let mut rules = rules();
        for _ in 0..4 {
            rules.push_drop(Vec2::new(689.0, 200.0), Vec2::new(220.0, 0.0));
        }

        rules.step(TICK, &InputSnapshot::empty());

        assert_eq!(rules.score(), 4);
        assert_eq!(rules.coins_earned(), 1);
        assert!((rules.spawn_delay - (1.0 - 4.0 * 0.019)).abs() < 1e-4);
    }

    #[test]
    fn hits_cost_lives_and_the_third_ends_the_run() {
        let mut rules = rules();
        for expected_lives in [1, 0] {
            rules.push_drop(PLAYER_START, Vec2::new(0.0, 0.0));
            assert_eq!(rules.step(TICK, &InputSnapshot::empty()), RunState::Running);
            assert_eq!(rules.lives, expected_lives);
        }

        rules.push_drop(PLAYER_START, Vec2::new(0.0, 0.0));

        assert_eq!(rules.step(TICK, &InputSnapshot::empty()), RunState::Over);
    }

    #[test]
    fn spawned_drops_start_on_a_field_edge_and_move_inward() {
        let mut rules = rules();
        for _ in 0..20 {
            rules.spawn_drop();
        }
        for drop in &rules.drops {
            let on_vertical_edge = drop.center.x == FIELD_MIN.x || drop.center.x == FIELD_MAX.x;
            let on_horizontal_edge = drop.center.y == FIELD_MIN.y || drop.center.y == FIELD_MAX.y;
            assert!(on_vertical_edge || on_horizontal_edge);
            let next = Vec2::new(
                drop.center.x + drop.velocity.x * TICK,
                drop.center.y + drop.velocity.y * TICK,
            );
            assert!(ARENA.contains_point(next), "{drop:?}");
        }
    }
}
