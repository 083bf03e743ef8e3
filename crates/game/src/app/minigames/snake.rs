use std::collections::VecDeque;

use engine::{Canvas, InputAction, InputSnapshot, Rect};
use rand::rngs::StdRng;
use rand::Rng;

use super::{draw_run_status, ArcadeRules, RunState};
use crate::app::ui::fill_screen;

pub(crate) const GRID_WIDTH: i32 = 20;
pub(crate) const GRID_HEIGHT: i32 = 16;
const TILE_PX: f32 = 24.0;
const BOARD_LEFT: f32 = (800.0 - GRID_WIDTH as f32 * TILE_PX) / 2.0;
const BOARD_TOP: f32 = 100.0;
pub(crate) const STEP_SECONDS: f32 = 0.12;
const COINS_PER_FOOD: u32 = 2;

const BACKGROUND: [u8; 4] = [16, 24, 16, 255];
const BOARD_COLOR: [u8; 4] = [30, 50, 30, 255];
const SNAKE_COLOR: [u8; 4] = [80, 220, 90, 255];
const HEAD_COLOR: [u8; 4] = [160, 255, 120, 255];
const FOOD_COLOR: [u8; 4] = [230, 60, 60, 255];

pub(crate) type Cell = (i32, i32);

pub(crate) struct SnakeRules {
    rng: StdRng,
    body: VecDeque<Cell>,
    direction: Cell,
    queued_direction: Cell,
    food: Option<Cell>,
    step_timer: f32,
    score: u32,
    coins: u32,
}

impl SnakeRules {
    pub(crate) fn new(rng: StdRng) -> Self {
        let mut rules = Self {
            rng,
            body: VecDeque::new(),
            direction: (1, 0),
            queued_direction: (1, 0),
            food: None,
            step_timer: 0.0,
            score: 0,
            coins: 0,
        };
        rules.reset();
        rules
    }

    pub(crate) fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    /// Picks a uniformly random free cell, or `None` when the snake fills the board.
    fn spawn_food(&mut self) {
        let free: Vec<Cell> = (0..GRID_HEIGHT)
            .flat_map(|y| (0..GRID_WIDTH).map(move |x| (x, y)))
            .filter(|cell| !self.body.contains(cell))
            .collect();
        self.food = if free.is_empty() {
            None
        } else {
            Some(free[self.rng.gen_range(0..free.len())])
        };
    }

    fn advance(&mut self) -> RunState {
        self.direction = self.queued_direction;
        let Some((head_x, head_y)) = self.head() else {
            return RunState::Over;
        };
        let next = (head_x + self.direction.0, head_y + self.direction.1);
        let off_board = !(0..GRID_WIDTH).contains(&next.0) || !(0..GRID_HEIGHT).contains(&next.1);
        if off_board || self.body.contains(&next) {
            self.coins = self.score * COINS_PER_FOOD;
            return RunState::Over;
        }

        self.body.push_front(next);
        if self.food == Some(next) {
            self.score += 1;
            self.spawn_food();
            if self.food.is_none() {
                self.coins = self.score * COINS_PER_FOOD;
                return RunState::Over;
            }
        } else {
            self.body.pop_back();
        }
        RunState::Running
    }

    fn cell_rect((x, y): Cell) -> Rect {
        Rect::new(
            BOARD_LEFT + x as f32 * TILE_PX + 1.0,
            BOARD_TOP + y as f32 * TILE_PX + 1.0,
            TILE_PX - 2.0,
            TILE_PX - 2.0,
        )
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, body: &[Cell], direction: Cell, food: Option<Cell>) {
        self.body = body.iter().copied().collect();
        self.direction = direction;
        self.queued_direction = direction;
        self.food = food;
    }
}

impl ArcadeRules for SnakeRules {
    fn title(&self) -> &'static str {
        "Snake"
    }

    fn instructions(&self) -> &'static [&'static str] {
        &[
            "Steer with the arrow keys or WASD.",
            "Eat the red food to grow.",
            "Do not hit the walls or yourself.",
            "Each food is worth 2 coins.",
        ]
    }

    fn reset(&mut self) {
        self.body.clear();
        self.body.push_back((GRID_WIDTH / 2, GRID_HEIGHT / 2));
        self.direction = (1, 0);
        self.queued_direction = (1, 0);
        self.step_timer = 0.0;
        self.score = 0;
        self.coins = 0;
        self.spawn_food();
    }

    /// Turning straight back onto the neck is ignored; the check is against the direction of
    /// the last completed step so two quick presses cannot fold the snake onto itself.
    fn play_key(&mut self, action: InputAction) {
        let wanted = match action {
            InputAction::MoveUp => (0, -1),
            InputAction::MoveDown => (0, 1),
            InputAction::MoveLeft => (-1, 0),
            InputAction::MoveRight => (1, 0),
            _ => return,
        };
        if wanted != (-self.direction.0, -self.direction.1) {
            self.queued_direction = wanted;
        }
    }

    fn step(&mut self, dt_seconds: f32, _input: &InputSnapshot) -> RunState {
        self.step_timer += dt_seconds;
        if self.step_timer < STEP_SECONDS {
            return RunState::Running;
        }
        self.step_timer = 0.0;
        self.advance()
    }

    fn render_play(&self, canvas: &mut Canvas<'_>) {
        fill_screen(canvas, BACKGROUND);
        canvas.fill_rect(
            Rect::new(
                BOARD_LEFT,
                BOARD_TOP,
                GRID_WIDTH as f32 * TILE_PX,
                GRID_HEIGHT as f32 * TILE_PX,
            ),
            BOARD_COLOR,
        );
        if let Some(food) = self.food {
            canvas.draw_sprite("minigames/snake_food", Self::cell_rect(food), FOOD_COLOR);
        }
        for (index, cell) in self.body.iter().enumerate() {
            let color = if index == 0 { HEAD_COLOR } else { SNAKE_COLOR };
            canvas.fill_rect(Self::cell_rect(*cell), color);
        }
        draw_run_status(canvas, self.score, None);
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
    use rand::SeedableRng;

    use super::*;

    fn rules() -> SnakeRules {
        SnakeRules::new(StdRng::seed_from_u64(7))
    }

    fn step_once(rules: &mut SnakeRules) -> RunState {
        rules.step(STEP_SECONDS, &InputSnapshot::empty())
    }

    #[test]
    fn starts_in_the_middle_heading_right_with_food_off_the_snake() {
        let rules = rules();
        assert_eq!(rules.head(), Some((10, 8)));
        assert_eq!(rules.body.len(), 1);
        assert!(rules.food.is_some());
        assert_ne!(rules.food, rules.head());
    }

    #[test]
    fn moves_one_cell_per_step_interval() {
        let mut rules = rules();
        rules.place(&[(5, 5)], (1, 0), Some((0, 0)));

        rules.step(STEP_SECONDS / 2.0, &InputSnapshot::empty());
        assert_eq!(rules.head(), Some((5, 5)));
        rules.step(STEP_SECONDS / 2.0, &InputSnapshot::empty());
        assert_eq!(rules.head(), Some((6, 5)));
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut rules = rules();
        rules.place(&[(5, 5), (4, 5)], (1, 0), Some((6, 5)));

        assert_eq!(step_once(&mut rules), RunState::Running);

        assert_eq!(rules.body.len(), 3);
        assert_eq!(rules.score(), 1);
        assert!(rules.food.is_some_and(|food| !rules.body.contains(&food)));
    }

    #[test]
    fn reversing_into_the_neck_is_ignored() {
        let mut rules = rules();
        rules.place(&[(5, 5), (4, 5)], (1, 0), Some((0, 0)));

        rules.play_key(InputAction::MoveLeft);
        step_once(&mut rules);

        assert_eq!(rules.head(), Some((6, 5)));
    }

    #[test]
    fn wall_hit_ends_the_run_and_pays_two_coins_per_food() {
        let mut rules = rules();
        rules.place(&[(GRID_WIDTH - 1, 3)], (1, 0), Some((0, 0)));
        rules.score = 4;

        assert_eq!(step_once(&mut rules), RunState::Over);
        assert_eq!(rules.coins_earned(), 8);
    }

    #[test]
    fn running_into_own_body_ends_the_run() {
        let mut rules = rules();
        rules.place(&[(5, 5), (5, 6), (6, 6), (6, 5), (6, 4)], (0, -1), Some((0, 0)));

        rules.play_key(InputAction::MoveRight);

        assert_eq!(step_once(&mut rules), RunState::Over);
    }
}
