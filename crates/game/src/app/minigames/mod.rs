mod catch;
mod dodge;
mod snake;

use engine::{Canvas, InputAction, InputSnapshot, Rect};
use rand::rngs::StdRng;
use tracing::info;

use super::items::item_label;
use super::profile::Collection;
use super::session::SessionContext;
use super::ui::{
    draw_hint, draw_menu, draw_title, fill_screen, MenuCursor, BODY_SCALE, DIM_TEXT_COLOR,
    HIGHLIGHT_COLOR, MENU_BACKGROUND, MENU_SCALE, TEXT_COLOR,
};
use super::views::SubView;

pub(crate) use catch::CatchRules;
pub(crate) use dodge::DodgeRules;
pub(crate) use snake::SnakeRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MiniGameKind {
    Snake,
    Catch,
    Dodge,
}

impl MiniGameKind {
    pub(crate) fn from_id(id: &str) -> Option<Self> {
        match id {
            "snake" => Some(Self::Snake),
            "catch" => Some(Self::Catch),
            "dodge" => Some(Self::Dodge),
            _ => None,
        }
    }

    pub(crate) fn id(self) -> &'static str {
        match self {
            Self::Snake => "snake",
            Self::Catch => "catch",
            Self::Dodge => "dodge",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        item_label(Collection::MiniGames, self.id())
    }
}

/// A sub-view that can pay out. `finished_game` is true from the moment a run ends until the
/// player restarts or returns to the game's own menu.
pub(crate) trait MiniGame: SubView {
    fn coins_earned(&self) -> u32;
    fn finished_game(&self) -> bool;
    fn as_sub_view(&self) -> &dyn SubView;
    fn as_sub_view_mut(&mut self) -> &mut dyn SubView;
}

pub(crate) fn create_mini_game(kind: MiniGameKind, rng: StdRng) -> Box<dyn MiniGame> {
    match kind {
        MiniGameKind::Snake => Box::new(ArcadeShell::new(SnakeRules::new(rng))),
        MiniGameKind::Catch => Box::new(ArcadeShell::new(CatchRules::new(rng))),
        MiniGameKind::Dodge => Box::new(ArcadeShell::new(DodgeRules::new(rng))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    Running,
    Over,
}

/// The playable part of a mini-game. Menus, pausing and the game-over screen live in
/// `ArcadeShell` and are the same for every game.
pub(crate) trait ArcadeRules {
    fn title(&self) -> &'static str;
    fn instructions(&self) -> &'static [&'static str];
    fn reset(&mut self);
    fn play_key(&mut self, _action: InputAction) {}
    fn step(&mut self, dt_seconds: f32, input: &InputSnapshot) -> RunState;
    fn render_play(&self, canvas: &mut Canvas<'_>);
    fn score(&self) -> u32;
    fn coins_earned(&self) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GamePhase {
    MainMenu,
    Instructions,
    Playing,
    Paused,
    GameOver,
}

const MAIN_MENU: [&str; 3] = ["Play", "Instructions", "Exit"];
const PAUSE_MENU: [&str; 2] = ["Resume", "Exit"];
const GAME_OVER_MENU: [&str; 2] = ["Restart", "Back to Menu"];
const OVERLAY_COLOR: [u8; 4] = [0, 0, 0, 170];

pub(crate) struct ArcadeShell<R> {
    rules: R,
    phase: GamePhase,
    cursor: MenuCursor,
    close_requested: bool,
}

impl<R: ArcadeRules> ArcadeShell<R> {
    pub(crate) fn new(rules: R) -> Self {
        Self {
            rules,
            phase: GamePhase::MainMenu,
            cursor: MenuCursor::default(),
            close_requested: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> GamePhase {
        self.phase
    }

    #[cfg(test)]
    pub(crate) fn rules(&self) -> &R {
        &self.rules
    }

    fn enter(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.cursor = MenuCursor::default();
    }

    fn start_run(&mut self) {
        self.rules.reset();
        self.enter(GamePhase::Playing);
    }

    /// Two-entry menus accept left/right as well as up/down.
    fn navigate_pair(&mut self, action: InputAction) {
        let vertical = match action {
            InputAction::MoveLeft => InputAction::MoveUp,
            InputAction::MoveRight => InputAction::MoveDown,
            other => other,
        };
        self.cursor.navigate(vertical, 2);
    }

    fn render_menu_screen(&self, canvas: &mut Canvas<'_>) {
        fill_screen(canvas, MENU_BACKGROUND);
        draw_title(canvas, self.rules.title(), 120);
        draw_menu(canvas, &MAIN_MENU, Some(self.cursor.selected()), 260, MENU_SCALE);
        draw_hint(canvas, "Enter: select   Esc: leave");
    }

    fn render_instructions(&self, canvas: &mut Canvas<'_>) {
        fill_screen(canvas, MENU_BACKGROUND);
        draw_title(canvas, "How to play", 90);
        for (line, text) in self.rules.instructions().iter().enumerate() {
            canvas.draw_text_centered(400, 200 + line as i32 * 36, text, BODY_SCALE, TEXT_COLOR);
        }
        draw_hint(canvas, "Press any key to go back");
    }

    fn render_overlay(&self, canvas: &mut Canvas<'_>, heading: &str, entries: &[&str]) {
        canvas.fill_rect(Rect::new(200.0, 170.0, 400.0, 260.0), OVERLAY_COLOR);
        canvas.draw_text_centered(400, 200, heading, MENU_SCALE, HIGHLIGHT_COLOR);
        if self.phase == GamePhase::GameOver {
            canvas.draw_text_centered(
                400,
                250,
                &format!("Score: {}", self.rules.score()),
                BODY_SCALE,
                TEXT_COLOR,
            );
            canvas.draw_text_centered(
                400,
                280,
                &format!("Coins earned: {}", self.rules.coins_earned()),
                BODY_SCALE,
                DIM_TEXT_COLOR,
            );
        }
        draw_menu(canvas, entries, Some(self.cursor.selected()), 330, BODY_SCALE);
    }
}

impl<R: ArcadeRules> SubView for ArcadeShell<R> {
    fn handle_key(&mut self, action: InputAction, _session: &mut SessionContext) {
        match self.phase {
            GamePhase::MainMenu => match action {
                InputAction::Cancel => self.close_requested = true,
                InputAction::Confirm => match self.cursor.selected() {
                    0 => self.start_run(),
                    1 => self.enter(GamePhase::Instructions),
                    _ => self.close_requested = true,
                },
                other => self.cursor.navigate(other, MAIN_MENU.len()),
            },
            GamePhase::Instructions => self.enter(GamePhase::MainMenu),
            GamePhase::Playing => match action {
                InputAction::Cancel => self.enter(GamePhase::Paused),
                other => self.rules.play_key(other),
            },
            GamePhase::Paused => match action {
                InputAction::Cancel => self.phase = GamePhase::Playing,
                InputAction::Confirm if self.cursor.selected() == 0 => {
                    self.phase = GamePhase::Playing;
                }
                InputAction::Confirm => self.close_requested = true,
                other => self.navigate_pair(other),
            },
            GamePhase::GameOver => match action {
                InputAction::Cancel => self.enter(GamePhase::MainMenu),
                InputAction::Confirm if self.cursor.selected() == 0 => self.start_run(),
                InputAction::Confirm => self.enter(GamePhase::MainMenu),
                other => self.navigate_pair(other),
            },
        }
    }

    fn update(&mut self, dt_seconds: f32, input: &InputSnapshot, _session: &mut SessionContext) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if self.rules.step(dt_seconds, input) == RunState::Over {
            info!(
                game = self.rules.title(),
                score = self.rules.score(),
                coins = self.rules.coins_earned(),
                "mini_game_over"
            );
            self.enter(GamePhase::GameOver);
        }
    }

    fn render(&self, canvas: &mut Canvas<'_>, _session: &SessionContext) {
        match self.phase {
            GamePhase::MainMenu => self.render_menu_screen(canvas),
            GamePhase::Instructions => self.render_instructions(canvas),
            GamePhase::Playing => self.rules.render_play(canvas),
            GamePhase::Paused => {
                self.rules.render_play(canvas);
                self.render_overlay(canvas, "Paused", &PAUSE_MENU);
            }
            GamePhase::GameOver => {
                self.rules.render_play(canvas);
                self.render_overlay(canvas, "Game Over", &GAME_OVER_MENU);
            }
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn reset_close_flag(&mut self) {
        self.close_requested = false;
    }
}

impl<R: ArcadeRules> MiniGame for ArcadeShell<R> {
    fn coins_earned(&self) -> u32 {
        self.rules.coins_earned()
    }

    fn finished_game(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    fn as_sub_view(&self) -> &dyn SubView {
        self
    }

    fn as_sub_view_mut(&mut self) -> &mut dyn SubView {
        self
    }
}

/// Score and lives line shared by the arena games.
pub(crate) fn draw_run_status(canvas: &mut Canvas<'_>, score: u32, lives: Option<i32>) {
    canvas.draw_text(20, 16, &format!("Score: {score}"), BODY_SCALE, TEXT_COLOR);
    if let Some(lives) = lives {
        canvas.draw_text(20, 44, &format!("Lives: {}", lives.max(0)), BODY_SCALE, TEXT_COLOR);
    }
}
