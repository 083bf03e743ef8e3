use engine::{Canvas, InputAction};

use super::SubView;
use crate::app::profile::ProfileError;
use crate::app::session::SessionContext;
use crate::app::ui::{
    draw_hint, draw_menu, draw_title, fill_screen, MenuCursor, BODY_SCALE, MENU_BACKGROUND,
    MENU_SCALE, WARNING_COLOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartMenuChoice {
    NewGame,
    LoadGame,
    Exit,
}

const OPTIONS: [(StartMenuChoice, &str); 3] = [
    (StartMenuChoice::NewGame, "New Game"),
    (StartMenuChoice::LoadGame, "Load Game"),
    (StartMenuChoice::Exit, "Exit"),
];

#[derive(Debug, Default)]
pub(crate) struct StartMenuView {
    cursor: MenuCursor,
    selection: Option<StartMenuChoice>,
    status: Option<&'static str>,
}

impl StartMenuView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn take_selection(&mut self) -> Option<StartMenuChoice> {
        self.selection.take()
    }

    pub(crate) fn show_load_failure(&mut self, error: &ProfileError) {
        self.status = Some(match error {
            ProfileError::Parse { .. } => "Save file is damaged",
            _ => "No save found",
        });
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> Option<&'static str> {
        self.status
    }
}

impl SubView for StartMenuView {
    fn handle_key(&mut self, action: InputAction, _session: &mut SessionContext) {
        match action {
            InputAction::Confirm => {
                self.selection = self
                    .cursor
                    .current(OPTIONS.len())
                    .map(|index| OPTIONS[index].0);
            }
            other => self.cursor.navigate(other, OPTIONS.len()),
        }
    }

    fn render(&self, canvas: &mut Canvas<'_>, _session: &SessionContext) {
        fill_screen(canvas, MENU_BACKGROUND);
        draw_title(canvas, "Catpurrter", 120);
        let labels = OPTIONS.map(|(_, label)| label);
        draw_menu(canvas, &labels, Some(self.cursor.selected()), 260, MENU_SCALE);
        if let Some(status) = self.status {
            canvas.draw_text_centered(400, 470, status, BODY_SCALE, WARNING_COLOR);
        }
        draw_hint(canvas, "Arrows: choose   Enter: select");
    }

    fn should_close(&self) -> bool {
        false
    }

    fn reset_close_flag(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::testing::test_session;

    #[test]
    fn confirm_reports_the_highlighted_option_once() {
        let (_dir, mut session) = test_session();
        let mut menu = StartMenuView::new();

        menu.handle_key(InputAction::MoveDown, &mut session);
        menu.handle_key(InputAction::Confirm, &mut session);

        assert_eq!(menu.take_selection(), Some(StartMenuChoice::LoadGame));
        assert_eq!(menu.take_selection(), None);
    }

    #[test]
    fn moving_up_from_the_top_wraps_to_exit() {
        let (_dir, mut session) = test_session();
        let mut menu = StartMenuView::new();

        menu.handle_key(InputAction::MoveUp, &mut session);
        menu.handle_key(InputAction::Confirm, &mut session);

        assert_eq!(menu.take_selection(), Some(StartMenuChoice::Exit));
    }

    #[test]
    fn cancel_does_nothing_on_the_start_menu() {
        let (_dir, mut session) = test_session();
        let mut menu = StartMenuView::new();

        menu.handle_key(InputAction::Cancel, &mut session);

        assert!(!menu.should_close());
        assert_eq!(menu.take_selection(), None);
    }
}
