use engine::{Canvas, InputAction};
use tracing::debug;

use super::SubView;
use crate::app::minigames::MiniGameKind;
use crate::app::session::SessionContext;
use crate::app::ui::{
    draw_hint, draw_menu, draw_title, fill_screen, MenuCursor, MENU_SCALE, PANEL_BACKGROUND,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComputerChoice {
    Shop,
    MiniGame(MiniGameKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Shop,
    MiniGame(MiniGameKind),
    Back,
}

impl Entry {
    fn label(self) -> &'static str {
        match self {
            Entry::Shop => "Shop",
            Entry::MiniGame(kind) => kind.label(),
            Entry::Back => "Back",
        }
    }
}

/// Desktop menu. Its mini-game entries are fixed when the view is initialised, so the
/// controller rebuilds it after every visit to the shop.
#[derive(Debug)]
pub(crate) struct ComputerView {
    entries: Vec<Entry>,
    cursor: MenuCursor,
    selection: Option<ComputerChoice>,
    close_requested: bool,
}

impl ComputerView {
    pub(crate) fn new() -> Self {
        Self {
            entries: vec![Entry::Shop, Entry::Back],
            cursor: MenuCursor::default(),
            selection: None,
            close_requested: false,
        }
    }

    pub(crate) fn take_selection(&mut self) -> Option<ComputerChoice> {
        self.selection.take()
    }

    pub(crate) fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.label()).collect()
    }
}

impl SubView for ComputerView {
    fn init(&mut self, session: &SessionContext) {
        let owned_games = session
            .profile
            .owned_mini_games
            .iter()
            .filter_map(|id| MiniGameKind::from_id(id))
            .map(Entry::MiniGame);
        self.entries = std::iter::once(Entry::Shop)
            .chain(owned_games)
            .chain(std::iter::once(Entry::Back))
            .collect();
        self.cursor.clamp_to(self.entries.len());
        debug!(entries = self.entries.len(), "computer_menu_built");
    }

    fn handle_key(&mut self, action: InputAction, _session: &mut SessionContext) {
        match action {
            InputAction::Cancel => self.close_requested = true,
            InputAction::Confirm => {
                let Some(entry) = self
                    .cursor
                    .current(self.entries.len())
                    .and_then(|index| self.entries.get(index))
                else {
                    return;
                };
                match *entry {
                    Entry::Shop => self.selection = Some(ComputerChoice::Shop),
                    Entry::MiniGame(kind) => self.selection = Some(ComputerChoice::MiniGame(kind)),
                    Entry::Back => self.close_requested = true,
                }
            }
            other => self.cursor.navigate(other, self.entries.len()),
        }
    }

    fn render(&self, canvas: &mut Canvas<'_>, _session: &SessionContext) {
        fill_screen(canvas, PANEL_BACKGROUND);
        draw_title(canvas, "Computer", 80);
        draw_menu(
            canvas,
            &self.labels(),
            self.cursor.current(self.entries.len()),
            200,
            MENU_SCALE,
        );
        draw_hint(canvas, "Enter: open   Esc: back");
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn reset_close_flag(&mut self) {
        self.close_requested = false;
    }
}
