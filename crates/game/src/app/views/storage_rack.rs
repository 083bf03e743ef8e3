use engine::{Canvas, InputAction, Rect};
use tracing::info;

use super::SubView;
use crate::app::items::{draw_item, item_label};
use crate::app::profile::{Collection, EquipOutcome};
use crate::app::session::SessionContext;
use crate::app::ui::{
    draw_hint, draw_title, fill_screen, BODY_SCALE, DIM_TEXT_COLOR, HIGHLIGHT_COLOR,
    PANEL_BACKGROUND, SMALL_SCALE, TEXT_COLOR,
};

const COLUMNS: usize = 2;
const CELL_WIDTH: f32 = 220.0;
const CELL_HEIGHT: f32 = 110.0;
const GRID_TOP: f32 = 150.0;
const GRID_LEFT: f32 = 400.0 - CELL_WIDTH;
const ICON_SIZE: f32 = 56.0;

/// Hat wardrobe: a two-column grid over unlocked hats. Confirm toggles the selected hat.
#[derive(Debug, Default)]
pub(crate) struct StorageRackView {
    selected: usize,
    close_requested: bool,
}

impl StorageRackView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    fn move_cursor(&mut self, action: InputAction, len: usize) {
        if len == 0 {
            return;
        }
        let target = match action {
            InputAction::MoveLeft if self.selected % COLUMNS > 0 => Some(self.selected - 1),
            InputAction::MoveRight if self.selected % COLUMNS + 1 < COLUMNS => {
                Some(self.selected + 1)
            }
            InputAction::MoveUp => self.selected.checked_sub(COLUMNS),
            InputAction::MoveDown => Some(self.selected + COLUMNS),
            _ => None,
        };
        if let Some(target) = target.filter(|&target| target < len) {
            self.selected = target;
        }
    }

    fn cell_rect(index: usize) -> Rect {
        let column = (index % COLUMNS) as f32;
        let row = (index / COLUMNS) as f32;
        Rect::new(
            GRID_LEFT + column * CELL_WIDTH,
            GRID_TOP + row * CELL_HEIGHT,
            CELL_WIDTH - 12.0,
            CELL_HEIGHT - 12.0,
        )
    }
}

impl SubView for StorageRackView {
    fn init(&mut self, session: &SessionContext) {
        let len = session.profile.unlocked_hats.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn handle_key(&mut self, action: InputAction, session: &mut SessionContext) {
        let len = session.profile.unlocked_hats.len();
        match action {
            InputAction::Cancel => self.close_requested = true,
            InputAction::Confirm => {
                let Some(hat) = session.profile.unlocked_hats.get(self.selected).cloned() else {
                    return;
                };
                let outcome = session.profile.toggle_hat(&hat);
                if outcome != EquipOutcome::NotOwned {
                    info!(hat = %hat, outcome = ?outcome, "hat_toggled");
                    session.persist();
                }
            }
            other => self.move_cursor(other, len),
        }
    }

    fn render(&self, canvas: &mut Canvas<'_>, session: &SessionContext) {
        fill_screen(canvas, PANEL_BACKGROUND);
        draw_title(canvas, "Storage Rack", 60);

        let profile = &session.profile;
        let equipped = profile
            .equipped_hat
            .as_deref()
            .map_or("none", |hat| item_label(Collection::Hats, hat));
        canvas.draw_text_centered(
            400,
            115,
            &format!("Equipped: {equipped}"),
            BODY_SCALE,
            TEXT_COLOR,
        );

        if profile.unlocked_hats.is_empty() {
            canvas.draw_text_centered(400, 280, "No hats yet", BODY_SCALE, DIM_TEXT_COLOR);
        }
        for (index, hat) in profile.unlocked_hats.iter().enumerate() {
            let cell = Self::cell_rect(index);
            if index == self.selected {
                canvas.outline_rect(cell, 3, HIGHLIGHT_COLOR);
            }
            let icon = Rect::new(
                cell.center().x - ICON_SIZE / 2.0,
                cell.y + 10.0,
                ICON_SIZE,
                ICON_SIZE * 0.6,
            );
            draw_item(canvas, Collection::Hats, hat, icon);
            let color = if profile.equipped_hat.as_deref() == Some(hat.as_str()) {
                HIGHLIGHT_COLOR
            } else {
                TEXT_COLOR
            };
            canvas.draw_text_centered(
                cell.center().x as i32,
                (cell.bottom() - 24.0) as i32,
                item_label(Collection::Hats, hat),
                SMALL_SCALE,
                color,
            );
        }
        draw_hint(canvas, "Arrows: choose   Enter: wear/remove   Esc: back");
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn reset_close_flag(&mut self) {
        self.close_requested = false;
    }
}
