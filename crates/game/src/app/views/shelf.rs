use engine::{Canvas, InputAction, Rect};

use super::SubView;
use crate::app::items::{draw_item, item_label};
use crate::app::profile::Collection;
use crate::app::session::SessionContext;
use crate::app::ui::{
    draw_hint, draw_title, fill_screen, BODY_SCALE, DIM_TEXT_COLOR, HIGHLIGHT_COLOR,
    PANEL_BACKGROUND, TEXT_COLOR,
};

pub(crate) const SHELF_SLOTS: usize = 4;
const SLOT_SIZE: f32 = 120.0;
const SLOT_GAP: f32 = 40.0;
const SLOT_TOP: f32 = 220.0;
const PLANK_COLOR: [u8; 4] = [120, 82, 50, 255];

#[derive(Debug, Default)]
pub(crate) struct ShelfView {
    selected: usize,
    close_requested: bool,
}

impl ShelfView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    fn slot_rect(index: usize) -> Rect {
        let total = SHELF_SLOTS as f32 * SLOT_SIZE + (SHELF_SLOTS as f32 - 1.0) * SLOT_GAP;
        let left = 400.0 - total / 2.0;
        Rect::new(
            left + index as f32 * (SLOT_SIZE + SLOT_GAP),
            SLOT_TOP,
            SLOT_SIZE,
            SLOT_SIZE,
        )
    }
}

fn displayed(session: &SessionContext) -> &[String] {
    let owned = &session.profile.owned_decorations;
    &owned[..owned.len().min(SHELF_SLOTS)]
}

impl SubView for ShelfView {
    fn handle_key(&mut self, action: InputAction, session: &mut SessionContext) {
        let len = displayed(session).len();
        match action {
            InputAction::Cancel => self.close_requested = true,
            InputAction::MoveLeft => self.selected = self.selected.saturating_sub(1),
            InputAction::MoveRight if self.selected + 1 < len => self.selected += 1,
            _ => {}
        }
    }

    fn render(&self, canvas: &mut Canvas<'_>, session: &SessionContext) {
        fill_screen(canvas, PANEL_BACKGROUND);
        draw_title(canvas, "Your Shelf Decorations", 80);

        let decorations = displayed(session);
        for index in 0..SHELF_SLOTS {
            let slot = Self::slot_rect(index);
            canvas.fill_rect(
                Rect::new(slot.x - 10.0, slot.bottom(), slot.width + 20.0, 12.0),
                PLANK_COLOR,
            );
            let Some(id) = decorations.get(index) else {
                continue;
            };
            draw_item(canvas, Collection::Decorations, id, slot);
            if index == self.selected {
                canvas.outline_rect(slot, 3, HIGHLIGHT_COLOR);
            }
        }

        match decorations.get(self.selected) {
            Some(id) => canvas.draw_text_centered(
                400,
                400,
                item_label(Collection::Decorations, id),
                BODY_SCALE,
                TEXT_COLOR,
            ),
            None => canvas.draw_text_centered(
                400,
                400,
                "Nothing on the shelf yet",
                BODY_SCALE,
                DIM_TEXT_COLOR,
            ),
        }
        draw_hint(canvas, "Left/Right: look   Esc: back");
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn reset_close_flag(&mut self) {
        self.close_requested = false;
    }
}
