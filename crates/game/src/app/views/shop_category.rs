use engine::{Canvas, InputAction};

use super::{ShopKind, SubView};
use crate::app::session::SessionContext;
use crate::app::ui::{
    draw_hint, draw_menu, draw_title, fill_screen, MenuCursor, MENU_SCALE, PANEL_BACKGROUND,
};

const ENTRIES: [(Option<ShopKind>, &str); 5] = [
    (Some(ShopKind::Hat), "Hat Shop"),
    (Some(ShopKind::FishTank), "Fish Tank Items"),
    (Some(ShopKind::Shelf), "Shelf Decorations"),
    (Some(ShopKind::MiniGame), "Mini Games"),
    (None, "Back"),
];

#[derive(Debug, Default)]
pub(crate) struct ShopCategoryView {
    cursor: MenuCursor,
    selection: Option<ShopKind>,
    close_requested: bool,
}

impl ShopCategoryView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn take_selection(&mut self) -> Option<ShopKind> {
        self.selection.take()
    }
}

impl SubView for ShopCategoryView {
    fn handle_key(&mut self, action: InputAction, _session: &mut SessionContext) {
        match action {
            InputAction::Cancel => self.close_requested = true,
            InputAction::Confirm => {
                let Some(index) = self.cursor.current(ENTRIES.len()) else {
                    return;
                };
                match ENTRIES[index].0 {
                    Some(kind) => self.selection = Some(kind),
                    None => self.close_requested = true,
                }
            }
            other => self.cursor.navigate(other, ENTRIES.len()),
        }
    }

    fn render(&self, canvas: &mut Canvas<'_>, _session: &SessionContext) {
        fill_screen(canvas, PANEL_BACKGROUND);
        draw_title(canvas, "Shop", 80);
        let labels = ENTRIES.map(|(_, label)| label);
        draw_menu(canvas, &labels, Some(self.cursor.selected()), 190, MENU_SCALE);
        draw_hint(canvas, "Enter: browse   Esc: back");
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn reset_close_flag(&mut self) {
        self.close_requested = false;
    }
}
