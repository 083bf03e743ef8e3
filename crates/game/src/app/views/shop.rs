use engine::{Canvas, InputAction, Rect};
use tracing::info;

use super::SubView;
use crate::app::items::{draw_item, items_for, ItemDef};
use crate::app::profile::{Collection, PlayerProfile, PurchaseOutcome};
use crate::app::session::SessionContext;
use crate::app::ui::{
    draw_hint, draw_menu, draw_title, fill_screen, MenuCursor, BODY_SCALE, PANEL_BACKGROUND,
    TEXT_COLOR, WARNING_COLOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShopKind {
    Hat,
    FishTank,
    Shelf,
    MiniGame,
}

impl ShopKind {
    pub(crate) fn collection(self) -> Collection {
        match self {
            ShopKind::Hat => Collection::Hats,
            ShopKind::FishTank => Collection::Aquarium,
            ShopKind::Shelf => Collection::Decorations,
            ShopKind::MiniGame => Collection::MiniGames,
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            ShopKind::Hat => "Hat Shop",
            ShopKind::FishTank => "Fish Tank Shop",
            ShopKind::Shelf => "Shelf Shop",
            ShopKind::MiniGame => "Mini Game Shop",
        }
    }
}

const MENU_TOP_Y: i32 = 170;
const PREVIEW_SIZE: f32 = 64.0;

/// One storefront per catalog. Rows are the catalog items followed by "Back".
#[derive(Debug)]
pub(crate) struct ShopView {
    kind: ShopKind,
    cursor: MenuCursor,
    status: Option<String>,
    close_requested: bool,
}

impl ShopView {
    pub(crate) fn new(kind: ShopKind) -> Self {
        Self {
            kind,
            cursor: MenuCursor::default(),
            status: None,
            close_requested: false,
        }
    }

    pub(crate) fn kind(&self) -> ShopKind {
        self.kind
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn items(&self) -> &'static [ItemDef] {
        items_for(self.kind.collection())
    }

    fn row_count(&self) -> usize {
        self.items().len() + 1
    }

    pub(crate) fn row_labels(&self, profile: &PlayerProfile) -> Vec<String> {
        let collection = self.kind.collection();
        self.items()
            .iter()
            .map(|item| {
                let owned = if profile.owns(collection, item.id) {
                    " (Owned)"
                } else {
                    ""
                };
                format!("{} - {} coins{owned}", item.label, item.price)
            })
            .chain(std::iter::once("Back".to_string()))
            .collect()
    }

    fn buy(&mut self, item: &ItemDef, session: &mut SessionContext) {
        match session
            .profile
            .purchase(self.kind.collection(), item.id, item.price)
        {
            PurchaseOutcome::Purchased => {
                info!(
                    shop = ?self.kind,
                    item = item.id,
                    price = item.price,
                    coins = session.profile.coins,
                    "item_purchased"
                );
                self.status = Some(format!("Bought {}!", item.label));
                session.persist();
            }
            PurchaseOutcome::AlreadyOwned => {}
            PurchaseOutcome::NotEnoughCoins => {
                self.status = Some("Not enough coins".to_string());
            }
        }
    }
}

impl SubView for ShopView {
    fn handle_key(&mut self, action: InputAction, session: &mut SessionContext) {
        match action {
            InputAction::Cancel => self.close_requested = true,
            InputAction::Confirm => {
                let Some(index) = self.cursor.current(self.row_count()) else {
                    return;
                };
                match self.items().get(index) {
                    Some(item) => self.buy(item, session),
                    None => self.close_requested = true,
                }
            }
            other => self.cursor.navigate(other, self.row_count()),
        }
    }

    fn render(&self, canvas: &mut Canvas<'_>, session: &SessionContext) {
        fill_screen(canvas, PANEL_BACKGROUND);
        draw_title(canvas, self.kind.title(), 70);
        let rows = self.row_labels(&session.profile);
        let selected = self.cursor.current(self.row_count());
        draw_menu(canvas, &rows, selected, MENU_TOP_Y, BODY_SCALE);

        if let Some(item) = selected.and_then(|index| self.items().get(index)) {
            let preview = Rect::new(
                400.0 - PREVIEW_SIZE / 2.0,
                420.0,
                PREVIEW_SIZE,
                PREVIEW_SIZE,
            );
            draw_item(canvas, self.kind.collection(), item.id, preview);
        }
        if let Some(status) = &self.status {
            let color = if status.starts_with("Not") {
                WARNING_COLOR
            } else {
                TEXT_COLOR
            };
            canvas.draw_text_centered(400, 510, status, BODY_SCALE, color);
        }
        draw_hint(canvas, "Enter: buy   Esc: back");
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn reset_close_flag(&mut self) {
        self.close_requested = false;
    }
}
