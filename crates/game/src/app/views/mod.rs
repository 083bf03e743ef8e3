mod aquarium;
mod computer;
mod shelf;
mod shop;
mod shop_category;
mod start_menu;
mod storage_rack;

use engine::{Canvas, InputAction, InputSnapshot};

use super::session::SessionContext;

pub(crate) use aquarium::AquariumView;
pub(crate) use computer::{ComputerChoice, ComputerView};
pub(crate) use shelf::ShelfView;
pub(crate) use shop::{ShopKind, ShopView};
pub(crate) use shop_category::ShopCategoryView;
pub(crate) use start_menu::{StartMenuChoice, StartMenuView};
pub(crate) use storage_rack::StorageRackView;

/// A full-screen panel owned by the session controller while its mode is active.
///
/// Discrete presses arrive one at a time through `handle_key`, in the order they were typed.
/// `update` runs once per tick afterwards with the whole tick snapshot: held keys plus the
/// presses already routed to `handle_key`. A view signals that it wants to go away through
/// `should_close`; the controller decides where control goes next.
pub(crate) trait SubView {
    fn init(&mut self, _session: &SessionContext) {}
    fn handle_key(&mut self, action: InputAction, session: &mut SessionContext);
    fn update(&mut self, _dt_seconds: f32, _input: &InputSnapshot, _session: &mut SessionContext) {
    }
    fn render(&self, canvas: &mut Canvas<'_>, session: &SessionContext);
    fn should_close(&self) -> bool;
    fn reset_close_flag(&mut self);
}
