use engine::{Canvas, InputAction, InputSnapshot, Scene, SceneCommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::minigames::{create_mini_game, MiniGame, MiniGameKind};
use super::room::{ObjectKind, RoomScene};
use super::session::SessionContext;
use super::ui::draw_coin_display;
use super::views::{
    AquariumView, ComputerChoice, ComputerView, ShelfView, ShopCategoryView, ShopKind, ShopView,
    StartMenuChoice, StartMenuView, StorageRackView, SubView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    StartMenu,
    RoomView,
    ComputerView,
    StorageView,
    ShelfView,
    ShopCategoryView,
    HatShop,
    ShelfShop,
    FishTankShop,
    MiniGameShop,
    AquariumView,
    MiniGame,
}

/// The one live screen. The room itself is not stored here because it outlives the views
/// opened from it.
enum ActiveView {
    StartMenu(StartMenuView),
    Room,
    Computer(ComputerView),
    ShopCategory(ShopCategoryView),
    Shop(ShopView),
    Storage(StorageRackView),
    Shelf(ShelfView),
    Aquarium(AquariumView),
    MiniGame {
        kind: Option<MiniGameKind>,
        game: Box<dyn MiniGame>,
        paid_out: bool,
    },
}

impl ActiveView {
    fn mini_game(kind: Option<MiniGameKind>, game: Box<dyn MiniGame>) -> Self {
        Self::MiniGame {
            kind,
            game,
            paid_out: false,
        }
    }

    fn mode(&self) -> Mode {
        match self {
            Self::StartMenu(_) => Mode::StartMenu,
            Self::Room => Mode::RoomView,
            Self::Computer(_) => Mode::ComputerView,
            Self::ShopCategory(_) => Mode::ShopCategoryView,
            Self::Shop(shop) => match shop.kind() {
                ShopKind::Hat => Mode::HatShop,
                ShopKind::Shelf => Mode::ShelfShop,
                ShopKind::FishTank => Mode::FishTankShop,
                ShopKind::MiniGame => Mode::MiniGameShop,
            },
            Self::Storage(_) => Mode::StorageView,
            Self::Shelf(_) => Mode::ShelfView,
            Self::Aquarium(_) => Mode::AquariumView,
            Self::MiniGame { .. } => Mode::MiniGame,
        }
    }

    fn sub_view(&self) -> Option<&dyn SubView> {
        match self {
            Self::StartMenu(view) => Some(view),
            Self::Room => None,
            Self::Computer(view) => Some(view),
            Self::ShopCategory(view) => Some(view),
            Self::Shop(view) => Some(view),
            Self::Storage(view) => Some(view),
            Self::Shelf(view) => Some(view),
            Self::Aquarium(view) => Some(view),
            Self::MiniGame { game, .. } => Some(game.as_sub_view()),
        }
    }

    fn sub_view_mut(&mut self) -> Option<&mut dyn SubView> {
        match self {
            Self::StartMenu(view) => Some(view),
            Self::Room => None,
            Self::Computer(view) => Some(view),
            Self::ShopCategory(view) => Some(view),
            Self::Shop(view) => Some(view),
            Self::Storage(view) => Some(view),
            Self::Shelf(view) => Some(view),
            Self::Aquarium(view) => Some(view),
            Self::MiniGame { game, .. } => Some(game.as_sub_view_mut()),
        }
    }
}

/// Top-level scene: owns the session, the persistent room and whichever view is active, and
/// moves control between them.
pub(crate) struct SessionController {
    session: SessionContext,
    room: Option<RoomScene>,
    active: ActiveView,
    rng: StdRng,
}

impl SessionController {
    pub(crate) fn new(session: SessionContext) -> Self {
        Self::with_rng(session, StdRng::from_entropy())
    }

    pub(crate) fn with_rng(session: SessionContext, rng: StdRng) -> Self {
        Self {
            session,
            room: None,
            active: ActiveView::StartMenu(StartMenuView::new()),
            rng,
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.active.mode()
    }

    fn enter(&mut self, mut next: ActiveView) {
        if let Some(view) = next.sub_view_mut() {
            view.init(&self.session);
        }
        let from = self.active.mode();
        let to = next.mode();
        self.active = next;
        info!(from = ?from, to = ?to, "mode_changed");
    }

    fn open_computer(&mut self) {
        let computer = ComputerView::new();
        self.enter(ActiveView::Computer(computer));
    }

    fn open_mini_game(&mut self, kind: MiniGameKind) {
        let rng = StdRng::seed_from_u64(self.rng.gen());
        let game = create_mini_game(kind, rng);
        info!(game = kind.id(), "mini_game_started");
        self.enter(ActiveView::mini_game(Some(kind), game));
    }

    fn start_room(&mut self) {
        self.room = Some(RoomScene::new());
        self.enter(ActiveView::Room);
    }

    /// Routes one discrete press to the handler for the current mode, then applies whatever
    /// transition that press caused.
    fn route_key(&mut self, action: InputAction) -> SceneCommand {
        match &mut self.active {
            ActiveView::StartMenu(menu) => {
                menu.handle_key(action, &mut self.session);
                return self.resolve_start_menu();
            }
            ActiveView::Room => {
                if action == InputAction::Confirm {
                    self.interact_with_nearby_object();
                }
                return SceneCommand::None;
            }
            active => {
                if let Some(view) = active.sub_view_mut() {
                    view.handle_key(action, &mut self.session);
                }
            }
        }
        self.resolve_view_signals();
        SceneCommand::None
    }

    fn resolve_start_menu(&mut self) -> SceneCommand {
        let ActiveView::StartMenu(menu) = &mut self.active else {
            return SceneCommand::None;
        };
        match menu.take_selection() {
            Some(StartMenuChoice::NewGame) => {
                self.session.start_new_game();
                self.start_room();
            }
            Some(StartMenuChoice::LoadGame) => match self.session.load_saved_game() {
                Ok(()) => self.start_room(),
                Err(error) => {
                    warn!(error = %error, "load_game_failed");
                    menu.show_load_failure(&error);
                }
            },
            Some(StartMenuChoice::Exit) => {
                info!("exit_selected");
                return SceneCommand::Quit;
            }
            None => {}
        }
        SceneCommand::None
    }

    fn interact_with_nearby_object(&mut self) {
        let Some(room) = self.room.as_ref() else {
            return;
        };
        if !room.is_near_object() {
            debug!("confirm_with_nothing_nearby");
            return;
        }
        let Some(kind) = room.nearby_object().map(|object| object.kind) else {
            return;
        };
        info!(object = kind.name(), "object_interaction");
        match kind {
            ObjectKind::Computer => self.open_computer(),
            ObjectKind::Aquarium => self.enter(ActiveView::Aquarium(AquariumView::new())),
            ObjectKind::StorageRack => self.enter(ActiveView::Storage(StorageRackView::new())),
            ObjectKind::Shelves => self.enter(ActiveView::Shelf(ShelfView::new())),
            ObjectKind::Doors => {
                self.room = None;
                self.enter(ActiveView::StartMenu(StartMenuView::new()));
            }
        }
    }

    /// Reads selection, close and payout signals from the active view and performs the
    /// matching transition.
    fn resolve_view_signals(&mut self) {
        let Self {
            session, active, ..
        } = self;
        match active {
            ActiveView::StartMenu(_) | ActiveView::Room => {}
            ActiveView::Computer(computer) => match computer.take_selection() {
                Some(ComputerChoice::Shop) => {
                    self.enter(ActiveView::ShopCategory(ShopCategoryView::new()));
                }
                Some(ComputerChoice::MiniGame(kind)) => self.open_mini_game(kind),
                None if computer.should_close() => self.enter(ActiveView::Room),
                None => {}
            },
            ActiveView::ShopCategory(menu) => {
                if let Some(kind) = menu.take_selection() {
                    self.enter(ActiveView::Shop(ShopView::new(kind)));
                } else if menu.should_close() {
                    self.open_computer();
                }
            }
            ActiveView::Shop(shop) => {
                if shop.should_close() {
                    self.enter(ActiveView::ShopCategory(ShopCategoryView::new()));
                }
            }
            ActiveView::Storage(view) if view.should_close() => self.enter(ActiveView::Room),
            ActiveView::Shelf(view) if view.should_close() => self.enter(ActiveView::Room),
            ActiveView::Aquarium(view) if view.should_close() => self.enter(ActiveView::Room),
            ActiveView::Storage(_) | ActiveView::Shelf(_) | ActiveView::Aquarium(_) => {}
            ActiveView::MiniGame {
                kind,
                game,
                paid_out,
            } => {
                if game.finished_game() {
                    if !*paid_out {
                        let earned = game.coins_earned();
                        session.profile.add_coins(earned);
                        *paid_out = true;
                        info!(
                            game = kind.map(MiniGameKind::id),
                            earned,
                            coins = session.profile.coins,
                            "mini_game_payout"
                        );
                        session.persist();
                    }
                } else {
                    *paid_out = false;
                }
                if game.should_close() {
                    self.open_computer();
                }
            }
        }
    }

    fn step_active_view(&mut self, dt_seconds: f32, input: &InputSnapshot) {
        if let ActiveView::Room = self.active {
            if let Some(room) = self.room.as_mut() {
                let (dx, dy) = input.held_direction();
                room.move_player(dx, dy);
                room.update();
            }
            return;
        }
        if let Some(view) = self.active.sub_view_mut() {
            view.update(dt_seconds, input, &mut self.session);
        }
        self.resolve_view_signals();
    }
}

impl Scene for SessionController {
    fn load(&mut self) {
        info!(coins = self.session.profile.coins, "session_started");
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        for &action in input.pressed_actions() {
            if self.route_key(action) == SceneCommand::Quit {
                return SceneCommand::Quit;
            }
        }
        self.step_active_view(fixed_dt_seconds, input);
        SceneCommand::None
    }

    fn render(&self, canvas: &mut Canvas<'_>) {
        match (&self.active, &self.room) {
            (ActiveView::Room, Some(room)) => room.render(canvas, &self.session.profile),
            (ActiveView::Room, None) => {}
            (active, _) => {
                if let Some(view) = active.sub_view() {
                    view.render(canvas, &self.session);
                }
            }
        }
        if self.mode() != Mode::StartMenu {
            draw_coin_display(canvas, self.session.profile.coins);
        }
    }

    fn unload(&mut self) {
        info!(
            saves_requested = self.session.saves_requested(),
            "session_closing"
        );
        self.session.shutdown(true);
    }

    fn debug_title(&self) -> Option<String> {
        Some(format!(
            "Catpurrter | {:?} | coins {}",
            self.mode(),
            self.session.profile.coins
        ))
    }
}

#[cfg(test)]
mod tests {
    use engine::{Rect, Vec2};

    use super::*;
    use crate::app::profile::{load_profile, save_profile, PlayerProfile};
    use crate::app::room::{PLAYER_HEIGHT, PLAYER_WIDTH};
    use crate::app::session::testing::test_session;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> (tempfile::TempDir, SessionController) {
        let (dir, session) = test_session();
        (dir, SessionController::with_rng(session, StdRng::seed_from_u64(5)))
    }

    fn press(controller: &mut SessionController, actions: &[InputAction]) -> SceneCommand {
        let input = actions
            .iter()
            .fold(InputSnapshot::empty(), |input, &action| input.with_pressed(action));
        controller.update(DT, &input)
    }

    fn new_game(controller: &mut SessionController) {
        press(controller, &[InputAction::Confirm]);
        assert_eq!(controller.mode(), Mode::RoomView);
    }

    fn stand_in(controller: &mut SessionController, kind: ObjectKind) {
        let room = controller.room.as_mut().expect("room exists");
        let rect: Rect = room
            .objects()
            .iter()
            .find(|object| object.kind == kind)
            .map(|object| object.rect)
            .expect("object in catalog");
        room.place_player(Vec2::new(
            rect.center().x - PLAYER_WIDTH / 2.0,
            rect.bottom() - 1.0 - PLAYER_HEIGHT,
        ));
        room.update();
        assert_eq!(room.nearby_object().map(|object| object.kind), Some(kind));
    }

    fn open(controller: &mut SessionController, kind: ObjectKind) {
        stand_in(controller, kind);
        press(controller, &[InputAction::Confirm]);
    }

    fn assert_single_view(controller: &SessionController) {
        let has_sub_view = controller.active.sub_view().is_some();
        assert_eq!(has_sub_view, controller.mode() != Mode::RoomView);
        if controller.mode() != Mode::StartMenu {
            assert!(controller.room.is_some(), "room lives while in session");
        }
    }

    /// Pays out on confirm, restarts on up, closes on cancel.
    #[derive(Default)]
    struct ScriptedGame {
        finished: bool,
        close_requested: bool,
    }

    impl SubView for ScriptedGame {
        fn handle_key(&mut self, action: InputAction, _session: &mut SessionContext) {
            match action {
                InputAction::Confirm => self.finished = true,
                InputAction::MoveUp => self.finished = false,
                InputAction::Cancel => self.close_requested = true,
                _ => {}
            }
        }

        fn render(&self, _canvas: &mut Canvas<'_>, _session: &SessionContext) {}

        fn should_close(&self) -> bool {
            self.close_requested
        }

        fn reset_close_flag(&mut self) {
            self.close_requested = false;
        }
    }

    impl MiniGame for ScriptedGame {
        fn coins_earned(&self) -> u32 {
            30
        }

        fn finished_game(&self) -> bool {
            self.finished
        }

        fn as_sub_view(&self) -> &dyn SubView {
            self
        }

        fn as_sub_view_mut(&mut self) -> &mut dyn SubView {
            self
        }
    }

    #[test]
    fn starts_on_the_start_menu_without_a_room() {
        let (_dir, controller) = controller();
        assert_eq!(controller.mode(), Mode::StartMenu);
        assert!(controller.room.is_none());
    }

    #[test]
    fn new_game_resets_profile_and_builds_the_room() {
        let (_dir, mut controller) = controller();
        controller.session.profile.coins = 5;

        new_game(&mut controller);

        assert_eq!(controller.session.profile, PlayerProfile::new_game());
        assert!(controller.room.is_some());
        assert_eq!(controller.session.saves_requested(), 1);
    }

    #[test]
    fn failed_load_stays_on_start_menu_with_a_message() {
        let (_dir, mut controller) = controller();

        press(&mut controller, &[InputAction::MoveDown, InputAction::Confirm]);

        assert_eq!(controller.mode(), Mode::StartMenu);
        let ActiveView::StartMenu(menu) = &controller.active else {
            panic!("expected start menu");
        };
        assert_eq!(menu.status(), Some("No save found"));
    }

    #[test]
    fn unreadable_save_is_reported_as_damaged() {
        let (dir, mut controller) = controller();
        std::fs::write(dir.path().join("save.json"), r#"{"coins": -5}"#).expect("write save");

        press(&mut controller, &[InputAction::MoveDown, InputAction::Confirm]);

        assert_eq!(controller.mode(), Mode::StartMenu);
        let ActiveView::StartMenu(menu) = &controller.active else {
            panic!("expected start menu");
        };
        assert_eq!(menu.status(), Some("Save file is damaged"));
        assert_eq!(controller.session.profile.coins, 100);
    }

    #[test]
    fn load_game_restores_the_saved_profile() {
        let (dir, mut controller) = controller();
        let mut saved = PlayerProfile::new_game();
        saved.coins = 420;
        saved.unlocked_hats.push("wizard".into());
        save_profile(&dir.path().join("save.json"), &saved).expect("save");

        press(&mut controller, &[InputAction::MoveDown, InputAction::Confirm]);

        assert_eq!(controller.mode(), Mode::RoomView);
        assert_eq!(controller.session.profile, saved);
    }

    #[test]
    fn exit_quits() {
        let (_dir, mut controller) = controller();

        let command = press(&mut controller, &[InputAction::MoveUp, InputAction::Confirm]);

        assert_eq!(command, SceneCommand::Quit);
    }

    #[test]
    fn presses_are_routed_before_held_movement_in_the_same_tick() {
        let (_dir, mut controller) = controller();
        let input = InputSnapshot::empty()
            .with_pressed(InputAction::Confirm)
            .with_action_down(InputAction::MoveRight, true);

        controller.update(DT, &input);

        assert_eq!(controller.mode(), Mode::RoomView);
        let room = controller.room.as_ref().expect("room");
        assert_eq!(room.player().position, Vec2::new(105.0, 300.0));
    }

    #[test]
    fn confirm_away_from_furniture_does_nothing() {
        let (_dir, mut controller) = controller();
        new_game(&mut controller);

        press(&mut controller, &[InputAction::Confirm]);

        assert_eq!(controller.mode(), Mode::RoomView);
    }

    #[test]
    fn computer_then_cancel_returns_to_the_room() {
        let (_dir, mut controller) = controller();
        new_game(&mut controller);

        open(&mut controller, ObjectKind::Computer);
        assert_eq!(controller.mode(), Mode::ComputerView);
        assert_single_view(&controller);

        press(&mut controller, &[InputAction::Cancel]);

        assert_eq!(controller.mode(), Mode::RoomView);
        assert!(controller.active.sub_view().is_none());
    }

    #[test]
    fn every_room_view_closes_back_to_the_room() {
        let cases = [
            (ObjectKind::Aquarium, Mode::AquariumView),
            (ObjectKind::StorageRack, Mode::StorageView),
            (ObjectKind::Shelves, Mode::ShelfView),
            (ObjectKind::Computer, Mode::ComputerView),
        ];
        for (kind, mode) in cases {
            let (_dir, mut controller) = controller();
            new_game(&mut controller);
            let position_before = {
                open(&mut controller, kind);
                controller.room.as_ref().expect("room").player().position
            };
            assert_eq!(controller.mode(), mode);
            assert_single_view(&controller);

            press(&mut controller, &[InputAction::Cancel]);

            assert_eq!(controller.mode(), Mode::RoomView, "{kind:?}");
            let room = controller.room.as_ref().expect("room kept");
            assert_eq!(room.player().position, position_before);
        }
    }

    #[test]
    fn shop_chain_unwinds_one_level_per_cancel() {
        let (_dir, mut controller) = controller();
        new_game(&mut controller);
        open(&mut controller, ObjectKind::Computer);

        press(&mut controller, &[InputAction::Confirm]);
        assert_eq!(controller.mode(), Mode::ShopCategoryView);
        press(&mut controller, &[InputAction::MoveDown, InputAction::Confirm]);
        assert_eq!(controller.mode(), Mode::FishTankShop);
        assert_single_view(&controller);

        let unwind = [Mode::ShopCategoryView, Mode::ComputerView, Mode::RoomView];
        for expected in unwind {
            press(&mut controller, &[InputAction::Cancel]);
            assert_eq!(controller.mode(), expected);
            assert_single_view(&controller);
        }
    }

    #[test]
    fn every_shop_category_opens_its_shop() {
        let expected = [
            Mode::HatShop,
            Mode::FishTankShop,
            Mode::ShelfShop,
            Mode::MiniGameShop,
        ];
        for (row, mode) in expected.into_iter().enumerate() {
            let (_dir, mut controller) = controller();
            new_game(&mut controller);
            open(&mut controller, ObjectKind::Computer);
            press(&mut controller, &[InputAction::Confirm]);

            let mut keys = vec![InputAction::MoveDown; row];
            keys.push(InputAction::Confirm);
            press(&mut controller, &keys);

            assert_eq!(controller.mode(), mode);
        }
    }

    #[test]
    fn bought_mini_game_appears_on_the_rebuilt_computer_and_launches() {
        let (_dir, mut controller) = controller();
        new_game(&mut controller);
        open(&mut controller, ObjectKind::Computer);
        press(&mut controller, &[InputAction::Confirm]);
        press(
            &mut controller,
            &[
                InputAction::MoveDown,
                InputAction::MoveDown,
                InputAction::MoveDown,
                InputAction::Confirm,
            ],
        );
        assert_eq!(controller.mode(), Mode::MiniGameShop);

        press(
            &mut controller,
            &[InputAction::Confirm, InputAction::Cancel, InputAction::Cancel],
        );
        assert_eq!(controller.mode(), Mode::ComputerView);
        assert_eq!(controller.session.profile.owned_mini_games, vec!["snake"]);

        press(&mut controller, &[InputAction::MoveDown, InputAction::Confirm]);

        assert_eq!(controller.mode(), Mode::MiniGame);
        assert_single_view(&controller);
    }

    #[test]
    fn mini_game_pays_once_per_finished_run() {
        let (dir, mut controller) = controller();
        new_game(&mut controller);
        controller.enter(ActiveView::mini_game(None, Box::new(ScriptedGame::default())));

        press(&mut controller, &[InputAction::Confirm]);
        assert_eq!(controller.session.profile.coins, 130);
        controller.update(DT, &InputSnapshot::empty());
        press(&mut controller, &[InputAction::Confirm]);
        assert_eq!(controller.session.profile.coins, 130, "no double payout");

        press(&mut controller, &[InputAction::MoveUp, InputAction::Confirm]);
        assert_eq!(controller.session.profile.coins, 160);

        press(&mut controller, &[InputAction::Cancel]);
        assert_eq!(controller.mode(), Mode::ComputerView);

        controller.unload();
        assert_eq!(
            load_profile(&dir.path().join("save.json")).expect("load").coins,
            160
        );
    }

    #[test]
    fn doors_return_to_start_menu_and_drop_the_room() {
        let (_dir, mut controller) = controller();
        new_game(&mut controller);

        open(&mut controller, ObjectKind::Doors);

        assert_eq!(controller.mode(), Mode::StartMenu);
        assert!(controller.room.is_none());
    }

    #[test]
    fn storage_rack_equip_shows_up_in_the_room() {
        let (_dir, mut controller) = controller();
        new_game(&mut controller);
        controller.session.profile.unlocked_hats.push("frog".into());

        open(&mut controller, ObjectKind::StorageRack);
        press(&mut controller, &[InputAction::Confirm, InputAction::Cancel]);

        assert_eq!(controller.mode(), Mode::RoomView);
        assert_eq!(controller.session.profile.equipped_hat.as_deref(), Some("frog"));
    }

    #[test]
    fn debug_title_names_mode_and_coins() {
        let (_dir, mut controller) = controller();
        new_game(&mut controller);

        assert_eq!(
            controller.debug_title().as_deref(),
            Some("Catpurrter | RoomView | coins 100")
        );
    }
}
