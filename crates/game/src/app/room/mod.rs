mod catalog;
mod draw_order;

use engine::{Canvas, Rect, Vec2};

pub(crate) use catalog::{InteractableObject, ObjectKind};
pub(crate) use draw_order::DrawItem;

use super::items::draw_item;
use super::profile::{Collection, PlayerProfile};
use super::ui::{BODY_SCALE, HIGHLIGHT_COLOR, SCREEN_HEIGHT, SCREEN_WIDTH, SMALL_SCALE, TEXT_COLOR};
use catalog::room_catalog;
use draw_order::occlusion_order;

/// Right edge of the walkable floor; narrower than the screen.
pub(crate) const ROOM_WIDTH: f32 = 760.0;
pub(crate) const PLAYER_WIDTH: f32 = 40.0;
pub(crate) const PLAYER_HEIGHT: f32 = 60.0;
pub(crate) const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, 300.0);
pub(crate) const PLAYER_SPEED_PER_TICK: f32 = 5.0;
pub(crate) const FEET_MIN_Y: f32 = 350.0;
pub(crate) const FEET_MAX_Y: f32 = 585.0;
const FEET_PROBE_HEIGHT: f32 = 4.0;
const INTERACTION_DISTANCE: f32 = 25.0;

const WALL_COLOR: [u8; 4] = [214, 196, 170, 255];
const FLOOR_COLOR: [u8; 4] = [150, 112, 82, 255];
const PLAYER_COLOR: [u8; 4] = [245, 160, 60, 255];
const LABEL_OFFSET_Y: f32 = 22.0;
const HAT_SIZE: Vec2 = Vec2::new(30.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlayerAvatar {
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
    pub(crate) speed: f32,
}

impl PlayerAvatar {
    fn at_spawn() -> Self {
        Self {
            position: PLAYER_SPAWN,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED_PER_TICK,
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    fn feet_probe_at(&self, position: Vec2) -> Rect {
        Rect::new(
            position.x,
            position.y + self.size.y - FEET_PROBE_HEIGHT,
            self.size.x,
            FEET_PROBE_HEIGHT,
        )
    }

    fn feet_point(&self) -> Vec2 {
        Vec2::new(
            self.position.x + self.size.x * 0.5,
            self.position.y + self.size.y,
        )
    }
}

/// The walkable room: furniture catalog, the player's avatar, and which object (if any) is in
/// reach.
pub(crate) struct RoomScene {
    objects: Vec<InteractableObject>,
    player: PlayerAvatar,
    highlighted: Option<usize>,
}

impl Default for RoomScene {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomScene {
    pub(crate) fn new() -> Self {
        let mut room = Self {
            objects: room_catalog(),
            player: PlayerAvatar::at_spawn(),
            highlighted: None,
        };
        room.update();
        room
    }

    #[cfg(test)]
    pub(crate) fn objects(&self) -> &[InteractableObject] {
        &self.objects
    }

    #[cfg(test)]
    pub(crate) fn player(&self) -> &PlayerAvatar {
        &self.player
    }

    #[cfg(test)]
    pub(crate) fn feet_point(&self) -> Vec2 {
        self.player.feet_point()
    }

    /// Moves one step per axis. Each axis is clamped and collision-checked on its own so the
    /// player slides along an obstacle instead of sticking to it.
    pub(crate) fn move_player(&mut self, dx: i32, dy: i32) {
        let step = self.player.speed;
        let min_y = FEET_MIN_Y - self.player.size.y;
        let max_y = FEET_MAX_Y - self.player.size.y;
        let max_x = ROOM_WIDTH - self.player.size.x;

        if dx != 0 {
            let candidate_x = (self.player.position.x + dx.signum() as f32 * step).clamp(0.0, max_x);
            let candidate = Vec2::new(candidate_x, self.player.position.y);
            if !self.feet_blocked_at(candidate) {
                self.player.position = candidate;
            }
        }

        if dy != 0 {
            let candidate_y =
                (self.player.position.y + dy.signum() as f32 * step).clamp(min_y, max_y);
            let candidate = Vec2::new(self.player.position.x, candidate_y);
            if !self.feet_blocked_at(candidate) {
                self.player.position = candidate;
            }
        }
    }

    fn feet_blocked_at(&self, position: Vec2) -> bool {
        let probe = self.player.feet_probe_at(position);
        self.objects
            .iter()
            .filter_map(|object| object.blocking)
            .any(|blocking| probe.intersects(&blocking))
    }

    /// Recomputes the highlight: the first object in catalog order whose footprint is within
    /// reach of the player's feet.
    pub(crate) fn update(&mut self) {
        let feet = self.player.feet_point();
        self.highlighted = self
            .objects
            .iter()
            .position(|object| object.rect.distance_to_point(feet) < INTERACTION_DISTANCE);
    }

    pub(crate) fn is_near_object(&self) -> bool {
        self.highlighted.is_some()
    }

    pub(crate) fn nearby_object(&self) -> Option<&InteractableObject> {
        self.highlighted.and_then(|index| self.objects.get(index))
    }

    pub(crate) fn draw_order(&self) -> Vec<DrawItem> {
        occlusion_order(self.player.feet_point().y, &self.objects)
    }

    pub(crate) fn render(&self, canvas: &mut Canvas<'_>, profile: &PlayerProfile) {
        draw_background(canvas);
        for item in self.draw_order() {
            match item {
                DrawItem::Object(index) => {
                    if let Some(object) = self.objects.get(index) {
                        draw_object(canvas, object, profile);
                    }
                }
                DrawItem::Player => self.draw_player(canvas, profile),
            }
        }

        if let Some(object) = self.nearby_object() {
            canvas.outline_rect(object.rect, 3, HIGHLIGHT_COLOR);
            canvas.draw_text_centered(
                object.rect.center().x as i32,
                (object.rect.y - LABEL_OFFSET_Y) as i32,
                object.name(),
                SMALL_SCALE,
                HIGHLIGHT_COLOR,
            );
            canvas.draw_text_centered(
                (SCREEN_WIDTH / 2.0) as i32,
                SCREEN_HEIGHT as i32 - 30,
                &format!("Enter: use {}", object.name()),
                SMALL_SCALE,
                TEXT_COLOR,
            );
        }
    }

    fn draw_player(&self, canvas: &mut Canvas<'_>, profile: &PlayerProfile) {
        let bounds = self.player.bounds();
        canvas.draw_sprite("player", bounds, PLAYER_COLOR);
        if let Some(hat) = profile.equipped_hat.as_deref() {
            let hat_rect = Rect::new(
                bounds.center().x - HAT_SIZE.x * 0.5,
                bounds.y - HAT_SIZE.y + 6.0,
                HAT_SIZE.x,
                HAT_SIZE.y,
            );
            draw_item(canvas, Collection::Hats, hat, hat_rect);
        }
    }

    #[cfg(test)]
    pub(crate) fn place_player(&mut self, position: Vec2) {
        self.player.position = position;
    }
}

fn draw_background(canvas: &mut Canvas<'_>) {
    let screen = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    if !canvas.draw_sprite("room/background", screen, FLOOR_COLOR) {
        canvas.fill_rect(Rect::new(0.0, 0.0, SCREEN_WIDTH, FEET_MIN_Y), WALL_COLOR);
    }
}

fn draw_object(canvas: &mut Canvas<'_>, object: &InteractableObject, profile: &PlayerProfile) {
    canvas.draw_sprite(
        object.kind.sprite_key(),
        object.rect,
        object.kind.placeholder_color(),
    );
    match object.kind {
        ObjectKind::Aquarium => draw_contents_row(
            canvas,
            object.rect,
            Collection::Aquarium,
            &profile.aquarium_contents,
            Vec2::new(26.0, 18.0),
        ),
        ObjectKind::StorageRack => draw_contents_row(
            canvas,
            object.rect,
            Collection::Hats,
            &profile.unlocked_hats,
            Vec2::new(22.0, 14.0),
        ),
        ObjectKind::Shelves => draw_contents_row(
            canvas,
            object.rect,
            Collection::Decorations,
            &profile.owned_decorations,
            Vec2::new(24.0, 24.0),
        ),
        ObjectKind::Computer | ObjectKind::Doors => {}
    }
    if object.kind == ObjectKind::Doors {
        canvas.draw_text_centered(
            object.rect.center().x as i32,
            object.rect.center().y as i32,
            "EXIT",
            BODY_SCALE - 1,
            TEXT_COLOR,
        );
    }
}

/// Lays owned items out in rows of three across the upper part of a piece of furniture.
fn draw_contents_row(
    canvas: &mut Canvas<'_>,
    host: Rect,
    collection: Collection,
    ids: &[String],
    item_size: Vec2,
) {
    const PER_ROW: usize = 3;
    let gap_x = (host.width - item_size.x * PER_ROW as f32) / (PER_ROW as f32 + 1.0);
    for (index, id) in ids.iter().enumerate() {
        let column = (index % PER_ROW) as f32;
        let row = (index / PER_ROW) as f32;
        let rect = Rect::new(
            host.x + gap_x + column * (item_size.x + gap_x),
            host.y + 10.0 + row * (item_size.y + 8.0),
            item_size.x,
            item_size.y,
        );
        if rect.bottom() > host.bottom() {
            break;
        }
        draw_item(canvas, collection, id, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ui::testing::{frame_contains_color, render_to_frame};

    fn kind_near(room: &RoomScene) -> Option<ObjectKind> {
        room.nearby_object().map(|object| object.kind)
    }

    fn object_rect(room: &RoomScene, kind: ObjectKind) -> Rect {
        room.objects()
            .iter()
            .find(|object| object.kind == kind)
            .map(|object| object.rect)
            .expect("object in catalog")
    }

    #[test]
    fn five_steps_right_from_spawn_reach_x_125() {
        let mut room = RoomScene::new();
        assert_eq!(room.player().position, Vec2::new(100.0, 300.0));

        for _ in 0..5 {
            room.move_player(1, 0);
        }

        assert_eq!(room.player().position, Vec2::new(125.0, 300.0));
    }

    #[test]
    fn walking_right_clamps_at_room_edge_and_stays_there() {
        let mut room = RoomScene::new();
        for _ in 0..5 {
            room.move_player(1, 0);
        }

        for _ in 0..200 {
            room.move_player(1, 0);
            assert!(room.player().position.x <= 720.0);
        }
        assert_eq!(room.player().position.x, 720.0);

        room.move_player(1, 0);
        assert_eq!(room.player().position, Vec2::new(720.0, 300.0));
    }

    #[test]
    fn vertical_movement_keeps_feet_inside_floor_band() {
        let mut room = RoomScene::new();
        for _ in 0..100 {
            room.move_player(0, -1);
        }
        assert_eq!(room.feet_point().y, FEET_MIN_Y);

        room.place_player(Vec2::new(300.0, 400.0));
        for _ in 0..100 {
            room.move_player(0, 1);
        }
        assert_eq!(room.feet_point().y, FEET_MAX_Y);
    }

    #[test]
    fn diagonal_into_room_edge_still_moves_vertically() {
        let mut room = RoomScene::new();
        room.place_player(Vec2::new(720.0, 300.0));

        room.move_player(1, 1);

        assert_eq!(room.player().position, Vec2::new(720.0, 305.0));
    }

    #[test]
    fn diagonal_into_computer_slides_along_its_front() {
        let mut room = RoomScene::new();
        // feet at y 352, touching the computer's blocking rect from the left
        room.place_player(Vec2::new(340.0, 292.0));

        room.move_player(1, 1);

        assert_eq!(room.player().position, Vec2::new(340.0, 297.0));
    }

    #[test]
    fn storage_rack_base_blocks_from_below_but_footprint_is_walkable_from_above() {
        let mut room = RoomScene::new();
        let rack = object_rect(&room, ObjectKind::StorageRack);

        room.place_player(Vec2::new(rack.x + 20.0, 600.0 - 15.0 - PLAYER_HEIGHT));
        for _ in 0..30 {
            room.move_player(0, -1);
        }
        let stopped_feet = room.feet_point().y;
        assert!(stopped_feet >= rack.bottom(), "feet={stopped_feet}");

        room.place_player(Vec2::new(rack.x + 20.0, FEET_MIN_Y - PLAYER_HEIGHT));
        for _ in 0..30 {
            room.move_player(0, 1);
        }
        let feet = room.feet_point().y;
        assert!(feet > rack.y && feet <= 500.0, "feet={feet}");
    }

    #[test]
    fn shelves_never_block() {
        let mut room = RoomScene::new();
        room.place_player(Vec2::new(540.0, 290.0));

        for _ in 0..10 {
            room.move_player(1, 0);
        }

        assert_eq!(room.player().position.x, 590.0);
    }

    #[test]
    fn nothing_is_highlighted_at_spawn() {
        let room = RoomScene::new();
        assert!(!room.is_near_object());
        assert_eq!(kind_near(&room), None);
    }

    #[test]
    fn feet_inside_footprint_highlights_that_object() {
        let mut room = RoomScene::new();
        for kind in [ObjectKind::StorageRack, ObjectKind::Aquarium] {
            let rect = object_rect(&room, kind);
            room.place_player(Vec2::new(
                rect.center().x - PLAYER_WIDTH / 2.0,
                rect.y + 20.0 - PLAYER_HEIGHT,
            ));
            assert!(rect.contains_point(room.feet_point()));

            room.update();

            assert_eq!(kind_near(&room), Some(kind));
        }
    }

    #[test]
    fn standing_at_the_back_wall_reaches_wall_furniture() {
        let mut room = RoomScene::new();
        let cases = [
            (430.0, ObjectKind::Computer),
            (650.0, ObjectKind::Shelves),
            (55.0, ObjectKind::Doors),
        ];
        for (feet_x, kind) in cases {
            room.place_player(Vec2::new(feet_x - PLAYER_WIDTH / 2.0, 295.0));
            room.update();
            assert_eq!(kind_near(&room), Some(kind), "feet_x={feet_x}");
        }
    }

    #[test]
    fn walking_away_clears_the_highlight() {
        let mut room = RoomScene::new();
        room.place_player(Vec2::new(410.0, 295.0));
        room.update();
        assert!(room.is_near_object());

        room.place_player(Vec2::new(300.0, 380.0));
        room.update();

        assert!(!room.is_near_object());
    }

    fn rendered_pixel(room: &RoomScene, x: i32, y: i32) -> Option<[u8; 4]> {
        let profile = PlayerProfile::new_game();
        let mut pixel = None;
        render_to_frame(|canvas| {
            room.render(canvas, &profile);
            pixel = canvas.pixel(x, y);
        });
        pixel
    }

    #[test]
    fn aquarium_covers_a_player_standing_behind_it() {
        let mut room = RoomScene::new();
        // feet at y 490: inside the tank's footprint, above its cutoff at 530
        room.place_player(Vec2::new(600.0, 430.0));
        let order = room.draw_order();
        let position_of = |item: DrawItem| order.iter().position(|drawn| *drawn == item);
        assert!(position_of(DrawItem::Player) < position_of(DrawItem::Object(1)));

        assert_eq!(
            rendered_pixel(&room, 620, 470),
            Some(ObjectKind::Aquarium.placeholder_color())
        );
    }

    #[test]
    fn player_in_front_of_the_aquarium_covers_it() {
        let mut room = RoomScene::new();
        // feet at y 560, below the tank's cutoff
        room.place_player(Vec2::new(600.0, 500.0));

        assert_eq!(rendered_pixel(&room, 620, 515), Some(PLAYER_COLOR));
    }

    #[test]
    fn render_draws_equipped_hat_and_furniture_placeholders() {
        let mut profile = PlayerProfile::new_game();
        profile.unlocked_hats.push("crown".to_string());
        profile.equipped_hat = Some("crown".to_string());
        let room = RoomScene::new();

        let frame = render_to_frame(|canvas| room.render(canvas, &profile));

        assert!(frame_contains_color(&frame, [255, 215, 0, 255]));
        assert!(frame_contains_color(
            &frame,
            ObjectKind::Aquarium.placeholder_color()
        ));
        assert!(frame_contains_color(&frame, PLAYER_COLOR));
    }
}
