use engine::{Canvas, Rect};

use super::profile::Collection;

const UNKNOWN_ITEM_COLOR: [u8; 4] = [128, 128, 128, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ItemDef {
    pub(crate) id: &'static str,
    pub(crate) label: &'static str,
    pub(crate) price: u32,
    pub(crate) color: [u8; 4],
}

const fn item(id: &'static str, label: &'static str, price: u32, color: [u8; 4]) -> ItemDef {
    ItemDef {
        id,
        label,
        price,
        color,
    }
}

pub(crate) const HATS: &[ItemDef] = &[
    item("crown", "Crown", 50, [255, 215, 0, 255]),
    item("pirate", "Pirate Hat", 40, [45, 45, 45, 255]),
    item("frog", "Froggy Hat", 30, [60, 180, 75, 255]),
    item("wizard", "Wizard Hat", 35, [70, 70, 200, 255]),
];

pub(crate) const FISH_TANK_ITEMS: &[ItemDef] = &[
    item("goldfish", "Goldfish", 100, [255, 150, 30, 255]),
    item("aquaticplant", "Aquatic Plant", 150, [40, 160, 80, 255]),
    item("bubbletoy", "Bubble Toy", 200, [150, 210, 255, 255]),
];

pub(crate) const SHELF_DECORATIONS: &[ItemDef] = &[
    item("car", "Red Toy Car", 20, [220, 30, 30, 255]),
    item("books", "Very Interesting Books", 30, [150, 90, 40, 255]),
    item("plant", "Dull Plant in Pot", 50, [90, 140, 60, 255]),
    item("picture", "Picture of Cool Cat", 40, [230, 200, 150, 255]),
];

pub(crate) const MINI_GAMES: &[ItemDef] = &[
    item("snake", "Snake", 100, [80, 200, 80, 255]),
    item("catch", "Catch Game", 150, [240, 170, 60, 255]),
    item("dodge", "Dodge Game", 120, [200, 80, 200, 255]),
];

pub(crate) fn items_for(collection: Collection) -> &'static [ItemDef] {
    match collection {
        Collection::Hats => HATS,
        Collection::Aquarium => FISH_TANK_ITEMS,
        Collection::Decorations => SHELF_DECORATIONS,
        Collection::MiniGames => MINI_GAMES,
    }
}

pub(crate) fn find_item(collection: Collection, id: &str) -> Option<&'static ItemDef> {
    items_for(collection).iter().find(|item| item.id == id)
}

/// Display label for an owned id; ids unknown to the catalog are shown verbatim.
pub(crate) fn item_label(collection: Collection, id: &str) -> &str {
    find_item(collection, id).map_or(id, |item| item.label)
}

fn sprite_dir(collection: Collection) -> &'static str {
    match collection {
        Collection::Hats => "hats",
        Collection::Aquarium => "fish",
        Collection::Decorations => "decorations",
        Collection::MiniGames => "minigames",
    }
}

pub(crate) fn draw_item(canvas: &mut Canvas<'_>, collection: Collection, id: &str, rect: Rect) {
    let color = find_item(collection, id).map_or(UNKNOWN_ITEM_COLOR, |item| item.color);
    let key = format!("{}/{}", sprite_dir(collection), id);
    canvas.draw_sprite(&key, rect, color);
}
