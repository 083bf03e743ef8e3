use super::catalog::InteractableObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawItem {
    Object(usize),
    Player,
}

/// The player is in front of an occluder once its feet reach the occluder's cutoff line.
pub(crate) fn player_in_front(feet_y: f32, cutoff_y: f32) -> bool {
    feet_y >= cutoff_y
}

/// Painter's order for one frame: static furniture first, then occluders the player stands in
/// front of, then the player, then occluders that cover the player. Each occluder is classified
/// against the player on its own, so with two occluders this yields the four possible orderings.
pub(crate) fn occlusion_order(feet_y: f32, objects: &[InteractableObject]) -> Vec<DrawItem> {
    let mut order = Vec::with_capacity(objects.len() + 1);
    order.extend(
        objects
            .iter()
            .enumerate()
            .filter(|(_, object)| !object.occludes)
            .map(|(index, _)| DrawItem::Object(index)),
    );

    let (behind_player, over_player): (Vec<usize>, Vec<usize>) = objects
        .iter()
        .enumerate()
        .filter(|(_, object)| object.occludes)
        .map(|(index, _)| index)
        .partition(|index| player_in_front(feet_y, objects[*index].depth_cutoff_y()));

    order.extend(behind_player.into_iter().map(DrawItem::Object));
    order.push(DrawItem::Player);
    order.extend(over_player.into_iter().map(DrawItem::Object));
    order
}
