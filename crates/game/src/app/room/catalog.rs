use engine::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ObjectKind {
    Computer,
    Aquarium,
    StorageRack,
    Shelves,
    Doors,
}

impl ObjectKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            ObjectKind::Computer => "Computer",
            ObjectKind::Aquarium => "Aquarium",
            ObjectKind::StorageRack => "Storage Rack",
            ObjectKind::Shelves => "Shelves",
            ObjectKind::Doors => "Doors",
        }
    }

    pub(crate) fn sprite_key(self) -> &'static str {
        match self {
            ObjectKind::Computer => "furniture/computer",
            ObjectKind::Aquarium => "furniture/aquarium",
            ObjectKind::StorageRack => "furniture/storage_rack",
            ObjectKind::Shelves => "furniture/shelves",
            ObjectKind::Doors => "furniture/doors",
        }
    }

    pub(crate) fn placeholder_color(self) -> [u8; 4] {
        match self {
            ObjectKind::Computer => [90, 100, 120, 255],
            ObjectKind::Aquarium => [60, 140, 200, 255],
            ObjectKind::StorageRack => [150, 110, 70, 255],
            ObjectKind::Shelves => [170, 130, 90, 255],
            ObjectKind::Doors => [110, 70, 40, 255],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InteractableObject {
    pub(crate) kind: ObjectKind,
    /// Full footprint, used for proximity and for the depth cutoff.
    pub(crate) rect: Rect,
    /// Floor-level area that stops the player's feet; `None` for decorative objects.
    pub(crate) blocking: Option<Rect>,
    /// Whether the player can walk both behind and in front of this object.
    pub(crate) occludes: bool,
}

impl InteractableObject {
    pub(crate) fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub(crate) fn depth_cutoff_y(&self) -> f32 {
        self.rect.bottom()
    }
}

/// Catalog order doubles as the highlight tie-break order.
pub(crate) fn room_catalog() -> Vec<InteractableObject> {
    let computer = Rect::new(380.0, 260.0, 100.0, 90.0);
    vec![
        InteractableObject {
            kind: ObjectKind::Computer,
            rect: computer,
            blocking: Some(computer),
            occludes: false,
        },
        InteractableObject {
            kind: ObjectKind::Aquarium,
            rect: Rect::new(560.0, 420.0, 160.0, 110.0),
            blocking: Some(Rect::new(560.0, 495.0, 160.0, 35.0)),
            occludes: true,
        },
        InteractableObject {
            kind: ObjectKind::StorageRack,
            rect: Rect::new(110.0, 400.0, 110.0, 130.0),
            blocking: Some(Rect::new(110.0, 500.0, 110.0, 30.0)),
            occludes: true,
        },
        InteractableObject {
            kind: ObjectKind::Shelves,
            rect: Rect::new(600.0, 200.0, 120.0, 150.0),
            blocking: None,
            occludes: false,
        },
        InteractableObject {
            kind: ObjectKind::Doors,
            rect: Rect::new(20.0, 250.0, 70.0, 100.0),
            blocking: None,
            occludes: false,
        },
    ]
}
