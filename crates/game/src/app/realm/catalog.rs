//! Fixed texture catalog and the handle table resolved from it at load.

use isorealm_engine::{TextureDirectory, TextureHandle};
use tracing::{info, warn};

use super::animation::CharacterPose;
use super::collision::TileRect;
use super::input::Direction;

pub(crate) const HIT_BOX_SMALL: TileRect = TileRect::new(4.0 - 0.125, -3.0 - 0.125, 0.25, 0.25);
pub(crate) const HIT_BOX_MEDIUM: TileRect = TileRect::new(4.0 - 0.25, -3.0 - 0.25, 0.5, 0.5);
pub(crate) const HIT_BOX_CHEST_EW: TileRect = TileRect::new(4.0 - 0.125, -3.0 - 0.15, 0.25, 0.3);
pub(crate) const HIT_BOX_CHEST_NS: TileRect = TileRect::new(4.0 - 0.15, -3.0 - 0.1, 0.3, 0.25);
pub(crate) const HIT_BOX_SPIRAL_N: TileRect = TileRect::new(4.0 - 0.375, -3.0 - 0.125, 0.5, 0.5);
pub(crate) const HIT_BOX_SPIRAL_E: TileRect = TileRect::new(4.0 - 0.125, -3.0 - 0.125, 0.5, 0.5);
pub(crate) const HIT_BOX_SPIRAL_S: TileRect = TileRect::new(4.0 - 0.375, -3.0 - 0.375, 0.5, 0.5);
pub(crate) const HIT_BOX_SPIRAL_W: TileRect = TileRect::new(4.0 - 0.5, -3.0, 0.625, 0.5);

pub(crate) const FLOOR_TILES: [&str; 8] = [
    "stone_N.png",
    "stone_E.png",
    "stone_S.png",
    "stone_W.png",
    "stoneUneven_N.png",
    "stoneUneven_E.png",
    "stoneUneven_S.png",
    "stoneUneven_W.png",
];

pub(crate) const COVERING_TILES: [&str; 4] = [
    "planksBroken_N.png",
    "planksBroken_E.png",
    "planksBroken_S.png",
    "planksBroken_W.png",
];

pub(crate) const WALL_TILES: [&str; 16] = [
    "stoneWall_E.png",
    "stoneWallColumnIn_E.png",
    "stoneWall_S.png",
    "stoneWallColumnIn_S.png",
    "stoneWall_W.png",
    "stoneWallColumnIn_W.png",
    "stoneWall_N.png",
    "stoneWallColumnIn_N.png",
    "stoneWallCorner_E.png",
    "stoneWallCorner_S.png",
    "stoneWallCorner_W.png",
    "stoneWallCorner_N.png",
    "stoneWallGateClosed_E.png",
    "stoneWallGateClosed_S.png",
    "stoneWallGateClosed_W.png",
    "stoneWallGateClosed_N.png",
];

pub(crate) const WALL_CORNER_E: usize = 8;
pub(crate) const WALL_CORNER_S: usize = 9;
pub(crate) const WALL_CORNER_W: usize = 10;
pub(crate) const WALL_CORNER_N: usize = 11;
pub(crate) const WALL_GATE_E: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SceneryTemplate {
    pub(crate) texture: &'static str,
    /// Relative to the cell the object is placed on.
    pub(crate) hit_box: TileRect,
}

const fn scenery(texture: &'static str, hit_box: TileRect) -> SceneryTemplate {
    SceneryTemplate { texture, hit_box }
}

pub(crate) const SCENERY: [SceneryTemplate; 36] = [
    scenery("barrel_N.png", HIT_BOX_SMALL),
    scenery("barrel_E.png", HIT_BOX_SMALL),
    scenery("barrel_S.png", HIT_BOX_SMALL),
    scenery("barrel_W.png", HIT_BOX_SMALL),
    scenery("barrels_N.png", HIT_BOX_MEDIUM),
    scenery("barrels_E.png", HIT_BOX_MEDIUM),
    scenery("barrels_S.png", HIT_BOX_MEDIUM),
    scenery("barrels_W.png", HIT_BOX_MEDIUM),
    scenery("woodenCrate_N.png", HIT_BOX_SMALL),
    scenery("woodenCrate_E.png", HIT_BOX_SMALL),
    scenery("woodenCrate_S.png", HIT_BOX_SMALL),
    scenery("woodenCrate_W.png", HIT_BOX_SMALL),
    scenery("woodenCrates_N.png", HIT_BOX_MEDIUM),
    scenery("woodenCrates_E.png", HIT_BOX_MEDIUM),
    scenery("woodenCrates_S.png", HIT_BOX_MEDIUM),
    scenery("woodenCrates_W.png", HIT_BOX_MEDIUM),
    scenery("chestClosed_E.png", HIT_BOX_CHEST_EW),
    scenery("chestClosed_S.png", HIT_BOX_CHEST_NS),
    scenery("chestClosed_W.png", HIT_BOX_CHEST_EW),
    scenery("chestClosed_N.png", HIT_BOX_CHEST_NS),
    scenery("chestOpen_E.png", HIT_BOX_CHEST_EW),
    scenery("chestOpen_S.png", HIT_BOX_CHEST_NS),
    scenery("chestOpen_W.png", HIT_BOX_CHEST_EW),
    scenery("chestOpen_N.png", HIT_BOX_CHEST_NS),
    scenery("stoneColumn_E.png", HIT_BOX_SMALL),
    scenery("stoneColumn_S.png", HIT_BOX_SMALL),
    scenery("stoneColumn_W.png", HIT_BOX_SMALL),
    scenery("stoneColumn_N.png", HIT_BOX_SMALL),
    scenery("stoneColumnWood_E.png", HIT_BOX_SMALL),
    scenery("stoneColumnWood_S.png", HIT_BOX_SMALL),
    scenery("stoneColumnWood_W.png", HIT_BOX_SMALL),
    scenery("stoneColumnWood_N.png", HIT_BOX_SMALL),
    scenery("stairsSpiral_E.png", HIT_BOX_SPIRAL_E),
    scenery("stairsSpiral_S.png", HIT_BOX_SPIRAL_S),
    scenery("stairsSpiral_W.png", HIT_BOX_SPIRAL_W),
    scenery("stairsSpiral_N.png", HIT_BOX_SPIRAL_N),
];

pub(crate) fn character_texture_name(direction: Direction, pose: CharacterPose) -> String {
    format!("Male_{}_{}.png", direction.index(), pose.texture_suffix())
}

/// Every catalog entry resolved to a handle once, at load. Entries whose
/// file was not found hold [`TextureHandle::NOT_LOADED`] and draw nothing.
#[derive(Debug, Clone)]
pub(crate) struct TextureTable {
    floor: [TextureHandle; FLOOR_TILES.len()],
    covering: [TextureHandle; COVERING_TILES.len()],
    walls: [TextureHandle; WALL_TILES.len()],
    scenery: [TextureHandle; SCENERY.len()],
    character: Vec<TextureHandle>,
    missing: usize,
}

impl Default for TextureTable {
    fn default() -> Self {
        Self {
            floor: [TextureHandle::NOT_LOADED; FLOOR_TILES.len()],
            covering: [TextureHandle::NOT_LOADED; COVERING_TILES.len()],
            walls: [TextureHandle::NOT_LOADED; WALL_TILES.len()],
            scenery: [TextureHandle::NOT_LOADED; SCENERY.len()],
            character: vec![TextureHandle::NOT_LOADED; Direction::ALL.len() * CharacterPose::SLOTS],
            missing: 0,
        }
    }
}

impl TextureTable {
    pub(crate) fn resolve(scene: &TextureDirectory, characters: &TextureDirectory) -> Self {
        let mut table = TextureTable::default();
        let mut missing = 0usize;
        let mut lookup = |directory: &TextureDirectory, name: &str| match directory.get(name) {
            Some(handle) => handle,
            None => {
                warn!(
                    directory = %directory.path().display(),
                    texture = name,
                    "texture_missing"
                );
                missing += 1;
                TextureHandle::NOT_LOADED
            }
        };

        for (slot, name) in table.floor.iter_mut().zip(FLOOR_TILES) {
            *slot = lookup(scene, name);
        }
        for (slot, name) in table.covering.iter_mut().zip(COVERING_TILES) {
            *slot = lookup(scene, name);
        }
        for (slot, name) in table.walls.iter_mut().zip(WALL_TILES) {
            *slot = lookup(scene, name);
        }
        for (slot, template) in table.scenery.iter_mut().zip(SCENERY.iter()) {
            *slot = lookup(scene, template.texture);
        }
        for direction in Direction::ALL {
            for pose in CharacterPose::all() {
                let name = character_texture_name(direction, pose);
                table.character[character_slot(direction, pose)] = lookup(characters, &name);
            }
        }

        table.missing = missing;
        info!(
            resolved = table.entry_count() - missing,
            missing, "texture_table_resolved"
        );
        table
    }

    pub(crate) fn entry_count(&self) -> usize {
        self.floor.len()
            + self.covering.len()
            + self.walls.len()
            + self.scenery.len()
            + self.character.len()
    }

    pub(crate) fn missing(&self) -> usize {
        self.missing
    }

    pub(crate) fn floor(&self, index: usize) -> TextureHandle {
        lookup_or_not_loaded(&self.floor, index)
    }

    pub(crate) fn covering(&self, index: usize) -> TextureHandle {
        lookup_or_not_loaded(&self.covering, index)
    }

    pub(crate) fn wall(&self, index: usize) -> TextureHandle {
        lookup_or_not_loaded(&self.walls, index)
    }

    pub(crate) fn scenery(&self, index: usize) -> TextureHandle {
        lookup_or_not_loaded(&self.scenery, index)
    }

    pub(crate) fn character(&self, direction: Direction, pose: CharacterPose) -> TextureHandle {
        lookup_or_not_loaded(&self.character, character_slot(direction, pose))
    }
}

fn character_slot(direction: Direction, pose: CharacterPose) -> usize {
    direction.index() * CharacterPose::SLOTS + pose.slot()
}

fn lookup_or_not_loaded(handles: &[TextureHandle], index: usize) -> TextureHandle {
    handles
        .get(index)
        .copied()
        .unwrap_or(TextureHandle::NOT_LOADED)
}
