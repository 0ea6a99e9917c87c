//! Per-frame world population.
//!
//! The layout is re-rolled from a fixed seed every frame. Because the draw
//! order and the sequence of generator calls never change, every frame lands
//! on the same layout; the generator calls below must stay in this order.

use isorealm_engine::Vec2;

use super::catalog::{
    COVERING_TILES, FLOOR_TILES, SCENERY, WALL_CORNER_E, WALL_CORNER_N, WALL_CORNER_S,
    WALL_CORNER_W, WALL_GATE_E,
};
use super::collision::TileRect;
use super::rng::MersenneTwister;

/// One in `COVERING_ODDS + 1` cells gets a ground covering.
const COVERING_ODDS: u32 = 15;
/// One in `OBSTACLE_ODDS + 1` cells gets a scenery object.
const OBSTACLE_ODDS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorldSize {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl WorldSize {
    pub(crate) fn cell_count(self) -> u32 {
        self.width * self.height
    }

    /// Cell visited at scan step `i`.
    fn scan_cell(self, i: u32) -> (u32, u32) {
        (i / self.width, self.height - 1 - (i % self.height))
    }

    pub(crate) fn center(self) -> Vec2 {
        Vec2::new(
            (self.width as f32 - 1.0) * 0.5,
            (self.height as f32 - 1.0) * 0.5,
        )
    }

    /// Clamps a tile position into `[0, W-1] x [0, H-1]`.
    pub(crate) fn clamp(self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x.clamp(0.0, self.width as f32 - 1.0),
            position.y.clamp(0.0, self.height as f32 - 1.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TilePlacement {
    pub(crate) tile: usize,
    pub(crate) u: u32,
    pub(crate) v: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ObjectPlacement {
    pub(crate) template: usize,
    pub(crate) position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WallPlacement {
    pub(crate) tile: usize,
    pub(crate) u: f32,
    pub(crate) v: f32,
}

/// Everything generated for one frame. Rebuilt from scratch each frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FramePopulation {
    pub(crate) floor: Vec<TilePlacement>,
    pub(crate) coverings: Vec<TilePlacement>,
    pub(crate) objects: Vec<ObjectPlacement>,
    pub(crate) collision_boxes: Vec<TileRect>,
}

pub(crate) fn populate_frame(size: WorldSize, seed: u64) -> FramePopulation {
    let mut rng = MersenneTwister::new(seed);
    let cells = size.cell_count();
    let mut population = FramePopulation {
        floor: Vec::with_capacity(cells as usize),
        ..FramePopulation::default()
    };

    for i in 0..cells {
        let (u, v) = size.scan_cell(i);
        let tile = rng.below(FLOOR_TILES.len() as u32) as usize;
        population.floor.push(TilePlacement { tile, u, v });
    }

    for i in 0..cells {
        if rng.randint(0, COVERING_ODDS) != 0 {
            continue;
        }
        let (u, v) = size.scan_cell(i);
        let tile = rng.below(COVERING_TILES.len() as u32) as usize;
        population.coverings.push(TilePlacement { tile, u, v });
    }

    for i in 0..cells {
        if rng.randint(0, OBSTACLE_ODDS) != 0 {
            continue;
        }
        let (mut u, mut v) = size.scan_cell(i);
        // keep obstacles off the outer wall ring
        if u == size.width - 1 {
            u -= 1;
        }
        if v == 0 {
            v += 1;
        }
        let template = rng.below(SCENERY.len() as u32) as usize;
        let position = Vec2::new(u as f32, v as f32);
        population
            .collision_boxes
            .push(SCENERY[template].hit_box.translated(position.x, position.y));
        population.objects.push(ObjectPlacement { template, position });
    }

    population
}

/// Walls painted behind the actor layer: north corner, north-west run with
/// gates, north-east run, west and east corners.
pub(crate) fn back_walls(size: WorldSize) -> Vec<WallPlacement> {
    let w = size.width as f32;
    let h = size.height as f32;
    let mut walls = Vec::with_capacity(size.height as usize * 2);

    walls.push(wall(WALL_CORNER_S, 0.0, h - 1.0));
    for i in 0..size.height.saturating_sub(2) {
        let mut tile = 1 - (i as usize & 1);
        if i & 5 == 1 {
            tile = WALL_GATE_E;
        }
        walls.push(wall(tile, 0.0, (size.height - 2 - i) as f32));
    }
    for i in 1..size.height.saturating_sub(1) {
        walls.push(wall((i as usize & 1) + 2, i as f32, h - 1.0));
    }
    walls.push(wall(WALL_CORNER_E, 0.0, 0.0));
    walls.push(wall(WALL_CORNER_W, w - 1.0, h - 1.0));
    walls
}

/// Walls painted over the actor layer: south-east run, south-west run and
/// the south corner.
pub(crate) fn front_walls(size: WorldSize) -> Vec<WallPlacement> {
    let w = size.width as f32;
    let h = size.height as f32;
    let mut walls = Vec::with_capacity(size.height as usize * 2);

    for i in 1..size.height.saturating_sub(1) {
        walls.push(wall((i as usize & 1) + 4, w - 1.0, h - 1.0 - i as f32));
    }
    for i in 1..size.height.saturating_sub(1) {
        walls.push(wall(7 - (i as usize & 1), i as f32, 0.0));
    }
    walls.push(wall(WALL_CORNER_N, w - 1.0, 0.0));
    walls
}

fn wall(tile: usize, u: f32, v: f32) -> WallPlacement {
    WallPlacement { tile, u, v }
}
