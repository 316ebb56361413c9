use alloc::vec::Vec;

use crate::*;
pub use spawn::*;

mod spawn;

/// A tile placed on a blank cell during one spawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub coords: Coord2,
    pub tile: Tile,
}

pub trait TileGenerator {
    /// Fills blanks of `grid`, returning what was placed in draw order.
    fn generate<R: TileRng>(&self, grid: &mut Grid, rng: &mut R) -> Vec<Placement>;
}

/// Spawns tiles the way the grid's own configuration asks for.
pub fn generate_tiles<R: TileRng>(grid: &mut Grid, rng: &mut R) -> Vec<Placement> {
    SpawnGenerator::new(grid.config()).generate(grid, rng)
}
