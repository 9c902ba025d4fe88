//! Constrained random position sampling.

use crate::model::{GridPosition, MazeGrid};
use rand::{rngs::StdRng, seq::SliceRandom};
use std::collections::HashSet;

/// Draws up to `count` distinct walkable cells of `maze`, excluding the
/// cells in `exclude`.
///
/// When fewer than `count` candidates remain, all of them are returned: a
/// partial result, not an error. The returned sequence carries no ordering
/// guarantee.
pub fn sample_positions(
    maze: &MazeGrid,
    count: usize,
    exclude: &HashSet<(u32, u32)>,
    rng: &mut StdRng,
) -> Vec<GridPosition> {
    let candidates: Vec<(u32, u32)> = maze
        .walkable_cells()
        .filter(|cell| !exclude.contains(cell))
        .collect();

    candidates
        .choose_multiple(rng, count)
        .map(|&(x, y)| GridPosition::new(x, y))
        .collect()
}
