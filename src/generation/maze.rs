//! Maze grid construction.

use crate::model::MazeGrid;
use crate::GemmazeResult;
use rand::{rngs::StdRng, Rng};

/// Builds a `width`×`height` walkability grid.
///
/// The pocket around the origin, cells (0,0), (1,0) and (0,1), is always
/// walkable, so the start cell has a legal first move in two directions.
/// Every other cell is walkable iff a fresh uniform [0,1) draw exceeds
/// `wall_density`. No connectivity check is performed: a generated grid may
/// leave collectibles or the exit unreachable.
///
/// # Examples
///
/// ```
/// use gemmaze::build_maze;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let grid = build_maze(6, 6, 0.2, &mut rng)?;
/// assert_eq!(grid.width(), 6);
/// assert!(grid.is_walkable(0, 0));
/// # Ok::<(), gemmaze::GemmazeError>(())
/// ```
pub fn build_maze(width: u32, height: u32, wall_density: f64, rng: &mut StdRng) -> GemmazeResult<MazeGrid> {
    let mut rows = Vec::with_capacity(height as usize);
    for y in 0..height {
        let mut row = Vec::with_capacity(width as usize);
        for x in 0..width {
            let forced = (x == 0 && y == 0) || (x == 1 && y == 0) || (x == 0 && y == 1);
            // Forced cells consume no random draws.
            row.push(forced || rng.gen::<f64>() > wall_density);
        }
        rows.push(row);
    }
    MazeGrid::from_rows(rows)
}
