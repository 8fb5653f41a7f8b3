use rand::Rng;

use crate::grid::{Cell, Grid};

/// Advances the grid by one generation.
///
/// Birth and death are population-level stochastic events, independent of
/// adjacency:
///
/// - every alive cell independently dies with probability `death_rate`/100
///   (one uniform draw in `[0, 99]` per cell, death iff the draw is below
///   the rate),
/// - at most one cell becomes alive, chosen uniformly among the cells that
///   were dead *before* the death sweep, with probability `birth_rate`/100.
///
/// Returns the next grid together with the number of survivors. The count is
/// taken before the birth is applied, so a newborn only shows up in the next
/// tick's count.
///
/// Rates above 100 behave like 100. A grid without cells is a no-op.
pub fn step<R: Rng + ?Sized>(
    grid: &Grid,
    birth_rate: u8,
    death_rate: u8,
    rng: &mut R,
) -> (Grid, usize) {
    if grid.is_empty() {
        return (grid.clone(), 0);
    }

    let mut next = grid.clone();
    let mut vacant = Vec::new();
    let mut live_count = 0;

    for idx in 0..grid.len() {
        match grid.at(idx) {
            Cell::Alive => {
                if rng.random_range(0..100) < death_rate {
                    next.put(idx, Cell::Dead);
                } else {
                    live_count += 1;
                }
            }
            Cell::Dead => vacant.push(idx),
        }
    }

    if !vacant.is_empty() && rng.random_range(0..100) < birth_rate {
        let chosen = vacant[rng.random_range(0..vacant.len())];
        next.put(chosen, Cell::Alive);
    }

    (next, live_count)
}
