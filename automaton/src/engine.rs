use log::debug;
use rand::Rng;

use crate::{
    error::{AutomatonErr, Result},
    grid::Grid,
    step::step,
};

const MAX_DIM: usize = 100;
const MAX_RATE: u8 = 100;

/// Owns a grid and its birth/death rates, replacing the grid on every tick.
///
/// The wrapper is what a host schedules; the pure [`step`] operation stays
/// available for callers that manage their own state.
#[derive(Debug)]
pub struct LifeEngine {
    grid: Grid,
    birth_rate: u8,
    death_rate: u8,
    live_count: usize,
}

impl LifeEngine {
    /// Creates an engine over an all-dead `rows x cols` grid.
    ///
    /// # Errors
    /// Fails when a dimension is outside `1..=100` or a rate is above 100.
    pub fn new(rows: usize, cols: usize, birth_rate: u8, death_rate: u8) -> Result<Self> {
        if rows == 0 || rows > MAX_DIM {
            return Err(AutomatonErr::DimensionOutOfRange {
                what: "rows",
                got: rows,
            });
        }
        if cols == 0 || cols > MAX_DIM {
            return Err(AutomatonErr::DimensionOutOfRange {
                what: "cols",
                got: cols,
            });
        }
        check_rates(birth_rate, death_rate)?;

        Ok(Self {
            grid: Grid::dead(rows, cols),
            birth_rate,
            death_rate,
            live_count: 0,
        })
    }

    /// Advances one generation and returns the number of survivors.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let (next, live_count) = step(&self.grid, self.birth_rate, self.death_rate, rng);
        debug!(live_count = live_count; "generation advanced");

        self.grid = next;
        self.live_count = live_count;
        live_count
    }

    /// Replaces both rates.
    ///
    /// # Errors
    /// Fails when either rate is above 100; the engine keeps its old rates.
    pub fn set_rates(&mut self, birth_rate: u8, death_rate: u8) -> Result<()> {
        check_rates(birth_rate, death_rate)?;
        self.birth_rate = birth_rate;
        self.death_rate = death_rate;
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Survivor count of the latest tick.
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Kills every cell, keeping the dimensions and rates.
    pub fn reset(&mut self) {
        self.grid = Grid::dead(self.grid.rows(), self.grid.cols());
        self.live_count = 0;
    }
}

fn check_rates(birth_rate: u8, death_rate: u8) -> Result<()> {
    if birth_rate > MAX_RATE {
        return Err(AutomatonErr::RateOutOfRange {
            what: "birth_rate",
            got: birth_rate,
        });
    }
    if death_rate > MAX_RATE {
        return Err(AutomatonErr::RateOutOfRange {
            what: "death_rate",
            got: death_rate,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::grid::Cell;

    #[test]
    fn out_of_range_parameters_are_rejected() {
        assert_eq!(
            LifeEngine::new(0, 10, 0, 0).unwrap_err(),
            AutomatonErr::DimensionOutOfRange { what: "rows", got: 0 }
        );
        assert_eq!(
            LifeEngine::new(10, 101, 0, 0).unwrap_err(),
            AutomatonErr::DimensionOutOfRange { what: "cols", got: 101 }
        );
        assert_eq!(
            LifeEngine::new(10, 10, 101, 0).unwrap_err(),
            AutomatonErr::RateOutOfRange { what: "birth_rate", got: 101 }
        );
        assert_eq!(
            LifeEngine::new(10, 10, 0, 200).unwrap_err(),
            AutomatonErr::RateOutOfRange { what: "death_rate", got: 200 }
        );
    }

    #[test]
    fn ticks_replace_the_grid_wholesale() {
        let mut engine = LifeEngine::new(2, 2, 100, 0).unwrap();
        let before = engine.grid().clone();

        let live_count = engine.tick(&mut StdRng::seed_from_u64(1));

        assert_eq!(live_count, 0);
        assert_eq!(engine.grid().live_count(), 1);
        assert_eq!(before.live_count(), 0);
    }

    #[test]
    fn reset_restores_the_all_dead_grid() {
        let mut engine = LifeEngine::new(4, 4, 100, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        engine.tick(&mut rng);
        engine.tick(&mut rng);

        engine.reset();
        assert_eq!(engine.grid(), &Grid::dead(4, 4));
        assert_eq!(engine.live_count(), 0);

        engine.reset();
        assert_eq!(engine.grid(), &Grid::dead(4, 4));
    }

    #[test]
    fn rate_updates_validate_before_applying() {
        let mut engine = LifeEngine::new(2, 2, 10, 10).unwrap();
        assert!(engine.set_rates(0, 100).is_ok());
        assert!(engine.set_rates(101, 0).is_err());

        // The rejected pair was not applied: with the rates set above, a
        // lone survivor-free tick is deterministic.
        engine.grid.set(0, 0, Cell::Alive);
        let live_count = engine.tick(&mut StdRng::seed_from_u64(3));
        assert_eq!(live_count, 0);
        assert_eq!(engine.grid().live_count(), 0);
    }
}
