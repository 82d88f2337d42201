//! Per-state heat maps: the solver's value at the center of every cell of
//! a rectangular grid over the target bounds.
//!
//! Row 0 is the top of the board (maximum y), matching how renderers lay
//! grids out. Grids are cached per state; the values carry whatever
//! semantics the wrapped solver has (expected throws or expected points).

use std::collections::HashMap;

use crate::error::DartsError;
use crate::game::State;
use crate::geometry::Vec2;
use crate::solver::Solver;

/// `rows x cols` matrix of solver values, indexed `[row][col]`.
pub type Grid = Vec<Vec<f64>>;

pub struct HeatMap<'s, S: Solver> {
    solver: &'s mut S,
    rows: usize,
    cols: usize,
    cache: HashMap<State, Grid>,
}

impl<'s, S: Solver> HeatMap<'s, S> {
    pub fn new(solver: &'s mut S, rows: usize, cols: usize) -> Result<Self, DartsError> {
        if rows == 0 || cols == 0 {
            return Err(DartsError::EmptyGrid { rows, cols });
        }
        Ok(Self {
            solver,
            rows,
            cols,
            cache: HashMap::new(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Evaluate every cell center for `state`. Cached per state.
    pub fn heat_map(&mut self, state: State) -> Grid {
        if let Some(grid) = self.cache.get(&state) {
            return grid.clone();
        }

        let bounds = self.solver.bounds();
        let extent = bounds.max - bounds.min;
        let mut grid = vec![vec![0.0f64; self.cols]; self.rows];
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                let x = bounds.min.x + extent.x * (c as f64 + 0.5) / self.cols as f64;
                let y = bounds.min.y + extent.y * ((self.rows - r) as f64 - 0.5) / self.rows as f64;
                *cell = self.solver.solve_aim(state, Vec2::new(x, y));
            }
        }

        self.cache.insert(state, grid.clone());
        grid
    }
}
