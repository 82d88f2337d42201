//! Aim solvers: minimum expected throws (dynamic programming) and maximum
//! expected points (single-step greedy).
//!
//! Both enumerate candidate aims at the centers of a uniform grid over the
//! game bounds and break value ties by enumeration order, so results are
//! deterministic for a fixed configuration.
//!
//! The DP treats the self-loop (misses, busts, and transitions into known
//! dead ends) in closed form: one throw now plus the conditional expected
//! future given the state changed, `(1 + Σ P·V) / (1 - p_self)`. This is
//! the exact hitting time of the embedded chain on non-self transitions,
//! not a truncated iteration. States where every aim keeps essentially all
//! mass in the self-loop are unwinnable and valued at [`INFINITE_SCORE`].

use std::collections::{HashMap, HashSet};

use crate::error::DartsError;
use crate::game::{Game, State};
use crate::geometry::{Bounds, Vec2};

/// Sentinel value for states (or aims) from which the game cannot finish.
pub const INFINITE_SCORE: f64 = 1e9;

/// Self-loop probability above `1 - EPSILON` counts as never escaping.
pub const EPSILON: f64 = 1e-9;

/// Common interface of the two aim strategies, and the seam the heat map
/// renders through.
pub trait Solver {
    /// Best value over the aim grid and the aim achieving it.
    /// For the DP this is expected throws (lower is better); for the
    /// greedy strategy, expected points (higher is better).
    fn solve(&mut self, state: State) -> (f64, Vec2);

    /// Value of one specific aim point for `state`.
    fn solve_aim(&mut self, state: State, aim: Vec2) -> f64;

    /// The bounds candidate aims are drawn from.
    fn bounds(&self) -> Bounds;
}

/// Centers of a uniform grid over `bounds` holding roughly `num_samples`
/// cells: `k = floor(sqrt(n))` rows and `n / k` columns, enumerated
/// column-by-column in a fixed order.
pub fn sample_aims(bounds: Bounds, num_samples: usize) -> Vec<Vec2> {
    let height = (num_samples as f64).sqrt() as usize;
    let width = num_samples / height;
    let extent = bounds.max - bounds.min;

    let mut aims = Vec::with_capacity(width * height);
    for i in 0..width {
        for j in 0..height {
            let x = bounds.min.x + extent.x * (i as f64 + 0.5) / width as f64;
            let y = bounds.min.y + extent.y * (j as f64 + 0.5) / height as f64;
            aims.push(Vec2::new(x, y));
        }
    }
    aims
}

/// Minimum-expected-throws solver.
///
/// `solve` memoizes `(value, aim)` per state; recursion is demand-driven
/// and terminates because every non-self, non-dead-end transition strictly
/// reduces the state. The winnability set only ever grows: a state is
/// winnable once any aim yields a finite value, and successor mass into
/// states already known unwinnable is folded into the self-loop so dead
/// ends never poison ancestors.
pub struct MinThrowsSolver<'g> {
    game: &'g Game<'g>,
    num_samples: usize,
    memo: HashMap<State, (f64, Vec2)>,
    winnable: HashSet<State>,
}

impl<'g> MinThrowsSolver<'g> {
    pub fn new(game: &'g Game<'g>, num_samples: usize) -> Result<Self, DartsError> {
        if num_samples == 0 {
            return Err(DartsError::ZeroSamples {
                what: "aim sample count",
            });
        }
        Ok(Self {
            game,
            num_samples,
            memo: HashMap::new(),
            winnable: HashSet::new(),
        })
    }

    pub fn game(&self) -> &'g Game<'g> {
        self.game
    }

    /// Has `state` been proven winnable so far? Only meaningful after a
    /// `solve` touching it.
    pub fn is_winnable(&self, state: State) -> bool {
        state == 0 || self.winnable.contains(&state)
    }

    fn aim_value(&mut self, state: State, aim: Vec2) -> f64 {
        let transitions = self.game.transitions(aim, state);
        let mut p_self = 0.0;
        let mut expected = 0.0;

        for (next, p) in transitions {
            if next == state {
                p_self += p;
                continue;
            }
            let (value, _) = self.solve(next);
            if !self.winnable.contains(&next) {
                // a transition into a dead end is as good as staying put
                p_self += p;
                continue;
            }
            expected += value * p;
        }

        if p_self >= 1.0 - EPSILON {
            return INFINITE_SCORE;
        }
        (1.0 + expected) / (1.0 - p_self)
    }
}

impl Solver for MinThrowsSolver<'_> {
    fn solve(&mut self, state: State) -> (f64, Vec2) {
        if state == 0 {
            self.winnable.insert(0);
            return (0.0, Vec2::ZERO);
        }
        if let Some(&cached) = self.memo.get(&state) {
            return cached;
        }

        let mut best = (INFINITE_SCORE, Vec2::ZERO);
        for aim in sample_aims(self.game.bounds(), self.num_samples) {
            let value = self.aim_value(state, aim);
            if value < INFINITE_SCORE {
                self.winnable.insert(state);
            }
            if value < best.0 {
                best = (value, aim);
            }
        }

        self.memo.insert(state, best);
        best
    }

    fn solve_aim(&mut self, state: State, aim: Vec2) -> f64 {
        self.aim_value(state, aim)
    }

    fn bounds(&self) -> Bounds {
        self.game.bounds()
    }
}

/// Maximum-expected-points solver: the aim maximizing the expected score
/// reduction of a single throw. Purely myopic, no memoization; a state
/// near zero still aims for the biggest expected reduction even under the
/// double-finish rule.
pub struct MaxPointsSolver<'g> {
    game: &'g Game<'g>,
    num_samples: usize,
}

impl<'g> MaxPointsSolver<'g> {
    pub fn new(game: &'g Game<'g>, num_samples: usize) -> Result<Self, DartsError> {
        if num_samples == 0 {
            return Err(DartsError::ZeroSamples {
                what: "aim sample count",
            });
        }
        Ok(Self { game, num_samples })
    }

    pub fn game(&self) -> &'g Game<'g> {
        self.game
    }

    fn aim_points(&self, state: State, aim: Vec2) -> f64 {
        let mut expected = 0.0;
        for (hit, p) in self.game.hit_distribution(aim) {
            let next = self.game.apply_hit(state, hit);
            expected += (state - next) as f64 * p;
        }
        expected
    }
}

impl Solver for MaxPointsSolver<'_> {
    fn solve(&mut self, state: State) -> (f64, Vec2) {
        // missing the board entirely scores zero, the worst case
        let mut best = (0.0, Vec2::ZERO);
        for aim in sample_aims(self.game.bounds(), self.num_samples) {
            let value = self.aim_points(state, aim);
            if value > best.0 {
                best = (value, aim);
            }
        }
        best
    }

    fn solve_aim(&mut self, state: State, aim: Vec2) -> f64 {
        self.aim_points(state, aim)
    }

    fn bounds(&self) -> Bounds {
        self.game.bounds()
    }
}
