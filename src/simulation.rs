//! Batched full-game simulation under a fixed aiming policy.
//!
//! Plays N games with sampled throws, counting throws to finish. Each game
//! owns a generator seeded from `base_seed + game_index`, so batches are
//! reproducible no matter how rayon schedules them. Used to verify the DP
//! values empirically: the batch mean converges to `V(start)`.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::game::{Game, State};
use crate::geometry::Vec2;
use crate::solver::{MinThrowsSolver, Solver};

/// Throw cap per game, so unfinishable starts terminate.
pub const MAX_THROWS: u32 = 10_000;

/// Aggregate statistics of one simulation batch.
pub struct SimulationResult {
    pub throws: Vec<u32>,
    pub mean: f64,
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
    pub median: u32,
}

impl SimulationResult {
    fn from_throws(mut throws: Vec<u32>) -> Self {
        throws.sort_unstable();
        let n = throws.len() as f64;
        let mean = throws.iter().map(|&t| t as f64).sum::<f64>() / n;
        let var = throws
            .iter()
            .map(|&t| {
                let d = t as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        SimulationResult {
            mean,
            std_dev: var.sqrt(),
            min: throws[0],
            max: throws[throws.len() - 1],
            median: throws[throws.len() / 2],
            throws,
        }
    }
}

/// Optimal aim per state from 0 to `start`, extracted by solving every
/// state once. Index by the current state during rollout.
pub fn extract_policy(solver: &mut MinThrowsSolver<'_>, start: State) -> Vec<Vec2> {
    (0..=start).map(|s| solver.solve(s).1).collect()
}

/// Play one game from `start`, following `policy`, until the game is won
/// or [`MAX_THROWS`] is reached. Returns the number of throws.
pub fn simulate_game(
    game: &Game<'_>,
    policy: &[Vec2],
    start: State,
    rng: &mut SmallRng,
) -> u32 {
    let mut state = start;
    let mut throws = 0u32;
    while state > 0 && throws < MAX_THROWS {
        let aim = policy[state as usize];
        state = game.throw_sample_with(rng, aim, state);
        throws += 1;
    }
    throws
}

/// Play `num_games` games in parallel with per-game seeds.
pub fn simulate_batch(
    game: &Game<'_>,
    policy: &[Vec2],
    start: State,
    num_games: usize,
    base_seed: u64,
) -> SimulationResult {
    let throws: Vec<u32> = (0..num_games)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(i as u64));
            simulate_game(game, policy, start, &mut rng)
        })
        .collect();
    SimulationResult::from_throws(throws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Integration, NormalDistribution};
    use crate::game::FinishRule;
    use crate::geometry::Polygon;
    use crate::target::{Bed, HitData, HitType, Target};

    fn board() -> Target {
        Target::new(vec![Bed::new(
            Polygon::new(vec![
                Vec2::new(-5.0, -5.0),
                Vec2::new(5.0, -5.0),
                Vec2::new(5.0, 5.0),
                Vec2::new(-5.0, 5.0),
            ]),
            HitData::new(HitType::Normal, -20),
        )])
        .unwrap()
    }

    #[test]
    fn test_simulation_matches_dp_value() {
        let target = board();
        // sampling-based integration so the DP's hit probabilities and the
        // rollout's true hit probabilities estimate the same quantity
        let dist = NormalDistribution::new(
            [[1.0, 0.0], [0.0, 1.0]],
            Vec2::ZERO,
            Integration::MonteCarlo { samples: 10_000 },
        )
        .unwrap()
        .with_seed(77);
        let game = Game::new(&target, &dist, FinishRule::Any);
        let mut solver = MinThrowsSolver::new(&game, 100).unwrap();

        let (value, _) = solver.solve(20);
        let policy = extract_policy(&mut solver, 20);
        let result = simulate_batch(&game, &policy, 20, 2000, 1234);

        // one throw into a huge bed wins almost surely
        assert!((result.mean - value).abs() < 0.1, "mean {} vs dp {}", result.mean, value);
        assert_eq!(result.min, 1);
    }

    #[test]
    fn test_batches_reproducible() {
        let target = board();
        let dist = NormalDistribution::new(
            [[4.0, 0.0], [0.0, 4.0]],
            Vec2::ZERO,
            Integration::Quadrature,
        )
        .unwrap();
        let game = Game::new(&target, &dist, FinishRule::Any);
        let mut solver = MinThrowsSolver::new(&game, 64).unwrap();
        let policy = extract_policy(&mut solver, 40);

        let a = simulate_batch(&game, &policy, 40, 500, 42);
        let b = simulate_batch(&game, &policy, 40, 500, 42);
        assert_eq!(a.throws, b.throws);
    }
}
