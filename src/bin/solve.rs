//! Solve a range of countdown states and print expected throws and
//! optimal aims.
//!
//! Reads the target from `DARTS_TARGET_PATH`, solves states
//! `1..=DARTS_MAX_STATE` under the finish-on-double rule with a
//! quadrature-integrated normal dispersion, and prints one line per state.

use std::time::Instant;

use darts::solver::Solver;
use darts::{FinishRule, Game, Integration, MinThrowsSolver, NormalDistribution, Target, Vec2};

/// Dispersion of a club-level player, in board units squared.
const DEFAULT_COVARIANCE: [[f64; 2]; 2] = [[1600.0, 0.0], [0.0, 1600.0]];

fn main() {
    let target_path = darts::env_config::target_path();
    let num_samples = darts::env_config::num_aim_samples();
    let max_state = darts::env_config::max_state();

    let target = match Target::from_file(&target_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to load target {}: {}", target_path, e);
            std::process::exit(1);
        }
    };
    println!("Loaded target: {} beds from {}", target.beds().len(), target_path);

    let dist = match NormalDistribution::new(DEFAULT_COVARIANCE, Vec2::ZERO, Integration::Quadrature)
    {
        Ok(d) => d.with_seed(darts::env_config::seed()),
        Err(e) => {
            eprintln!("Bad distribution: {}", e);
            std::process::exit(1);
        }
    };
    let game = Game::new(&target, &dist, FinishRule::Double);
    let mut solver = match MinThrowsSolver::new(&game, num_samples) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Bad solver configuration: {}", e);
            std::process::exit(1);
        }
    };

    let bounds = game.bounds();
    println!(
        "Board bounds: ({:.1}, {:.1}) .. ({:.1}, {:.1}), {} aim samples",
        bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y, num_samples
    );

    let start = Instant::now();
    for state in 1..=max_state {
        let (value, aim) = solver.solve(state);
        if solver.is_winnable(state) {
            println!(
                "State {:3}: expected throws {:.4}, best aim ({:.2}, {:.2})",
                state, value, aim.x, aim.y
            );
        } else {
            println!("State {:3}: not winnable from any aim", state);
        }
    }
    println!(
        "Solved {} states in {:.2}s",
        max_state,
        start.elapsed().as_secs_f64()
    );
}
