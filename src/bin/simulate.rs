//! Roll out the optimal policy with sampled throws and report the
//! throw-count distribution against the DP prediction.

use std::time::Instant;

use darts::simulation::{extract_policy, simulate_batch};
use darts::solver::Solver;
use darts::{FinishRule, Game, Integration, MinThrowsSolver, NormalDistribution, Target, Vec2};

const DEFAULT_COVARIANCE: [[f64; 2]; 2] = [[1600.0, 0.0], [0.0, 1600.0]];
const NUM_GAMES: usize = 100_000;

fn main() {
    darts::env_config::init_rayon_threads();
    let target_path = darts::env_config::target_path();
    let start_state = darts::env_config::state();
    let seed = darts::env_config::seed();

    let target = match Target::from_file(&target_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to load target {}: {}", target_path, e);
            std::process::exit(1);
        }
    };

    let dist = match NormalDistribution::new(DEFAULT_COVARIANCE, Vec2::ZERO, Integration::Quadrature)
    {
        Ok(d) => d.with_seed(seed),
        Err(e) => {
            eprintln!("Bad distribution: {}", e);
            std::process::exit(1);
        }
    };
    let game = Game::new(&target, &dist, FinishRule::Double);
    let mut solver = match MinThrowsSolver::new(&game, darts::env_config::num_aim_samples()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Bad solver configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("Solving states 0..={}...", start_state);
    let t_solve = Instant::now();
    let (expected, _) = solver.solve(start_state);
    let policy = extract_policy(&mut solver, start_state);
    println!("DP finished in {:.2}s", t_solve.elapsed().as_secs_f64());

    println!("Simulating {} games from state {}...", NUM_GAMES, start_state);
    let t_sim = Instant::now();
    let result = simulate_batch(&game, &policy, start_state, NUM_GAMES, seed);
    let elapsed = t_sim.elapsed().as_secs_f64();

    println!(
        "Simulated in {:.2}s ({:.0} games/s)",
        elapsed,
        NUM_GAMES as f64 / elapsed
    );
    println!("DP expected throws:   {:.4}", expected);
    println!("Simulated mean:       {:.4}", result.mean);
    println!("Simulated std dev:    {:.4}", result.std_dev);
    println!(
        "min / median / max:   {} / {} / {}",
        result.min, result.median, result.max
    );
}
