//! Export the aim-quality heat map for one state as JSON.
//!
//! Writes `heatmap_state_<s>.json` with the grid values (row 0 at the top
//! of the board) and the bounds extent, ready for plotting.

use darts::solver::Solver;
use darts::{
    FinishRule, Game, HeatMap, Integration, MinThrowsSolver, NormalDistribution, Target, Vec2,
};

const DEFAULT_COVARIANCE: [[f64; 2]; 2] = [[1600.0, 0.0], [0.0, 1600.0]];
const GRID_ROWS: usize = 100;
const GRID_COLS: usize = 100;

fn main() {
    let target_path = darts::env_config::target_path();
    let state = darts::env_config::state();

    let target = match Target::from_file(&target_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to load target {}: {}", target_path, e);
            std::process::exit(1);
        }
    };

    let dist = match NormalDistribution::new(DEFAULT_COVARIANCE, Vec2::ZERO, Integration::Quadrature)
    {
        Ok(d) => d.with_seed(darts::env_config::seed()),
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

    // Solve first so the heat map's recursive lookups hit the memo.
    let (value, aim) = solver.solve(state);
    println!(
        "State {}: expected throws {:.4}, best aim ({:.2}, {:.2})",
        state, value, aim.x, aim.y
    );

    let bounds = game.bounds();
    let mut heat = match HeatMap::new(&mut solver, GRID_ROWS, GRID_COLS) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Bad grid: {}", e);
            std::process::exit(1);
        }
    };
    let grid = heat.heat_map(state);

    let output = serde_json::json!({
        "state": state,
        "rows": GRID_ROWS,
        "cols": GRID_COLS,
        "extent": bounds,
        "values": grid,
    });

    let out_path = format!("heatmap_state_{}.json", state);
    match std::fs::write(&out_path, serde_json::to_string(&output).expect("grid serializes")) {
        Ok(()) => println!("Wrote {}x{} grid to {}", GRID_ROWS, GRID_COLS, out_path),
        Err(e) => {
            eprintln!("Failed to write {}: {}", out_path, e);
            std::process::exit(1);
        }
    }
}
