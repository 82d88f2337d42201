//! Shared environment configuration for the darts binaries.
//!
//! Consolidates the `DARTS_*` and `RAYON_NUM_THREADS` reads so every
//! binary resolves defaults the same way.

use crate::distribution::DEFAULT_SEED;

/// Read `DARTS_TARGET_PATH` (default `"target.out"`).
pub fn target_path() -> String {
    std::env::var("DARTS_TARGET_PATH").unwrap_or_else(|_| "target.out".to_string())
}

/// Read `DARTS_NUM_SAMPLES` (aim grid size, default 10000).
pub fn num_aim_samples() -> usize {
    std::env::var("DARTS_NUM_SAMPLES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10_000)
}

/// Read `DARTS_SEED` (default the library seed).
pub fn seed() -> u64 {
    std::env::var("DARTS_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED)
}

/// Read `DARTS_STATE` (single state of interest, default 40).
pub fn state() -> u32 {
    std::env::var("DARTS_STATE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(40)
}

/// Read `DARTS_MAX_STATE` (solve range upper end, default 101).
pub fn max_state() -> u32 {
    std::env::var("DARTS_MAX_STATE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(101)
}

/// Read `RAYON_NUM_THREADS` (default 8) and build the global pool.
/// Tolerates an already-initialized pool. Returns the thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok(); // May fail if already initialized
    println!("Rayon threads: {}", num_threads);
    num_threads
}
