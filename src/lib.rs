//! # Darts — optimal aiming under a stochastic throw model
//!
//! Computes, for any countdown state of a darts game, the aim point
//! minimizing the expected number of throws to finish (or maximizing the
//! expected single-throw score), together with dense heat maps evaluating
//! every candidate aim.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | 1 | [`geometry`] / [`quadrature`] | point-in-polygon, triangle areas, Dunavant degree-5 rule |
//! | 2 | [`distribution`] | bivariate normal dispersion; Monte-Carlo or quadrature region integrals |
//! | 3 | [`target`] / [`game`] | bed classification, cached hit distributions, finish-rule transitions |
//! | 4 | [`solver`] | memoized expected-throws DP with winnability, myopic expected-points greedy |
//! | 5 | [`heatmap`] / [`simulation`] | per-state aim-quality grids, policy rollout verification |
//!
//! Data flows outward only: a [`game::Game`] borrows a target and a
//! distribution, a solver borrows the game, a heat map borrows the solver.
//! Each layer owns exactly its cache (hit distributions, DP memo and
//! winnability, per-state grids); mutating a target or distribution means
//! rebuilding everything downstream; there is no partial invalidation.
//!
//! All results are deterministic for a fixed target, seed, and solver
//! configuration: hit distributions are ordered by hit data, aim grids are
//! enumerated in a fixed order with first-wins tie-breaking, and every
//! random generator is seeded.

pub mod distribution;
pub mod env_config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod heatmap;
pub mod quadrature;
pub mod simulation;
pub mod solver;
pub mod target;

pub use distribution::{Integration, NormalDistribution};
pub use error::DartsError;
pub use game::{FinishRule, Game, HitDistribution, State, StateDistribution};
pub use geometry::{Bounds, Polygon, Vec2};
pub use heatmap::HeatMap;
pub use solver::{MaxPointsSolver, MinThrowsSolver, Solver, EPSILON, INFINITE_SCORE};
pub use target::{Bed, HitData, HitType, Target};
