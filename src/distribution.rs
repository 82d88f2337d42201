//! Bivariate normal throw-dispersion model.
//!
//! One struct, two integration back ends selected by [`Integration`]:
//! Monte-Carlo (count sampled points inside the region) and deterministic
//! quadrature (Dunavant rule over the density, convex regions only). The
//! translated-region integral follows the game-layer convention: the bed
//! polygon stays fixed and the aim offset shifts the density, so the
//! quadrature path evaluates `density(p - offset)`.
//!
//! The sample generator is a seeded [`SmallRng`] behind a mutex; callers
//! sampling from several threads serialize on that lock. Deterministic runs
//! come from fixed seeds, not from avoiding the generator.

use std::f64::consts::PI;
use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::DartsError;
use crate::geometry::{Polygon, Vec2};
use crate::quadrature::integrate_polygon;

/// 2x2 covariance matrix, row-major.
pub type Covariance = [[f64; 2]; 2];

/// Floor applied to the leading variance before the Cholesky square root,
/// so a near-singular covariance degrades instead of producing NaN.
pub const MIN_VARIANCE: f64 = 1e-12;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 0x5eed_da27;

/// Default number of Monte-Carlo draws per region integral.
pub const DEFAULT_MC_SAMPLES: usize = 10_000;

/// Integration back end for region probabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Integration {
    /// Draw `samples` points and count inclusion. Works on any polygon.
    MonteCarlo { samples: usize },
    /// Dunavant quadrature over the density. Requires a convex region.
    Quadrature,
}

impl Default for Integration {
    fn default() -> Self {
        Integration::MonteCarlo {
            samples: DEFAULT_MC_SAMPLES,
        }
    }
}

/// Bivariate normal distribution over the plane.
///
/// Constructed either from explicit `(cov, mean)` parameters or fitted to a
/// calibration point set (population moments, divide by n). The point set
/// is retained so [`add_point`](NormalDistribution::add_point) can refit.
pub struct NormalDistribution {
    mean: Vec2,
    cov: Covariance,
    method: Integration,
    points: Vec<Vec2>,
    rng: Mutex<SmallRng>,
}

impl NormalDistribution {
    /// Construct from an explicit covariance matrix and mean.
    ///
    /// Fails unless `cov` is symmetric positive definite.
    pub fn new(cov: Covariance, mean: Vec2, method: Integration) -> Result<Self, DartsError> {
        validate_covariance(&cov)?;
        validate_method(method)?;
        Ok(Self {
            mean,
            cov,
            method,
            points: Vec::new(),
            rng: Mutex::new(SmallRng::seed_from_u64(DEFAULT_SEED)),
        })
    }

    /// Construct by fitting to calibration points (population moments).
    ///
    /// Fails with fewer than two points, or when the fitted covariance is
    /// degenerate (all points collinear or coincident).
    pub fn from_points(
        points: Vec<Vec2>,
        method: Integration,
    ) -> Result<Self, DartsError> {
        if points.len() < 2 {
            return Err(DartsError::TooFewPoints { got: points.len() });
        }
        validate_method(method)?;
        let (mean, cov) = fit_population(&points);
        validate_covariance(&cov)?;
        Ok(Self {
            mean,
            cov,
            method,
            points,
            rng: Mutex::new(SmallRng::seed_from_u64(DEFAULT_SEED)),
        })
    }

    /// Replace the generator seed. Two identically-seeded distributions
    /// produce identical sample streams.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(SmallRng::seed_from_u64(seed));
        self
    }

    pub fn mean(&self) -> Vec2 {
        self.mean
    }

    pub fn covariance(&self) -> Covariance {
        self.cov
    }

    pub fn method(&self) -> Integration {
        self.method
    }

    /// Append a calibration sample and refit mean and covariance.
    ///
    /// Refuses to refit while fewer than two points are present; the
    /// point is still recorded so a later call can succeed.
    pub fn add_point(&mut self, p: Vec2) -> Result<(), DartsError> {
        self.points.push(p);
        if self.points.len() < 2 {
            return Err(DartsError::TooFewPoints {
                got: self.points.len(),
            });
        }
        let (mean, cov) = fit_population(&self.points);
        validate_covariance(&cov)?;
        self.mean = mean;
        self.cov = cov;
        Ok(())
    }

    /// Gaussian density `(2π√det Σ)⁻¹ exp(-½ (p-μ)ᵀ Σ⁻¹ (p-μ))`.
    pub fn density(&self, p: Vec2) -> f64 {
        let det = self.cov[0][0] * self.cov[1][1] - self.cov[0][1] * self.cov[1][0];
        let inv = [
            [self.cov[1][1] / det, -self.cov[0][1] / det],
            [-self.cov[1][0] / det, self.cov[0][0] / det],
        ];
        let d = p - self.mean;
        let quad =
            d.x * (inv[0][0] * d.x + inv[0][1] * d.y) + d.y * (inv[1][0] * d.x + inv[1][1] * d.y);
        (-0.5 * quad).exp() / (2.0 * PI * det.sqrt())
    }

    /// Draw one point: standard normal pair through the lower-triangular
    /// Cholesky factor of the covariance, plus the mean.
    pub fn sample(&self) -> Vec2 {
        let mut rng = self.rng.lock().expect("sampler lock poisoned");
        self.sample_with(&mut rng)
    }

    /// Like [`sample`](Self::sample) but driven by an external generator.
    /// Simulation batches use one seeded generator per game for
    /// reproducible parallel runs.
    pub fn sample_with(&self, rng: &mut SmallRng) -> Vec2 {
        let z1: f64 = rng.sample(StandardNormal);
        let z2: f64 = rng.sample(StandardNormal);

        let l00 = self.cov[0][0].max(MIN_VARIANCE).sqrt();
        let l10 = self.cov[0][1] / l00;
        let l11 = (self.cov[1][1] - l10 * l10).max(0.0).sqrt();

        Vec2::new(self.mean.x + l00 * z1, self.mean.y + l10 * z1 + l11 * z2)
    }

    /// Probability mass inside `region`.
    pub fn integrate(&self, region: &Polygon) -> f64 {
        self.integrate_offset(region, Vec2::ZERO)
    }

    /// Probability that `sample + offset` lands inside `region`.
    pub fn integrate_offset(&self, region: &Polygon, offset: Vec2) -> f64 {
        let p = match self.method {
            Integration::MonteCarlo { samples } => {
                let mut rng = self.rng.lock().expect("sampler lock poisoned");
                let mut count = 0usize;
                for _ in 0..samples {
                    if region.contains(self.sample_with(&mut rng) + offset) {
                        count += 1;
                    }
                }
                count as f64 / samples as f64
            }
            Integration::Quadrature => {
                integrate_polygon(region, &|p| self.density(p - offset))
            }
        };
        p.clamp(0.0, 1.0)
    }
}

fn validate_method(method: Integration) -> Result<(), DartsError> {
    match method {
        Integration::MonteCarlo { samples: 0 } => Err(DartsError::ZeroSamples {
            what: "Monte-Carlo sample count",
        }),
        _ => Ok(()),
    }
}

fn validate_covariance(cov: &Covariance) -> Result<(), DartsError> {
    let symmetric = (cov[0][1] - cov[1][0]).abs() <= 1e-9 * (1.0 + cov[0][1].abs());
    let det = cov[0][0] * cov[1][1] - cov[0][1] * cov[1][0];
    if !symmetric || cov[0][0] <= 0.0 || det <= 0.0 {
        return Err(DartsError::BadCovariance {
            m00: cov[0][0],
            m01: cov[0][1],
            m10: cov[1][0],
            m11: cov[1][1],
        });
    }
    Ok(())
}

/// Population mean and covariance (second moment about the mean, divide
/// by n, no Bessel correction, matching the calibration convention).
fn fit_population(points: &[Vec2]) -> (Vec2, Covariance) {
    let n = points.len() as f64;
    let mut mean = Vec2::ZERO;
    for p in points {
        mean = mean + *p;
    }
    mean = mean * (1.0 / n);

    let mut cov = [[0.0f64; 2]; 2];
    for p in points {
        let d = *p - mean;
        cov[0][0] += d.x * d.x;
        cov[0][1] += d.x * d.y;
        cov[1][0] += d.y * d.x;
        cov[1][1] += d.y * d.y;
    }
    cov[0][0] /= n;
    cov[0][1] /= n;
    cov[1][0] /= n;
    cov[1][1] /= n;
    (mean, cov)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: Covariance = [[1.0, 0.0], [0.0, 1.0]];

    #[test]
    fn test_standard_density_at_origin() {
        let dist = NormalDistribution::new(IDENTITY, Vec2::ZERO, Integration::Quadrature).unwrap();
        assert!((dist.density(Vec2::ZERO) - 1.0 / (2.0 * PI)).abs() < 1e-9);
    }

    #[test]
    fn test_density_rotationally_symmetric() {
        let dist = NormalDistribution::new(IDENTITY, Vec2::ZERO, Integration::Quadrature).unwrap();
        let r = 1.37;
        let reference = dist.density(Vec2::new(r, 0.0));
        for k in 1..8 {
            let theta = k as f64 * PI / 4.0;
            let p = Vec2::new(r * theta.cos(), r * theta.sin());
            assert!((dist.density(p) - reference).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_bad_covariance() {
        assert!(NormalDistribution::new(
            [[1.0, 2.0], [2.0, 1.0]], // det < 0
            Vec2::ZERO,
            Integration::Quadrature
        )
        .is_err());
        assert!(NormalDistribution::new(
            [[0.0, 0.0], [0.0, 1.0]],
            Vec2::ZERO,
            Integration::Quadrature
        )
        .is_err());
        assert!(NormalDistribution::new(
            [[1.0, 0.5], [-0.5, 1.0]], // asymmetric
            Vec2::ZERO,
            Integration::Quadrature
        )
        .is_err());
    }

    #[test]
    fn test_rejects_too_few_points() {
        let err = NormalDistribution::from_points(vec![Vec2::ZERO], Integration::Quadrature);
        assert!(matches!(err, Err(DartsError::TooFewPoints { got: 1 })));
    }

    #[test]
    fn test_population_fit() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 2.0),
        ];
        let dist =
            NormalDistribution::from_points(points, Integration::Quadrature).unwrap();
        assert_eq!(dist.mean(), Vec2::new(1.0, 1.0));
        let cov = dist.covariance();
        assert!((cov[0][0] - 1.0).abs() < 1e-12);
        assert!((cov[1][1] - 1.0).abs() < 1e-12);
        assert!(cov[0][1].abs() < 1e-12);
    }

    #[test]
    fn test_seeded_sampling_deterministic() {
        let a = NormalDistribution::new(IDENTITY, Vec2::ZERO, Integration::Quadrature)
            .unwrap()
            .with_seed(42);
        let b = NormalDistribution::new(IDENTITY, Vec2::ZERO, Integration::Quadrature)
            .unwrap()
            .with_seed(42);
        for _ in 0..32 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_sample_mean_converges() {
        let dist = NormalDistribution::new(IDENTITY, Vec2::new(3.0, -2.0), Integration::Quadrature)
            .unwrap()
            .with_seed(7);
        let n = 20_000;
        let mut acc = Vec2::ZERO;
        for _ in 0..n {
            acc = acc + dist.sample();
        }
        let mean = acc * (1.0 / n as f64);
        assert!((mean.x - 3.0).abs() < 0.05, "mean.x = {}", mean.x);
        assert!((mean.y + 2.0).abs() < 0.05, "mean.y = {}", mean.y);
    }

    #[test]
    fn test_quadrature_unit_square_mass() {
        // erf(1/sqrt(2))^2 ≈ 0.4661 for the unit normal over [-1,1]^2
        let dist = NormalDistribution::new(IDENTITY, Vec2::ZERO, Integration::Quadrature).unwrap();
        let square = Polygon::new(vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ]);
        let mass = dist.integrate(&square);
        assert!((0.45..=0.48).contains(&mass), "mass = {mass}");
    }

    #[test]
    fn test_monte_carlo_unit_square_mass() {
        let dist = NormalDistribution::new(
            IDENTITY,
            Vec2::ZERO,
            Integration::MonteCarlo { samples: 100_000 },
        )
        .unwrap()
        .with_seed(99);
        let square = Polygon::new(vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ]);
        let mass = dist.integrate(&square);
        assert!((0.45..=0.48).contains(&mass), "mass = {mass}");
    }

    #[test]
    fn test_offset_integration_shifts_mass() {
        let dist = NormalDistribution::new(IDENTITY, Vec2::ZERO, Integration::Quadrature).unwrap();
        let square = Polygon::new(vec![
            Vec2::new(5.0, 5.0),
            Vec2::new(7.0, 5.0),
            Vec2::new(7.0, 7.0),
            Vec2::new(5.0, 7.0),
        ]);
        // centered far away: essentially zero mass
        assert!(dist.integrate(&square) < 1e-6);
        // aimed at the square's center: substantial mass
        let aimed = dist.integrate_offset(&square, Vec2::new(6.0, 6.0));
        assert!(aimed > 0.4, "aimed = {aimed}");
    }
}
