//! Dunavant 7-point degree-5 quadrature on triangles, extended to convex
//! polygons by fan triangulation.
//!
//! The rule is exact for polynomials of degree <= 5 on the reference
//! triangle `(0,0), (1,0), (0,1)` and empirically accurate to under 1% for
//! a bivariate normal density over bed-sized regions. Fan triangulation
//! from vertex 0 is only area-correct on convex polygons; callers verify
//! convexity with [`crate::geometry::Polygon::is_convex`].

use crate::geometry::{triangle_area, Polygon, Vec2};

/// Barycentric nodes and weights of the degree-5 Dunavant rule:
/// one centroid node plus two symmetric triples. Weights sum to 1.
const DUNAVANT_DEGREE5: [([f64; 3], f64); 7] = [
    ([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], 0.225),
    (
        [0.059_715_871_789_77, 0.470_142_064_105_115, 0.470_142_064_105_115],
        0.132_394_152_788_506,
    ),
    (
        [0.470_142_064_105_115, 0.059_715_871_789_77, 0.470_142_064_105_115],
        0.132_394_152_788_506,
    ),
    (
        [0.470_142_064_105_115, 0.470_142_064_105_115, 0.059_715_871_789_77],
        0.132_394_152_788_506,
    ),
    (
        [0.797_426_985_353_087, 0.101_286_507_323_456, 0.101_286_507_323_456],
        0.125_939_180_544_827,
    ),
    (
        [0.101_286_507_323_456, 0.797_426_985_353_087, 0.101_286_507_323_456],
        0.125_939_180_544_827,
    ),
    (
        [0.101_286_507_323_456, 0.101_286_507_323_456, 0.797_426_985_353_087],
        0.125_939_180_544_827,
    ),
];

/// Integrate `f` over the triangle `(v0, v1, v2)`.
pub fn integrate_triangle<F: Fn(Vec2) -> f64>(v0: Vec2, v1: Vec2, v2: Vec2, f: &F) -> f64 {
    let area = triangle_area(v0, v1, v2);
    let mut sum = 0.0;
    for &([b0, b1, b2], weight) in &DUNAVANT_DEGREE5 {
        let p = v0 * b0 + v1 * b1 + v2 * b2;
        sum += weight * f(p);
    }
    area * sum
}

/// Integrate `f` over a convex polygon by fanning triangles out of vertex 0.
///
/// Polygons with fewer than three vertices integrate to zero. Non-convex
/// input produces inverted fan triangles and a wrong result; do not call
/// this without checking convexity first.
pub fn integrate_polygon<F: Fn(Vec2) -> f64>(region: &Polygon, f: &F) -> f64 {
    let verts = region.vertices();
    if verts.len() < 3 {
        return 0.0;
    }
    debug_assert!(region.is_convex(), "quadrature on a non-convex polygon");
    let mut total = 0.0;
    for i in 1..verts.len() - 1 {
        total += integrate_triangle(verts[0], verts[i], verts[i + 1], f);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = DUNAVANT_DEGREE5.iter().map(|&(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_integrates_to_area() {
        let tri = (
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(0.0, 2.0),
        );
        let val = integrate_triangle(tri.0, tri.1, tri.2, &|_| 1.0);
        assert!((val - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_degree5_polynomial_exact() {
        // integral of x^2 y over the reference triangle is 1/60
        let v0 = Vec2::new(0.0, 0.0);
        let v1 = Vec2::new(1.0, 0.0);
        let v2 = Vec2::new(0.0, 1.0);
        let val = integrate_triangle(v0, v1, v2, &|p| p.x * p.x * p.y);
        assert!((val - 1.0 / 60.0).abs() < 1e-12, "got {val}");

        // x^3 y^2: degree 5, integral over the reference triangle is 1/420
        let val = integrate_triangle(v0, v1, v2, &|p| p.x.powi(3) * p.y.powi(2));
        assert!((val - 1.0 / 420.0).abs() < 1e-12, "got {val}");
    }

    #[test]
    fn test_polygon_fan_matches_triangle_sum() {
        let square = Polygon::new(vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ]);
        // linear field integrates to 0 by symmetry, constant to the area
        assert!(integrate_polygon(&square, &|p| p.x + p.y).abs() < 1e-12);
        assert!((integrate_polygon(&square, &|_| 1.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_polygon_integrates_to_zero() {
        let empty = Polygon::new(vec![]);
        assert_eq!(integrate_polygon(&empty, &|_| 1.0), 0.0);
    }
}
