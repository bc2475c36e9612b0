//! Shape descriptors: one polygon in, five scalars out.
//!
//! The descriptors are chosen to compare rock outlines observed at different
//! times, so none of them depends on where the rock sits; only `orientation`
//! depends on how it is turned.
//!
//! | field | definition |
//! |-------|------------|
//! | `eccentricity` | `sqrt(a² − b²)/a` from extremal-point axes |
//! | `compactness`  | Polsby–Popper `4π·A / P²` |
//! | `convexity`    | `P_hull / P` (hull over outline) |
//! | `solidity`     | `A / A_hull` |
//! | `orientation`  | direction of the longest minimum-rectangle edge, degrees |
//!
//! `convexity` is hull perimeter over outline perimeter (not the reverse), so
//! for simple outlines it lies in (0, 1] and equals 1 for convex ones.

use std::f64::consts::PI;

use nalgebra::Vector2;

use crate::error::{MatchError, Result};
use crate::geom2::Shape2;

/// Positional names of `ShapeFeatures::as_array`.
pub const FEATURE_NAMES: [&str; 5] = [
    "eccentricity",
    "compactness",
    "convexity",
    "solidity",
    "orientation",
];

/// Fixed-order descriptor vector of one polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeFeatures {
    pub eccentricity: f64,
    pub compactness: f64,
    pub convexity: f64,
    pub solidity: f64,
    /// Degrees, range (-180, 180].
    pub orientation: f64,
}

impl ShapeFeatures {
    /// Compute all five descriptors; fails on the first degenerate one.
    pub fn extract<S: Shape2 + ?Sized>(shape: &S) -> Result<Self> {
        Ok(Self {
            eccentricity: eccentricity(shape.vertices())?,
            compactness: compactness(shape)?,
            convexity: convexity(shape)?,
            solidity: solidity(shape)?,
            orientation: orientation(shape)?,
        })
    }

    /// Positional vector in `FEATURE_NAMES` order; the form the scorer consumes.
    #[inline]
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.eccentricity,
            self.compactness,
            self.convexity,
            self.solidity,
            self.orientation,
        ]
    }
}

/// Eccentricity from the four extremal points of the vertex set.
///
/// The extremal points are taken per coordinate, not from an oriented box:
/// - smallest/largest x, each paired with the smallest/largest y among the vertices sharing that x;
/// - smallest/largest y, each paired with the smallest/largest x among the vertices sharing that y.
///
/// The longer of the two extremal spans is the major axis (x span on ties).
pub fn eccentricity(vertices: &[Vector2<f64>]) -> Result<f64> {
    const OP: &str = "eccentricity";
    let first = vertices
        .first()
        .ok_or(MatchError::degenerate(OP, "no vertices"))?;

    let min_x = vertices.iter().map(|p| p.x).fold(first.x, f64::min);
    let max_x = vertices.iter().map(|p| p.x).fold(first.x, f64::max);
    let min_y = vertices.iter().map(|p| p.y).fold(first.y, f64::min);
    let max_y = vertices.iter().map(|p| p.y).fold(first.y, f64::max);

    let with_x = |x: f64| vertices.iter().filter(move |p| p.x == x);
    let with_y = |y: f64| vertices.iter().filter(move |p| p.y == y);
    let small_x = Vector2::new(min_x, with_x(min_x).map(|p| p.y).fold(f64::INFINITY, f64::min));
    let big_x = Vector2::new(max_x, with_x(max_x).map(|p| p.y).fold(f64::NEG_INFINITY, f64::max));
    let small_y = Vector2::new(with_y(min_y).map(|p| p.x).fold(f64::INFINITY, f64::min), min_y);
    let big_y = Vector2::new(with_y(max_y).map(|p| p.x).fold(f64::NEG_INFINITY, f64::max), max_y);

    let distance_lat = (big_x - small_x).norm();
    let distance_lon = (big_y - small_y).norm();
    let (major, minor) = if distance_lat >= distance_lon {
        (distance_lat, distance_lon)
    } else {
        (distance_lon, distance_lat)
    };
    if !(major > 0.0) {
        return Err(MatchError::degenerate(OP, "zero major axis length"));
    }
    let a = major / 2.0;
    let b = minor / 2.0;
    Ok((a * a - b * b).sqrt() / a)
}

/// Polsby–Popper compactness `4π·area / perimeter²`; 1 for a circle.
pub fn compactness<S: Shape2 + ?Sized>(shape: &S) -> Result<f64> {
    let p = shape.perimeter();
    if !(p > 0.0) {
        return Err(MatchError::degenerate("compactness", "zero perimeter"));
    }
    Ok(4.0 * PI * shape.area() / (p * p))
}

/// Convex-hull perimeter over outline perimeter.
pub fn convexity<S: Shape2 + ?Sized>(shape: &S) -> Result<f64> {
    let p = shape.perimeter();
    if !(p > 0.0) {
        return Err(MatchError::degenerate("convexity", "zero perimeter"));
    }
    Ok(shape.convex_hull()?.perimeter() / p)
}

/// Area over convex-hull area; 1 for convex outlines.
pub fn solidity<S: Shape2 + ?Sized>(shape: &S) -> Result<f64> {
    let hull_area = shape.convex_hull()?.area();
    if !(hull_area > 0.0) {
        return Err(MatchError::degenerate("solidity", "zero hull area"));
    }
    Ok(shape.area() / hull_area)
}

/// Direction in degrees of the longest edge of the minimum rotated rectangle.
///
/// Edges are visited in boundary order; on equal lengths the first one wins.
pub fn orientation<S: Shape2 + ?Sized>(shape: &S) -> Result<f64> {
    let rect = shape.minimum_rotated_rectangle()?;
    let mut edges = rect.edges();
    let mut longest = edges
        .next()
        .ok_or(MatchError::degenerate("orientation", "empty rectangle"))?;
    for e in edges {
        if e.length() > longest.length() {
            longest = e;
        }
    }
    Ok(longest.angle_deg())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::Polygon2;
    use nalgebra::{vector, Matrix2};
    use proptest::prelude::*;

    fn unit_square() -> Polygon2 {
        Polygon2::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap()
    }

    fn regular_ngon(n: usize) -> Polygon2 {
        let pts = (0..n)
            .map(|k| {
                let th = std::f64::consts::TAU * k as f64 / n as f64;
                vector![th.cos(), th.sin()]
            })
            .collect();
        Polygon2::new(pts).unwrap()
    }

    #[test]
    fn unit_square_features() {
        let f = ShapeFeatures::extract(&unit_square()).unwrap();
        assert!((f.compactness - PI / 4.0).abs() < 1e-12);
        assert!((f.solidity - 1.0).abs() < 1e-12);
        assert!((f.convexity - 1.0).abs() < 1e-12);
        assert!(f.eccentricity.abs() < 1e-12);
        assert!(f.orientation.abs() < 1e-12);
    }

    #[test]
    fn compactness_approaches_one_for_circles() {
        let c16 = compactness(&regular_ngon(16)).unwrap();
        let c64 = compactness(&regular_ngon(64)).unwrap();
        let c512 = compactness(&regular_ngon(512)).unwrap();
        assert!(c16 < c64 && c64 < c512);
        assert!((1.0 - c512).abs() < 1e-4);
    }

    #[test]
    fn convex_shapes_are_solid_and_convex() {
        for n in [3, 5, 8, 33] {
            let p = regular_ngon(n);
            assert!((solidity(&p).unwrap() - 1.0).abs() < 1e-9, "n={n}");
            assert!((convexity(&p).unwrap() - 1.0).abs() < 1e-9, "n={n}");
        }
    }

    #[test]
    fn concave_shape_ratios() {
        let l = Polygon2::from_xy(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ])
        .unwrap();
        assert!((solidity(&l).unwrap() - 3.0 / 3.5).abs() < 1e-12);
        let expected = (6.0 + 2f64.sqrt()) / 8.0;
        assert!((convexity(&l).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn wide_rectangle_orientation_is_horizontal() {
        let r = Polygon2::from_xy(&[(0.0, 0.0), (5.0, 0.0), (5.0, 2.0), (0.0, 2.0)]).unwrap();
        let o = orientation(&r).unwrap();
        assert!(o.abs() < 1e-9 || (o.abs() - 180.0).abs() < 1e-9, "got {o}");
    }

    #[test]
    fn rotated_rectangle_orientation() {
        let th = 30f64.to_radians();
        let m = Matrix2::new(th.cos(), -th.sin(), th.sin(), th.cos());
        let r = Polygon2::from_xy(&[(0.0, 0.0), (5.0, 0.0), (5.0, 2.0), (0.0, 2.0)])
            .unwrap()
            .map_affine(&m, &vector![1.0, 1.0])
            .unwrap();
        let o = orientation(&r).unwrap();
        let folded = (o - 30.0).rem_euclid(180.0);
        assert!(folded < 1e-9 || (180.0 - folded) < 1e-9, "got {o}");
    }

    #[test]
    fn eccentricity_uses_extremal_spans() {
        // Extremal x points (0,0) and (4,0); extremal y points (2,-1) and (2,1).
        let pts = vec![vector![0.0, 0.0], vector![2.0, -1.0], vector![4.0, 0.0], vector![2.0, 1.0]];
        let e = eccentricity(&pts).unwrap();
        let (a, b) = (2.0f64, 1.0f64);
        assert!((e - (a * a - b * b).sqrt() / a).abs() < 1e-12);
        // Same result whichever axis is longer.
        let swapped: Vec<_> = pts.iter().map(|p| vector![p.y, p.x]).collect();
        assert!((eccentricity(&swapped).unwrap() - e).abs() < 1e-12);
    }

    #[test]
    fn eccentricity_degenerate_inputs() {
        assert!(matches!(
            eccentricity(&[]),
            Err(MatchError::DegenerateGeometry { op: "eccentricity", .. })
        ));
        let point = vec![vector![1.0, 1.0]; 3];
        assert!(eccentricity(&point).is_err());
    }

    #[test]
    fn as_array_follows_feature_names() {
        let f = ShapeFeatures {
            eccentricity: 1.0,
            compactness: 2.0,
            convexity: 3.0,
            solidity: 4.0,
            orientation: 5.0,
        };
        assert_eq!(f.as_array(), [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(FEATURE_NAMES[4], "orientation");
    }

    #[test]
    fn lat_lon_scale_square_features() {
        let (x0, y0, d) = (-111.9312345, 33.4212345, 1e-5);
        let sq = Polygon2::from_xy(&[(x0, y0), (x0 + d, y0), (x0 + d, y0 + d), (x0, y0 + d)]).unwrap();
        assert!((sq.area() - 1e-10).abs() < 1e-16);
        assert!((compactness(&sq).unwrap() - PI / 4.0).abs() < 1e-6);
        assert!((solidity(&sq).unwrap() - 1.0).abs() < 1e-6);
        assert!((convexity(&sq).unwrap() - 1.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn scale_free_features_ignore_translation(dx in -1e3f64..1e3, dy in -1e3f64..1e3, s in 0.1f64..10.0) {
            let base = Polygon2::from_xy(&[(0.0, 0.0), (3.0, 0.5), (2.5, 2.0), (1.0, 1.2), (0.2, 2.4)]).unwrap();
            let moved = base
                .map_affine(&(Matrix2::identity() * s), &vector![dx, dy])
                .unwrap();
            let f0 = ShapeFeatures::extract(&base).unwrap();
            let f1 = ShapeFeatures::extract(&moved).unwrap();
            prop_assert!((f0.compactness - f1.compactness).abs() < 1e-9);
            prop_assert!((f0.convexity - f1.convexity).abs() < 1e-9);
            prop_assert!((f0.solidity - f1.solidity).abs() < 1e-9);
            prop_assert!((f0.eccentricity - f1.eccentricity).abs() < 1e-9);
            prop_assert!((f0.orientation - f1.orientation).abs() < 1e-6);
        }
    }
}
