//! Polygon rings, segments and the `Shape2` capability trait.
//!
//! - `Polygon2`: closed ring of vertices (closing vertex implicit).
//! - `Segment2`: directed segment; used for rectangle edges and match lines.
//! - `Shape2`: what descriptors need from a geometry (area, perimeter, hull,
//!   minimum rotated rectangle, centroid).

use nalgebra::Vector2;

use super::{hull, rect, DEDUP_EPS};
use crate::error::{MatchError, Result};

/// Geometry capabilities required by the shape descriptors.
pub trait Shape2 {
    /// Boundary vertices in ring order, without the closing repeat.
    fn vertices(&self) -> &[Vector2<f64>];
    /// Unsigned enclosed area.
    fn area(&self) -> f64;
    /// Boundary length of the closed ring.
    fn perimeter(&self) -> f64;
    fn convex_hull(&self) -> Result<Polygon2>;
    fn minimum_rotated_rectangle(&self) -> Result<Polygon2>;
    /// Area-weighted centroid.
    fn centroid(&self) -> Result<Vector2<f64>>;
}

/// Closed polygon ring in the plane.
///
/// Invariants:
/// - At least 3 distinct vertices, all coordinates finite.
/// - No explicit closing vertex (dropped on construction).
/// - Orientation is whatever the caller supplied; self-intersection is not checked.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon2 {
    verts: Vec<Vector2<f64>>,
}

impl Polygon2 {
    /// Build from a ring, accepting an optional repeated closing vertex.
    pub fn new(mut verts: Vec<Vector2<f64>>) -> Result<Self> {
        const OP: &str = "polygon";
        if verts.len() > 1 && verts.first() == verts.last() {
            verts.pop();
        }
        if verts.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(MatchError::degenerate(OP, "non-finite coordinate"));
        }
        if distinct_count(&verts) < 3 {
            return Err(MatchError::degenerate(OP, "fewer than 3 distinct vertices"));
        }
        Ok(Self { verts })
    }

    /// Convenience constructor from `(x, y)` tuples.
    pub fn from_xy(points: &[(f64, f64)]) -> Result<Self> {
        Self::new(points.iter().map(|&(x, y)| Vector2::new(x, y)).collect())
    }

    /// Trusted construction for rings produced inside this module.
    #[inline]
    pub(crate) fn from_ring(verts: Vec<Vector2<f64>>) -> Self {
        Self { verts }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Boundary as consecutive edges, last edge closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = Segment2> + '_ {
        let n = self.verts.len();
        (0..n).map(move |k| Segment2::new(self.verts[k], self.verts[(k + 1) % n]))
    }

    /// Shoelace sum (twice the signed area, CCW positive).
    ///
    /// Coordinates are taken relative to the first vertex so that small rings far
    /// from the origin (lat/lon degrees) keep their precision.
    fn signed_area2(&self) -> f64 {
        let n = self.verts.len();
        let o = self.verts[0];
        let mut s = 0.0;
        for k in 0..n {
            let p = self.verts[k] - o;
            let q = self.verts[(k + 1) % n] - o;
            s += p.x * q.y - q.x * p.y;
        }
        s
    }

    /// Apply `x ↦ M x + t` to every vertex.
    pub fn map_affine(&self, m: &nalgebra::Matrix2<f64>, t: &Vector2<f64>) -> Result<Self> {
        Self::new(self.verts.iter().map(|p| m * p + t).collect())
    }
}

impl Shape2 for Polygon2 {
    #[inline]
    fn vertices(&self) -> &[Vector2<f64>] {
        &self.verts
    }

    fn area(&self) -> f64 {
        0.5 * self.signed_area2().abs()
    }

    fn perimeter(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }

    fn convex_hull(&self) -> Result<Polygon2> {
        hull::convex_hull(&self.verts).map(Polygon2::from_ring)
    }

    fn minimum_rotated_rectangle(&self) -> Result<Polygon2> {
        let hull = hull::convex_hull(&self.verts)?;
        rect::min_area_rect(&hull).map(Polygon2::from_ring)
    }

    fn centroid(&self) -> Result<Vector2<f64>> {
        let n = self.verts.len();
        let a2 = self.signed_area2();
        if a2.abs() < 1e-18 {
            return Err(MatchError::degenerate("centroid", "zero area"));
        }
        let o = self.verts[0];
        let mut c = Vector2::zeros();
        for k in 0..n {
            let p = self.verts[k] - o;
            let q = self.verts[(k + 1) % n] - o;
            let cross = p.x * q.y - q.x * p.y;
            c += (p + q) * cross;
        }
        Ok(o + c / (3.0 * a2))
    }
}

/// Directed segment `a → b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment2 {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
}

impl Segment2 {
    #[inline]
    pub fn new(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    /// Direction angle `atan2(dy, dx)` in degrees, range (-180, 180].
    #[inline]
    pub fn angle_deg(&self) -> f64 {
        let d = self.b - self.a;
        d.y.atan2(d.x).to_degrees()
    }
}

fn distinct_count(verts: &[Vector2<f64>]) -> usize {
    let mut pts = verts.to_vec();
    hull::sort_lexicographic(&mut pts);
    pts.dedup_by(|a, b| (*a - *b).norm() < DEDUP_EPS);
    pts.len()
}
