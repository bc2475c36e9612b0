//! Convex hull by Andrew's monotone chain.
//!
//! Points are sorted lexicographically and merged when closer than `DEDUP_EPS`.
//! The hull comes back counter-clockwise, starting at the lexicographically
//! smallest point, with collinear boundary points dropped.

use std::cmp::Ordering;

use nalgebra::Vector2;

use super::DEDUP_EPS;
use crate::error::{MatchError, Result};

/// Sort by x, then y (NaN-tolerant; callers reject non-finite input earlier).
pub(crate) fn sort_lexicographic(pts: &mut [Vector2<f64>]) {
    pts.sort_by(|a, b| match a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal),
        o => o,
    });
}

/// Andrew’s monotone chain convex hull (CCW, collinear points dropped).
///
/// Fails when the hull has fewer than 3 vertices (all points collinear or coincident).
pub(crate) fn convex_hull(points: &[Vector2<f64>]) -> Result<Vec<Vector2<f64>>> {
    let mut pts: Vec<_> = points.to_vec();
    sort_lexicographic(&mut pts);
    pts.dedup_by(|a, b| (*a - *b).norm() < DEDUP_EPS);
    if pts.len() < 3 {
        return Err(MatchError::degenerate(
            "convex_hull",
            "fewer than 3 distinct points",
        ));
    }
    let mut lower: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    if hull.len() < 3 {
        return Err(MatchError::degenerate("convex_hull", "collinear points"));
    }
    Ok(hull)
}

#[inline]
pub(crate) fn cross(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}
