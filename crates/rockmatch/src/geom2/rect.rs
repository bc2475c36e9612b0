//! Minimum-area enclosing rectangle of a convex hull.
//!
//! One candidate per hull edge: the rectangle aligned with that edge's direction `u`
//! and its left normal `v`. The smallest area wins; the first hull edge wins ties.

use nalgebra::Vector2;

use crate::error::{MatchError, Result};

/// Corners of the minimum-area rectangle around a CCW hull.
///
/// Corner order: `(min_u, min_v) → (max_u, min_v) → (max_u, max_v) → (min_u, max_v)`.
/// Projections are taken relative to the first hull vertex.
pub(crate) fn min_area_rect(hull: &[Vector2<f64>]) -> Result<Vec<Vector2<f64>>> {
    let n = hull.len();
    let o = match hull.first() {
        Some(o) => *o,
        None => return Err(MatchError::degenerate("minimum_rotated_rectangle", "empty hull")),
    };
    let mut best: Option<(f64, [Vector2<f64>; 4])> = None;
    for k in 0..n {
        let edge = hull[(k + 1) % n] - hull[k];
        let len = edge.norm();
        if !(len.is_finite()) || len <= 0.0 {
            continue;
        }
        let u = edge / len;
        let v = Vector2::new(-u.y, u.x);
        let (mut lo_u, mut hi_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut lo_v, mut hi_v) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in hull {
            let d = p - o;
            let pu = u.dot(&d);
            let pv = v.dot(&d);
            lo_u = lo_u.min(pu);
            hi_u = hi_u.max(pu);
            lo_v = lo_v.min(pv);
            hi_v = hi_v.max(pv);
        }
        let area = (hi_u - lo_u) * (hi_v - lo_v);
        if best.as_ref().is_none_or(|(a, _)| area < *a) {
            let corners = [
                o + u * lo_u + v * lo_v,
                o + u * hi_u + v * lo_v,
                o + u * hi_u + v * hi_v,
                o + u * lo_u + v * hi_v,
            ];
            best = Some((area, corners));
        }
    }
    match best {
        Some((area, corners)) if area > 0.0 => Ok(corners.to_vec()),
        _ => Err(MatchError::degenerate(
            "minimum_rotated_rectangle",
            "zero-area hull",
        )),
    }
}
