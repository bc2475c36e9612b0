//! 2D polygon geometry for rock outlines.
//!
//! Purpose
//! - Provide a validated polygon ring (`Polygon2`) and the handful of operations
//!   the shape descriptors need: area, perimeter, convex hull, minimum rotated
//!   rectangle, centroid.
//! - Keep the descriptors independent of a concrete geometry type via `Shape2`.
//!
//! Conventions
//! - Points are `nalgebra::Vector2<f64>`; first coordinate is x (or latitude).
//! - Hulls are CCW with collinear points removed.
//! - Near-duplicate points closer than `DEDUP_EPS` are merged before hulling.

mod hull;
pub mod rand;
mod rect;
mod types;

pub use types::{Polygon2, Segment2, Shape2};

/// Distance under which two points count as the same vertex.
pub const DEDUP_EPS: f64 = 1e-12;
