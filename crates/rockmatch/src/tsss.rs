//! TS-SS vector similarity (triangle area × sector area).
//!
//! Purpose
//! - Score two equal-length feature vectors by combining the angle between
//!   them with their Euclidean distance and magnitude difference. Lower is
//!   more similar; identical vectors score 0.
//!
//! Angle handling
//! - `theta` is `acos(cos) + 10°` in radians. The triangle term then feeds
//!   that value through another degrees→radians conversion, and the sector
//!   term divides it by 360 as if it were degrees. Scores produced by existing
//!   match runs depend on this, so `AngleConvention::Literal` is the default.
//!   `AngleConvention::Consistent` uses radians throughout. Both live in
//!   `AngleConvention` and nowhere else.
//! - The cosine is rounded to `COSINE_DIGITS` decimals before `acos` so that
//!   floating-point overshoot past ±1 does not leave the domain.

use std::f64::consts::PI;

use crate::error::{MatchError, Result};

/// Decimal digits kept from the cosine before `acos`.
pub const COSINE_DIGITS: usize = 8;

/// Fixed angular offset added to every theta, degrees.
pub const THETA_OFFSET_DEG: f64 = 10.0;

/// How the triangle and sector terms interpret `theta`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AngleConvention {
    /// Triangle: `sin(radians(theta))`; sector: `theta / 360`.
    #[default]
    Literal,
    /// Triangle: `sin(theta)`; sector: `degrees(theta) / 360`.
    ///
    /// With the offset, theta exceeds π for nearly opposite vectors and the score turns negative.
    Consistent,
}

impl AngleConvention {
    /// Angle (radians) whose sine enters the triangle area.
    #[inline]
    pub fn triangle_angle(self, theta: f64) -> f64 {
        match self {
            AngleConvention::Literal => theta.to_radians(),
            AngleConvention::Consistent => theta,
        }
    }

    /// Angle (degrees) that sets the sector's share of the full circle.
    #[inline]
    pub fn sector_angle_deg(self, theta: f64) -> f64 {
        match self {
            AngleConvention::Literal => theta,
            AngleConvention::Consistent => theta.to_degrees(),
        }
    }
}

fn check_vec(op: &'static str, operand: u8, v: &[f64]) -> Result<()> {
    if v.is_empty() {
        return Err(MatchError::EmptyVector { op });
    }
    match v.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(MatchError::NonFinite { op, operand, index }),
        None => Ok(()),
    }
}

fn check_pair(op: &'static str, v1: &[f64], v2: &[f64]) -> Result<()> {
    if v1.len() != v2.len() {
        return Err(MatchError::DimensionMismatch {
            op,
            left: v1.len(),
            right: v2.len(),
        });
    }
    check_vec(op, 1, v1)?;
    check_vec(op, 2, v2)
}

/// Euclidean norm.
pub fn magnitude(v: &[f64]) -> Result<f64> {
    check_vec("magnitude", 1, v)?;
    Ok(norm(v))
}

/// `Σ v1_i · v2_i`.
pub fn inner_product(v1: &[f64], v2: &[f64]) -> Result<f64> {
    check_pair("inner_product", v1, v2)?;
    Ok(dot(v1, v2))
}

/// Cosine of the angle between `v1` and `v2`; fails on a zero vector.
pub fn cosine(v1: &[f64], v2: &[f64]) -> Result<f64> {
    check_pair("cosine", v1, v2)?;
    cosine_unchecked(v1, v2)
}

/// `acos(round(cosine, 8)) + radians(10)`.
pub fn theta(v1: &[f64], v2: &[f64]) -> Result<f64> {
    check_pair("theta", v1, v2)?;
    theta_unchecked(v1, v2)
}

/// `sqrt(Σ (v1_i − v2_i)²)`.
pub fn euclidean(v1: &[f64], v2: &[f64]) -> Result<f64> {
    check_pair("euclidean", v1, v2)?;
    Ok(dist(v1, v2))
}

/// `| |v1| − |v2| |`.
pub fn magnitude_difference(v1: &[f64], v2: &[f64]) -> Result<f64> {
    check_pair("magnitude_difference", v1, v2)?;
    Ok((norm(v1) - norm(v2)).abs())
}

/// Triangle term under the literal angle convention.
pub fn triangle_area(v1: &[f64], v2: &[f64]) -> Result<f64> {
    triangle_area_with(v1, v2, AngleConvention::Literal)
}

pub fn triangle_area_with(v1: &[f64], v2: &[f64], angles: AngleConvention) -> Result<f64> {
    check_pair("triangle_area", v1, v2)?;
    let th = theta_unchecked(v1, v2)?;
    Ok(triangle(v1, v2, th, angles))
}

/// Sector term under the literal angle convention.
pub fn sector_area(v1: &[f64], v2: &[f64]) -> Result<f64> {
    sector_area_with(v1, v2, AngleConvention::Literal)
}

pub fn sector_area_with(v1: &[f64], v2: &[f64], angles: AngleConvention) -> Result<f64> {
    check_pair("sector_area", v1, v2)?;
    let th = theta_unchecked(v1, v2)?;
    Ok(sector(v1, v2, th, angles))
}

/// TS-SS score: `triangle_area · sector_area`.
///
/// ```
/// use rockmatch::tsss::ts_ss;
///
/// let v = [0.4, 0.8, 0.9, 1.0, 12.0];
/// assert_eq!(ts_ss(&v, &v).unwrap(), 0.0);
/// assert!(ts_ss(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
/// ```
pub fn ts_ss(v1: &[f64], v2: &[f64]) -> Result<f64> {
    ts_ss_with(v1, v2, AngleConvention::Literal)
}

/// TS-SS score with an explicit angle convention.
pub fn ts_ss_with(v1: &[f64], v2: &[f64], angles: AngleConvention) -> Result<f64> {
    check_pair("ts_ss", v1, v2)?;
    // theta is computed once and shared by both terms.
    let th = theta_unchecked(v1, v2)?;
    Ok(triangle(v1, v2, th, angles) * sector(v1, v2, th, angles))
}

#[inline]
fn dot(v1: &[f64], v2: &[f64]) -> f64 {
    v1.iter().zip(v2).map(|(a, b)| a * b).sum()
}

#[inline]
fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[inline]
fn dist(v1: &[f64], v2: &[f64]) -> f64 {
    v1.iter()
        .zip(v2)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

fn cosine_unchecked(v1: &[f64], v2: &[f64]) -> Result<f64> {
    const OP: &str = "cosine";
    let n1 = norm(v1);
    if n1 == 0.0 {
        return Err(MatchError::degenerate(OP, "first vector has zero magnitude"));
    }
    let n2 = norm(v2);
    if n2 == 0.0 {
        return Err(MatchError::degenerate(OP, "second vector has zero magnitude"));
    }
    Ok(dot(v1, v2) / (n1 * n2))
}

/// Round to `digits` decimals by formatting, which rounds the exact binary value
/// (`(x * 10^d).round()` would round the already-rounded product instead).
fn round_digits(x: f64, digits: usize) -> Option<f64> {
    format!("{x:.digits$}").parse().ok()
}

/// Rounded cosine, or `DomainRange` if rounding leaves it outside [-1, 1].
fn clamp_checked(c: f64) -> Result<f64> {
    let out_of_range = |value| MatchError::DomainRange { op: "theta", value };
    let r = round_digits(c, COSINE_DIGITS).ok_or(out_of_range(c))?;
    if !(-1.0..=1.0).contains(&r) {
        return Err(out_of_range(r));
    }
    Ok(r)
}

fn theta_unchecked(v1: &[f64], v2: &[f64]) -> Result<f64> {
    let c = clamp_checked(cosine_unchecked(v1, v2)?)?;
    Ok(c.acos() + THETA_OFFSET_DEG.to_radians())
}

#[inline]
fn triangle(v1: &[f64], v2: &[f64], theta: f64, angles: AngleConvention) -> f64 {
    norm(v1) * norm(v2) * angles.triangle_angle(theta).sin() / 2.0
}

#[inline]
fn sector(v1: &[f64], v2: &[f64], theta: f64, angles: AngleConvention) -> f64 {
    let ed = dist(v1, v2);
    let md = (norm(v1) - norm(v2)).abs();
    PI * (ed + md).powi(2) * angles.sector_angle_deg(theta) / 360.0
}
