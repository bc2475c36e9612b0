//! Synthetic rock surveys (radial jitter + replay tokens).
//!
//! Purpose
//! - Produce reproducible pairs of "before/after" rock fields where the true
//!   correspondence is known: rock `i` in frame 1 is rock `i` in frame 2.
//!
//! Model
//! - A rock is a star-shaped ring: `n` jittered angles around the centre, each
//!   with a jittered radius. The ring is not hulled, so rocks can be non-convex.
//! - The second survey moves each rock rigidly about its centroid (drift and
//!   rotation) and perturbs every vertex by a bounded amount.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::{Matrix2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Polygon2, Shape2};
use crate::error::Result;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Rock outline sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RockCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `r * (1 + u)`, `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    /// Base radius drawn uniformly from `[radius_min, radius_max]`.
    pub radius_min: f64,
    pub radius_max: f64,
    /// Stretch along a random axis, drawn from `[1, elongation_max]`.
    pub elongation_max: f64,
}

impl Default for RockCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Uniform { min: 8, max: 16 },
            angle_jitter_frac: 0.3,
            radial_jitter: 0.3,
            radius_min: 0.5,
            radius_max: 1.5,
            elongation_max: 2.5,
        }
    }
}

/// How a rock changes between the two surveys.
#[derive(Clone, Copy, Debug)]
pub struct ResurveyCfg {
    /// Max translation per axis.
    pub drift: f64,
    /// Max rotation about the centroid, degrees.
    pub rotation_deg: f64,
    /// Max per-vertex perturbation per axis, relative to the rock's mean radius.
    pub vertex_jitter: f64,
}

impl Default for ResurveyCfg {
    fn default() -> Self {
        Self {
            drift: 0.2,
            rotation_deg: 2.0,
            vertex_jitter: 0.01,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }

    /// Token for the second survey of the same rock.
    #[inline]
    fn resurvey(self) -> Self {
        Self {
            seed: self.seed.rotate_left(17) ^ 0x5eed,
            index: self.index,
        }
    }
}

#[inline]
fn symmetric<R: Rng>(rng: &mut R, amp: f64) -> f64 {
    (rng.gen::<f64>() * 2.0 - 1.0) * amp
}

#[inline]
fn rotation(theta: f64) -> Matrix2<f64> {
    Matrix2::new(theta.cos(), -theta.sin(), theta.sin(), theta.cos())
}

/// Draw one rock outline centred at the origin.
pub fn draw_rock(cfg: RockCfg, tok: ReplayToken) -> Result<Polygon2> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r_lo = cfg.radius_min.max(1e-9);
    let r_hi = cfg.radius_max.max(r_lo);
    let r0 = rng.gen_range(r_lo..=r_hi);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = rng.gen::<f64>() * std::f64::consts::TAU;
    let mut angles: Vec<f64> = (0..n)
        .map(|k| phase + (k as f64) * delta + symmetric(&mut rng, aj * delta))
        .collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let ring: Vec<Vector2<f64>> = angles
        .into_iter()
        .map(|th| {
            let r = (1.0 + symmetric(&mut rng, rj)) * r0;
            Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    // Stretch along a random axis: R diag(s, 1) Rᵀ.
    let s = rng.gen_range(1.0..=cfg.elongation_max.max(1.0));
    let axis = rotation(rng.gen::<f64>() * std::f64::consts::PI);
    let stretch = axis * Matrix2::new(s, 0.0, 0.0, 1.0) * axis.transpose();
    Polygon2::new(ring.into_iter().map(|p| stretch * p).collect())
}

/// Second-survey observation of `poly`: rigid motion about its centroid plus vertex noise.
pub fn resurvey(poly: &Polygon2, cfg: ResurveyCfg, tok: ReplayToken) -> Result<Polygon2> {
    let mut rng = tok.resurvey().to_std_rng();
    let c = poly.centroid()?;
    let mean_r = poly.vertices().iter().map(|p| (p - c).norm()).sum::<f64>()
        / poly.len() as f64;
    let rot = rotation(symmetric(&mut rng, cfg.rotation_deg.abs()).to_radians());
    let shift = Vector2::new(
        symmetric(&mut rng, cfg.drift.abs()),
        symmetric(&mut rng, cfg.drift.abs()),
    );
    let amp = cfg.vertex_jitter.abs() * mean_r;
    let moved = poly
        .vertices()
        .iter()
        .map(|p| {
            let noise = Vector2::new(symmetric(&mut rng, amp), symmetric(&mut rng, amp));
            rot * (p - c) + c + shift + noise
        })
        .collect();
    Polygon2::new(moved)
}

/// Draw `count` rocks on a square grid with cell size `spacing`, and their resurvey.
///
/// Both frames share ordering, so the correct match of frame-1 rock `i` is frame-2 rock `i`.
pub fn draw_survey_pair(
    count: usize,
    rock: RockCfg,
    change: ResurveyCfg,
    seed: u64,
    spacing: f64,
) -> Result<(Vec<Polygon2>, Vec<Polygon2>)> {
    let side = (count as f64).sqrt().ceil().max(1.0) as usize;
    let mut before = Vec::with_capacity(count);
    let mut after = Vec::with_capacity(count);
    for i in 0..count {
        let tok = ReplayToken {
            seed,
            index: i as u64,
        };
        let offset = Vector2::new((i % side) as f64, (i / side) as f64) * spacing;
        let base = draw_rock(rock, tok)?.map_affine(&Matrix2::identity(), &offset)?;
        let moved = resurvey(&base, change, tok)?;
        before.push(base);
        after.push(moved);
    }
    Ok((before, after))
}
