//! Cross-survey matching on top of the descriptors and the scorer.
//!
//! - `nearest_matches`: for each frame-1 feature vector, the frame-2 index with the
//!   lowest score (first index on ties). Pairs that fail to score are skipped.
//! - `check_matches`: compare against the identity correspondence of synthetic surveys.
//! - `match_segments`: centroid-to-centroid segments for plotting.

use std::fmt;

use crate::descriptors::ShapeFeatures;
use crate::error::Result;
use crate::geom2::{Segment2, Shape2};
use crate::tsss::{self, AngleConvention};

/// Dissimilarity used to rank candidates; lower is closer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    #[default]
    TsSs,
    Euclidean,
    /// `1 − cosine`.
    Cosine,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::TsSs => "ts_ss",
            Metric::Euclidean => "euclidean",
            Metric::Cosine => "cosine",
        }
    }

    pub fn score(self, v1: &[f64], v2: &[f64], angles: AngleConvention) -> Result<f64> {
        match self {
            Metric::TsSs => tsss::ts_ss_with(v1, v2, angles),
            Metric::Euclidean => tsss::euclidean(v1, v2),
            Metric::Cosine => tsss::cosine(v1, v2).map(|c| 1.0 - c),
        }
    }
}

/// Matching configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchCfg {
    pub metric: Metric,
    pub angles: AngleConvention,
}

/// Best frame-2 candidate for one frame-1 polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    pub index: usize,
    pub score: f64,
}

/// Features for every polygon of a frame, failures kept in place.
pub fn extract_frame<S: Shape2>(polys: &[S]) -> Vec<Result<ShapeFeatures>> {
    polys.iter().map(|p| ShapeFeatures::extract(p)).collect()
}

/// Lowest-scoring frame-2 candidate per frame-1 feature vector.
///
/// `None` when every candidate failed to score or scored NaN.
pub fn nearest_matches(
    frame1: &[ShapeFeatures],
    frame2: &[ShapeFeatures],
    cfg: MatchCfg,
) -> Vec<Option<Match>> {
    frame1
        .iter()
        .enumerate()
        .map(|(i, f1)| best_candidate(i, f1, frame2.iter().enumerate(), cfg))
        .collect()
}

/// Extract features for both frames, then match. Polygons whose features fail never match
/// and are never matched.
pub fn match_polygons<S: Shape2>(frame1: &[S], frame2: &[S], cfg: MatchCfg) -> Vec<Option<Match>> {
    let f1 = extract_frame(frame1);
    let f2 = extract_frame(frame2);
    for (frame, feats) in [(1, &f1), (2, &f2)] {
        for (i, r) in feats.iter().enumerate() {
            if let Err(e) = r {
                tracing::debug!(frame, polygon = i, error = %e, "features_failed");
            }
        }
    }
    let candidates: Vec<(usize, &ShapeFeatures)> = f2
        .iter()
        .enumerate()
        .filter_map(|(j, r)| r.as_ref().ok().map(|f| (j, f)))
        .collect();
    f1.iter()
        .enumerate()
        .map(|(i, r)| {
            let f = r.as_ref().ok()?;
            best_candidate(i, f, candidates.iter().copied(), cfg)
        })
        .collect()
}

fn best_candidate<'a>(
    i: usize,
    f1: &ShapeFeatures,
    candidates: impl Iterator<Item = (usize, &'a ShapeFeatures)>,
    cfg: MatchCfg,
) -> Option<Match> {
    let v1 = f1.as_array();
    let mut best: Option<Match> = None;
    for (j, f2) in candidates {
        let score = match cfg.metric.score(&v1, &f2.as_array(), cfg.angles) {
            Ok(s) if !s.is_nan() => s,
            Ok(_) => {
                tracing::debug!(i, j, metric = cfg.metric.name(), "score_nan");
                continue;
            }
            Err(e) => {
                tracing::debug!(i, j, metric = cfg.metric.name(), error = %e, "score_failed");
                continue;
            }
        };
        if best.as_ref().is_none_or(|b| score < b.score) {
            best = Some(Match { index: j, score });
        }
    }
    best
}

/// Outcome of checking matches against the identity correspondence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub frame1_len: usize,
    pub frame2_len: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub unmatched: usize,
}

impl MatchReport {
    /// Fraction of frame-1 polygons matched to their own index; 0 for an empty frame.
    pub fn accuracy(&self) -> f64 {
        if self.frame1_len == 0 {
            0.0
        } else {
            self.correct as f64 / self.frame1_len as f64
        }
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of rocks in frame 1: {}", self.frame1_len)?;
        writeln!(f, "Number of rocks in frame 2: {}", self.frame2_len)?;
        writeln!(f, "Correct matches: {}", self.correct)?;
        writeln!(f, "Incorrect matches: {}", self.incorrect)?;
        write!(f, "Unmatched: {}", self.unmatched)
    }
}

/// Count matches where frame-1 polygon `i` picked frame-2 polygon `i`.
///
/// Only meaningful for synthetic surveys that keep rock order across frames.
pub fn check_matches(matches: &[Option<Match>], frame2_len: usize) -> MatchReport {
    let mut report = MatchReport {
        frame1_len: matches.len(),
        frame2_len,
        ..MatchReport::default()
    };
    for (i, m) in matches.iter().enumerate() {
        match m {
            Some(m) if m.index == i => report.correct += 1,
            Some(_) => report.incorrect += 1,
            None => report.unmatched += 1,
        }
    }
    report
}

/// Segment from each frame-1 centroid to the centroid of its matched frame-2 polygon.
pub fn match_segments<S: Shape2>(
    frame1: &[S],
    frame2: &[S],
    matches: &[Option<Match>],
) -> Result<Vec<Option<Segment2>>> {
    frame1
        .iter()
        .zip(matches)
        .map(|(p, m)| match m.and_then(|m| frame2.get(m.index)) {
            Some(q) => Ok(Some(Segment2::new(p.centroid()?, q.centroid()?))),
            None => Ok(None),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;
    use crate::geom2::Polygon2;
    use nalgebra::vector;

    fn feats(e: f64, c: f64, o: f64) -> ShapeFeatures {
        ShapeFeatures {
            eccentricity: e,
            compactness: c,
            convexity: 0.95,
            solidity: 0.9,
            orientation: o,
        }
    }

    #[test]
    fn picks_lowest_score() {
        let f1 = vec![feats(0.2, 0.7, 10.0), feats(0.8, 0.4, -60.0)];
        let f2 = vec![feats(0.81, 0.41, -59.0), feats(0.21, 0.69, 11.0)];
        for metric in [Metric::TsSs, Metric::Euclidean] {
            let cfg = MatchCfg {
                metric,
                ..MatchCfg::default()
            };
            let m = nearest_matches(&f1, &f2, cfg);
            assert_eq!(m[0].unwrap().index, 1, "{metric:?}");
            assert_eq!(m[1].unwrap().index, 0, "{metric:?}");
        }
    }

    #[test]
    fn ties_go_to_first_index() {
        let f1 = vec![feats(0.5, 0.5, 5.0)];
        let f2 = vec![feats(0.5, 0.5, 5.0), feats(0.5, 0.5, 5.0)];
        let m = nearest_matches(&f1, &f2, MatchCfg::default());
        assert_eq!(m[0], Some(Match { index: 0, score: 0.0 }));
    }

    #[test]
    fn failing_pairs_are_skipped() {
        let zero = ShapeFeatures {
            eccentricity: 0.0,
            compactness: 0.0,
            convexity: 0.0,
            solidity: 0.0,
            orientation: 0.0,
        };
        let f1 = vec![zero, feats(0.3, 0.6, 20.0)];
        let f2 = vec![zero, feats(0.3, 0.6, 21.0)];
        let m = nearest_matches(&f1, &f2, MatchCfg::default());
        assert_eq!(m[0], None);
        assert_eq!(m[1].unwrap().index, 1);
        assert!(nearest_matches(&f1, &[], MatchCfg::default())
            .iter()
            .all(Option::is_none));
    }

    #[test]
    fn cosine_metric_is_one_minus_cosine() {
        let s = Metric::Cosine
            .score(&[1.0, 0.0], &[0.0, 1.0], AngleConvention::Literal)
            .unwrap();
        assert!((s - 1.0).abs() < 1e-12);
        assert!(matches!(
            Metric::Euclidean.score(&[1.0], &[1.0, 2.0], AngleConvention::Literal),
            Err(MatchError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn report_counts() {
        let m = vec![
            Some(Match { index: 0, score: 0.0 }),
            Some(Match { index: 0, score: 1.0 }),
            None,
            Some(Match { index: 3, score: 0.5 }),
        ];
        let r = check_matches(&m, 5);
        assert_eq!(
            r,
            MatchReport {
                frame1_len: 4,
                frame2_len: 5,
                correct: 2,
                incorrect: 1,
                unmatched: 1
            }
        );
        assert!((r.accuracy() - 0.5).abs() < 1e-12);
        assert!(r.to_string().contains("Correct matches: 2"));
        assert_eq!(check_matches(&[], 0).accuracy(), 0.0);
    }

    #[test]
    fn polygons_match_their_shifted_copies() {
        let tri = Polygon2::from_xy(&[(0.0, 0.0), (4.0, 0.0), (1.0, 1.0)]).unwrap();
        let sq = Polygon2::from_xy(&[(10.0, 0.0), (11.0, 0.0), (11.0, 1.0), (10.0, 1.0)]).unwrap();
        let line = Polygon2::from_xy(&[(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)]).unwrap();
        let shift = vector![0.5, 0.25];
        let id = nalgebra::Matrix2::identity();
        let frame1 = vec![tri.clone(), sq.clone(), line];
        let frame2 = vec![sq.map_affine(&id, &shift).unwrap(), tri.map_affine(&id, &shift).unwrap()];
        let m = match_polygons(&frame1, &frame2, MatchCfg::default());
        assert_eq!(m[0].unwrap().index, 1);
        assert_eq!(m[1].unwrap().index, 0);
        assert_eq!(m[2], None);

        let segs = match_segments(&frame1[..2], &frame2, &m[..2]).unwrap();
        let s = segs[1].unwrap();
        assert!((s.a - vector![10.5, 0.5]).norm() < 1e-12);
        assert!((s.b - s.a - shift).norm() < 1e-12);
    }
}
