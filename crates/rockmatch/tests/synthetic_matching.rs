//! End-to-end: synthetic surveys → descriptors → matching → report.

use rockmatch::prelude::*;

fn rigid_only() -> ResurveyCfg {
    ResurveyCfg {
        drift: 0.5,
        rotation_deg: 0.0,
        vertex_jitter: 0.0,
    }
}

#[test]
fn translated_survey_matches_exactly() {
    let (f1, f2) = draw_survey_pair(25, RockCfg::default(), rigid_only(), 2024, 8.0).unwrap();
    for metric in [Metric::TsSs, Metric::Euclidean] {
        let cfg = MatchCfg {
            metric,
            ..MatchCfg::default()
        };
        let matches = match_polygons(&f1, &f2, cfg);
        let report = check_matches(&matches, f2.len());
        assert_eq!(report.correct, 25, "{metric:?}: {report}");
        assert_eq!(report.accuracy(), 1.0);
    }
}

#[test]
fn noisy_survey_mostly_matches() {
    let change = ResurveyCfg {
        drift: 0.3,
        rotation_deg: 0.0,
        vertex_jitter: 0.002,
    };
    let (f1, f2) = draw_survey_pair(16, RockCfg::default(), change, 7, 8.0).unwrap();
    let matches = match_polygons(&f1, &f2, MatchCfg::default());
    let report = check_matches(&matches, f2.len());
    assert_eq!(report.correct + report.incorrect + report.unmatched, 16);
    assert!(report.accuracy() >= 0.5, "{report}");
}

#[test]
fn features_line_up_with_names() {
    let (f1, _) = draw_survey_pair(4, RockCfg::default(), rigid_only(), 1, 8.0).unwrap();
    for feats in extract_frame(&f1) {
        let feats = feats.unwrap();
        let arr = feats.as_array();
        assert_eq!(arr.len(), FEATURE_NAMES.len());
        assert!(arr.iter().all(|x| x.is_finite()));
        assert!(feats.solidity > 0.0 && feats.solidity <= 1.0 + 1e-12);
        assert!(feats.compactness > 0.0 && feats.compactness < 1.0);
        assert!(feats.orientation > -180.0 && feats.orientation <= 180.0);
    }
}

#[test]
fn segments_follow_matches() {
    let (f1, f2) = draw_survey_pair(9, RockCfg::default(), rigid_only(), 5, 8.0).unwrap();
    let matches = match_polygons(&f1, &f2, MatchCfg::default());
    let segs = match_segments(&f1, &f2, &matches).unwrap();
    for seg in segs.into_iter().flatten() {
        // Drift is bounded by 0.5 per axis.
        assert!(seg.length() <= 0.5 * 2f64.sqrt() + 1e-9);
    }
}
