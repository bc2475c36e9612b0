//! Match a synthetic survey pair and print the report.
//!
//! Usage:
//!   cargo run -p rockmatch --example synthetic_match -- [count] [seed]

use rockmatch::prelude::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let count: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(20);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2023);
    let (f1, f2) = match draw_survey_pair(count, RockCfg::default(), ResurveyCfg::default(), seed, 8.0)
    {
        Ok(frames) => frames,
        Err(e) => {
            eprintln!("synthetic survey failed: {e}");
            return;
        }
    };
    for metric in [Metric::TsSs, Metric::Euclidean, Metric::Cosine] {
        let cfg = MatchCfg {
            metric,
            ..MatchCfg::default()
        };
        let report = check_matches(&match_polygons(&f1, &f2, cfg), f2.len());
        println!("Similarity measure used: {}\n{report}\n", metric.name());
    }
}
