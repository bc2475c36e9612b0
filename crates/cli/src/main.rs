use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rockmatch::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "rockmatch")]
#[command(about = "Match rock outlines between two surveys")]
struct Cmd {
    /// Log at debug level (skipped pairs, failed polygons)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Write a synthetic survey pair (frame1.csv, frame2.csv) with known correspondence
    Synth {
        #[arg(long, default_value_t = 50)]
        count: usize,
        #[arg(long, default_value_t = 2023)]
        seed: u64,
        /// Grid cell size between rock centres
        #[arg(long, default_value_t = 8.0)]
        spacing: f64,
        /// Max rotation between surveys, degrees
        #[arg(long, default_value_t = 2.0)]
        rotation: f64,
        /// Per-vertex noise relative to rock radius
        #[arg(long, default_value_t = 0.01)]
        jitter: f64,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Extract shape descriptors for every polygon of a frame
    Features {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Match every frame-1 polygon to its most similar frame-2 polygon
    Match {
        #[arg(long)]
        frame1: PathBuf,
        #[arg(long)]
        frame2: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = MetricArg::TsSs)]
        metric: MetricArg,
        /// Use radians throughout TS-SS instead of the historical double conversion
        #[arg(long)]
        consistent_angles: bool,
        /// Report accuracy assuming polygon i in frame 1 is polygon i in frame 2
        #[arg(long)]
        check: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetricArg {
    TsSs,
    Euclidean,
    Cosine,
}

impl From<MetricArg> for Metric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::TsSs => Metric::TsSs,
            MetricArg::Euclidean => Metric::Euclidean,
            MetricArg::Cosine => Metric::Cosine,
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Synth {
            count,
            seed,
            spacing,
            rotation,
            jitter,
            out_dir,
        } => {
            let change = ResurveyCfg {
                rotation_deg: rotation,
                vertex_jitter: jitter,
                ..ResurveyCfg::default()
            };
            synth(count, seed, spacing, change, &out_dir)
        }
        Action::Features { input, out } => features(&input, &out),
        Action::Match {
            frame1,
            frame2,
            out,
            metric,
            consistent_angles,
            check,
        } => {
            let cfg = MatchCfg {
                metric: metric.into(),
                angles: if consistent_angles {
                    AngleConvention::Consistent
                } else {
                    AngleConvention::Literal
                },
            };
            run_match(&frame1, &frame2, &out, cfg, check)
        }
    }
}

fn synth(count: usize, seed: u64, spacing: f64, change: ResurveyCfg, out_dir: &Path) -> Result<()> {
    tracing::info!(count, seed, spacing, out_dir = %out_dir.display(), "synth");
    let (before, after) = draw_survey_pair(count, RockCfg::default(), change, seed, spacing)
        .context("drawing synthetic survey")?;
    let params = serde_json::json!({
        "count": count,
        "seed": seed,
        "spacing": spacing,
        "rotation_deg": change.rotation_deg,
        "vertex_jitter": change.vertex_jitter,
        "drift": change.drift,
    });
    for (name, frame) in [("frame1.csv", &before), ("frame2.csv", &after)] {
        let path = out_dir.join(name);
        io::write_frame(&path, frame)?;
        provenance::write_sidecar(&path, params.clone())?;
    }
    Ok(())
}

#[derive(Serialize)]
struct FeatureRow {
    polygon_id: i64,
    #[serde(flatten)]
    features: Option<FeatureFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct FeatureFields {
    eccentricity: f64,
    compactness: f64,
    convexity: f64,
    solidity: f64,
    orientation: f64,
}

impl From<ShapeFeatures> for FeatureFields {
    fn from(f: ShapeFeatures) -> Self {
        Self {
            eccentricity: f.eccentricity,
            compactness: f.compactness,
            convexity: f.convexity,
            solidity: f.solidity,
            orientation: f.orientation,
        }
    }
}

fn features(input: &Path, out: &Path) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), "features");
    let frame = io::read_frame(input)?;
    let rows: Vec<FeatureRow> = frame
        .ids
        .iter()
        .zip(extract_frame(&frame.polygons))
        .map(|(&polygon_id, r)| match r {
            Ok(f) => FeatureRow {
                polygon_id,
                features: Some(f.into()),
                error: None,
            },
            Err(e) => {
                tracing::warn!(polygon_id, error = %e, "features_failed");
                FeatureRow {
                    polygon_id,
                    features: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();
    write_json(out, &rows)?;
    provenance::write_sidecar(out, serde_json::json!({ "input": input }))?;
    Ok(())
}

#[derive(Serialize)]
struct MatchRow {
    polygon_id: i64,
    matched_polygon_id: Option<i64>,
    score: Option<f64>,
    /// Centroid in frame 1 and centroid of the matched polygon in frame 2.
    segment: Option<[[f64; 2]; 2]>,
}

fn run_match(frame1: &Path, frame2: &Path, out: &Path, cfg: MatchCfg, check: bool) -> Result<()> {
    tracing::info!(
        frame1 = %frame1.display(),
        frame2 = %frame2.display(),
        metric = cfg.metric.name(),
        angles = ?cfg.angles,
        "match"
    );
    let f1 = io::read_frame(frame1)?;
    let f2 = io::read_frame(frame2)?;
    let matches = match_polygons(&f1.polygons, &f2.polygons, cfg);
    let segments = match_segments(&f1.polygons, &f2.polygons, &matches)
        .context("computing match segments")?;

    let rows: Vec<MatchRow> = f1
        .ids
        .iter()
        .zip(&matches)
        .zip(&segments)
        .map(|((&polygon_id, m), seg)| MatchRow {
            polygon_id,
            matched_polygon_id: m.map(|m| f2.ids[m.index]),
            score: m.map(|m| m.score),
            segment: seg.map(|s| [[s.a.x, s.a.y], [s.b.x, s.b.y]]),
        })
        .collect();
    let unmatched = rows.iter().filter(|r| r.matched_polygon_id.is_none()).count();
    tracing::info!(polygons = rows.len(), unmatched, "matched");
    write_json(out, &rows)?;

    let mut params = serde_json::json!({
        "frame1": frame1,
        "frame2": frame2,
        "metric": cfg.metric.name(),
        "angles": format!("{:?}", cfg.angles),
    });
    if check {
        let report = check_matches(&matches, f2.polygons.len());
        tracing::info!(
            correct = report.correct,
            incorrect = report.incorrect,
            unmatched = report.unmatched,
            accuracy = report.accuracy(),
            "check"
        );
        println!("Similarity measure used: {}\n{report}", cfg.metric.name());
        params["check"] = serde_json::json!({
            "correct": report.correct,
            "incorrect": report.incorrect,
            "unmatched": report.unmatched,
        });
    }
    provenance::write_sidecar(out, params)?;
    Ok(())
}

fn write_json<T: Serialize>(out: &Path, value: &T) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))
}
