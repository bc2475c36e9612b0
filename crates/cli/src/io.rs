//! Polygon CSV input/output.
//!
//! Format: one row per vertex with columns `polygon_id,x,y`. Vertices of a
//! polygon appear in ring order; polygons keep the order in which their id
//! first appears, which is the frame index used by matching.

use anyhow::{bail, Context, Result};
use nalgebra::Vector2;
use polars::prelude::*;
use rockmatch::{Polygon2, Shape2};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Polygons of one survey frame with their source ids.
pub struct Frame {
    pub ids: Vec<i64>,
    pub polygons: Vec<Polygon2>,
}

/// Read a frame; any polygon that fails validation aborts the load.
pub fn read_frame(path: &Path) -> Result<Frame> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::info!(rows = df.height(), cols = df.width(), path = %path.display(), "frame_csv");

    let ids = df.column("polygon_id")?.cast(&DataType::Int64)?;
    let xs = df.column("x")?.cast(&DataType::Float64)?;
    let ys = df.column("y")?.cast(&DataType::Float64)?;

    let mut order: Vec<i64> = Vec::new();
    let mut rings: HashMap<i64, Vec<Vector2<f64>>> = HashMap::new();
    for (row, ((id, x), y)) in ids
        .i64()?
        .into_iter()
        .zip(xs.f64()?.into_iter())
        .zip(ys.f64()?.into_iter())
        .enumerate()
    {
        let (Some(id), Some(x), Some(y)) = (id, x, y) else {
            bail!("{}: row {row} has a missing value", path.display());
        };
        rings
            .entry(id)
            .or_insert_with(|| {
                order.push(id);
                Vec::new()
            })
            .push(Vector2::new(x, y));
    }

    let mut polygons = Vec::with_capacity(order.len());
    for id in &order {
        let ring = rings.remove(id).unwrap_or_default();
        let poly = Polygon2::new(ring)
            .with_context(|| format!("{}: polygon {id}", path.display()))?;
        polygons.push(poly);
    }
    Ok(Frame {
        ids: order,
        polygons,
    })
}

/// Write polygons as `polygon_id,x,y` rows, ids being frame indices.
pub fn write_frame(path: &Path, polygons: &[Polygon2]) -> Result<()> {
    let mut ids: Vec<i64> = Vec::new();
    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    for (i, poly) in polygons.iter().enumerate() {
        for p in poly.vertices() {
            ids.push(i as i64);
            xs.push(p.x);
            ys.push(p.y);
        }
    }
    let mut df = df!("polygon_id" => ids, "x" => xs, "y" => ys)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file).finish(&mut df)?;
    tracing::info!(polygons = polygons.len(), rows = df.height(), path = %path.display(), "frame_written");
    Ok(())
}
