//! Detail record output.

use crate::{options::Format, staged::Staged};
use anyhow::{anyhow, Result};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use horizon::DetailRecord;
use std::{fs, io::Write, path::Path};

/// Writes `records` to a temporary file that replaces `out` once
/// committed.
pub fn stage(records: &[DetailRecord], format: Format, out: &Path) -> Result<Staged> {
    Staged::write(out, |wtr| match format {
        Format::Geojson => write_geojson(records, wtr),
        Format::Csv => write_csv(records, wtr),
    })
}

/// Copies the node spatial reference next to `out`, so the output
/// carries the node dataset's projection.
pub fn copy_prj(node_prj: &Path, out: &Path) -> Result<()> {
    let out_prj = out.with_extension("prj");
    if out_prj != node_prj {
        fs::copy(node_prj, out_prj)?;
    }
    Ok(())
}

fn write_geojson(records: &[DetailRecord], mut out: impl Write) -> Result<()> {
    let features = records
        .iter()
        .map(|record| {
            let properties = match serde_json::to_value(record)? {
                serde_json::Value::Object(properties) => properties,
                _ => return Err(anyhow!("detail record is not an object")),
            };
            Ok(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![record.x, record.y]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<Feature>>>()?;
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    serde_json::to_writer(&mut out, &collection)?;
    Ok(())
}

fn write_csv(records: &[DetailRecord], mut out: impl Write) -> Result<()> {
    writeln!(out, "{}", DetailRecord::FIELDS.join(","))?;
    for DetailRecord {
        node_id,
        azimuth,
        angle_deg,
        peak_elevation_m,
        node_elevation_m,
        elevation_change_m,
        peak_distance_m,
        search_distance_m,
        off_raster,
        x,
        y,
    } in records
    {
        writeln!(
            out,
            "{node_id},{azimuth},{angle_deg},{peak_elevation_m},{node_elevation_m},{elevation_change_m},{peak_distance_m},{search_distance_m},{off_raster},{x},{y}"
        )?;
    }
    Ok(())
}
