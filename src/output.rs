use anyhow::{Context, Result};
use gas_exchange_common::{GravityMode, Snapshot};
use log::{error, info};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::sweep::SweepRow;

/// Supported snapshot encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Bincode,
    MessagePack,
}

impl OutputFormat {
    /// Parses the configured format name. Unknown names fall back to JSON.
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            "bincode" => OutputFormat::Bincode,
            "messagepack" => OutputFormat::MessagePack,
            _ => {
                error!("Unknown output format: {}. Using JSON instead.", name);
                OutputFormat::Json
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Bincode => "bin",
            OutputFormat::MessagePack => "msgpack",
        }
    }
}

/// Writes all recorded snapshots to `<base>_snapshots.<ext>` and returns the path.
pub fn save_snapshots(base_filename: &str, format: OutputFormat, snapshots: &[Snapshot]) -> Result<String> {
    let filename = format!("{}_snapshots.{}", base_filename, format.extension());
    let file = File::create(&filename)
        .with_context(|| format!("Error creating snapshot file '{}'", filename))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut writer, snapshots)
                .context("Error serializing snapshots to JSON")?;
        }
        OutputFormat::Bincode => {
            bincode::serialize_into(&mut writer, snapshots)
                .context("Error serializing snapshots to bincode")?;
        }
        OutputFormat::MessagePack => {
            rmp_serde::encode::write(&mut writer, snapshots)
                .context("Error serializing snapshots to MessagePack")?;
        }
    }
    writer.flush()?;

    info!("{} snapshots saved to {} ({:?} format)", snapshots.len(), filename, format);
    Ok(filename)
}

#[derive(Serialize)]
struct SampleRow {
    time_s: f32,
    gravity_mode: GravityMode,
    co2_flux_sample: f32,
    o2_flux_sample: f32,
    co2_flux: f32,
    o2_flux: f32,
    boundary_layer_thickness: f32,
    temperature: f32,
    photosynthetic_efficiency: Option<f32>,
    stress_level: f32,
}

/// Writes the flux chart series alongside the underlying state to CSV.
pub fn save_samples_csv<P: AsRef<Path>>(path: P, snapshots: &[Snapshot]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    for snapshot in snapshots {
        let state = &snapshot.state;
        writer.serialize(SampleRow {
            time_s: snapshot.time_s,
            gravity_mode: state.gravity_mode,
            co2_flux_sample: snapshot.sample.co2_flux,
            o2_flux_sample: snapshot.sample.o2_flux,
            co2_flux: state.co2_flux,
            o2_flux: state.o2_flux,
            boundary_layer_thickness: state.boundary_layer_thickness,
            temperature: state.temperature,
            photosynthetic_efficiency: state.photosynthetic_efficiency,
            stress_level: state.stress_level,
        })?;
    }
    writer.flush()?;
    info!("Flux samples saved to {}", path.display());
    Ok(())
}

/// Writes the sweep response table to CSV.
pub fn save_sweep_csv<P: AsRef<Path>>(path: P, rows: &[SweepRow]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Sweep table ({} rows) saved to {}", rows.len(), path.display());
    Ok(())
}
