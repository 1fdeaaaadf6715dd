use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use gas_exchange_common::{GravityMode, Snapshot};
use log::{info, warn, LevelFilter};
use palette::{FromColor, Hsv, Srgb};
use plotters::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Command-line arguments for the visualizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input snapshot file path (.bin, .json or .msgpack)
    #[arg(short, long)]
    input: PathBuf,

    /// Output chart file path (.png)
    #[arg(short, long, default_value = "flux_chart.png")]
    output: PathBuf,

    /// Width of the chart in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Height of the chart in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
}

/// Snapshot file encodings, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Bincode,
    Json,
    MessagePack,
}

impl InputFormat {
    fn detect(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("bin") => Ok(InputFormat::Bincode),
            Some("json") => Ok(InputFormat::Json),
            Some("msgpack") => Ok(InputFormat::MessagePack),
            other => anyhow::bail!("Unrecognized snapshot file extension {:?} for {}", other, path.display()),
        }
    }
}

fn load_snapshots(path: &Path) -> Result<Vec<Snapshot>> {
    let format = InputFormat::detect(path)?;
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let snapshots: Vec<Snapshot> = match format {
        InputFormat::Bincode => bincode::deserialize_from(reader)
            .context("Failed to decode bincode snapshots")?,
        InputFormat::Json => serde_json::from_reader(reader)
            .context("Failed to decode JSON snapshots")?,
        InputFormat::MessagePack => rmp_serde::from_read(reader)
            .context("Failed to decode MessagePack snapshots")?,
    };
    Ok(snapshots)
}

/// Maps stress 0..100 onto a green-to-red hue.
fn stress_color(stress: f32) -> RGBColor {
    let level = (stress / 100.0).clamp(0.0, 1.0);
    let hsv: Hsv = Hsv::new(120.0 * (1.0 - level), 0.8, 0.9);
    let rgb: Srgb = Srgb::from_color(hsv);
    RGBColor(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Session times at which the gravity preset changed, with the new mode.
fn mode_changes(snapshots: &[Snapshot]) -> Vec<(f32, GravityMode)> {
    snapshots
        .windows(2)
        .filter(|w| w[0].state.gravity_mode != w[1].state.gravity_mode)
        .map(|w| (w[1].time_s, w[1].state.gravity_mode))
        .collect()
}

fn plot_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("Chart drawing failed: {}", e)
}

fn draw_chart(snapshots: &[Snapshot], output: &Path, width: u32, height: u32) -> Result<()> {
    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let (upper, lower) = root.split_vertically((height as f32 * 0.65) as u32);

    let t_max = snapshots.last().map_or(0.0, |s| s.time_s).max(1e-3);
    let interval = if snapshots.len() > 1 { snapshots[1].time_s - snapshots[0].time_s } else { t_max };
    let flux_max = snapshots
        .iter()
        .map(|s| s.sample.co2_flux.max(s.sample.o2_flux))
        .fold(0.0f32, f32::max)
        .max(1.0)
        * 1.1;

    // --- Flux panel ---
    let mut flux_chart = ChartBuilder::on(&upper)
        .caption("Leaf gas flux", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..t_max, 0f32..flux_max)
        .map_err(plot_err)?;
    flux_chart
        .configure_mesh()
        .x_desc("time (s)")
        .y_desc("flux")
        .draw()
        .map_err(plot_err)?;

    let co2_color = RGBColor(31, 119, 180);
    let o2_color = RGBColor(44, 160, 44);
    flux_chart
        .draw_series(LineSeries::new(snapshots.iter().map(|s| (s.time_s, s.sample.co2_flux)), co2_color.stroke_width(2)))
        .map_err(plot_err)?
        .label("CO2 influx")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], co2_color));
    flux_chart
        .draw_series(LineSeries::new(snapshots.iter().map(|s| (s.time_s, s.sample.o2_flux)), o2_color.stroke_width(2)))
        .map_err(plot_err)?
        .label("O2 efflux")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], o2_color));

    for (time_s, mode) in mode_changes(snapshots) {
        flux_chart
            .draw_series(LineSeries::new(vec![(time_s, 0.0), (time_s, flux_max)], BLACK.mix(0.4)))
            .map_err(plot_err)?;
        flux_chart
            .draw_series(std::iter::once(Text::new(mode.label(), (time_s, flux_max * 0.95), ("sans-serif", 14))))
            .map_err(plot_err)?;
    }
    flux_chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    // --- Stress panel ---
    let mut stress_chart = ChartBuilder::on(&lower)
        .caption("Stress level", ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..t_max, 0f32..100f32)
        .map_err(plot_err)?;
    stress_chart
        .configure_mesh()
        .x_desc("time (s)")
        .y_desc("stress")
        .draw()
        .map_err(plot_err)?;
    stress_chart
        .draw_series(snapshots.iter().map(|s| {
            let stress = s.state.stress_level;
            Rectangle::new([(s.time_s, 0.0), (s.time_s + interval, stress)], stress_color(stress).filled())
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    // Initialize logger
    Builder::from_default_env()
        .filter(None, LevelFilter::Info)
        .init();

    info!("Starting Gas Exchange Visualizer...");
    info!("Input file: {}", args.input.display());
    info!("Output chart: {} ({}x{})", args.output.display(), args.width, args.height);

    let snapshots = load_snapshots(&args.input)?;
    if snapshots.is_empty() {
        warn!("Snapshot file {} contains no snapshots, nothing to draw.", args.input.display());
        return Ok(());
    }
    info!(
        "Loaded {} snapshots covering {:.1} s",
        snapshots.len(),
        snapshots.last().map_or(0.0, |s| s.time_s)
    );

    let changes = mode_changes(&snapshots);
    for (time_s, mode) in &changes {
        info!("Gravity preset switched to {} at {:.2} s", mode.label(), time_s);
    }

    draw_chart(&snapshots, &args.output, args.width, args.height)?;
    info!("Output saved to: {}", args.output.display());

    Ok(())
}
