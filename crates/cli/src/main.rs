//! Satyadrishti CLI - anomaly and change detection over frame pairs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use satyadrishti_algorithms::pipeline::{run_detection, DetectionConfig, DetectionInput, DetectionReport};
use satyadrishti_algorithms::scoring::{AlgorithmSelector, RxParams, DEFAULT_RIDGE};
use satyadrishti_core::io::{locate_frame, read_frame_file, read_weather, ArtifactWriter, RunArtifacts};
use satyadrishti_core::{Frame, Raster, WeatherSample};

/// Frame acquired first (`.npy` or `.tif`)
const BEFORE_FRAME: &str = "frame_00";
/// Frame acquired second; RX scores this one
const AFTER_FRAME: &str = "frame_01";
/// Weather record for the "after" frame
const AFTER_WEATHER: &str = "frame_01.json";

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "satyadrishti")]
#[command(author, version, about = "Multi-band anomaly and change detection", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a frame pair and write score maps, masks and metadata
    Detect {
        /// Directory holding frame_00 and frame_01 (.npy, else .tif)
        #[arg(long, alias = "frames_dir")]
        frames_dir: PathBuf,
        /// Directory holding frame_01.json
        #[arg(long, alias = "weather_dir")]
        weather_dir: PathBuf,
        /// Output directory (created if missing)
        #[arg(long)]
        out: PathBuf,
        /// Algorithm: simple, rx, both
        #[arg(long, default_value = "both")]
        algo: String,
        /// Detection quantile in (0, 1)
        #[arg(long, default_value = "0.99")]
        q: f64,
        /// Ridge added to the RX covariance diagonal
        #[arg(long, default_value_t = DEFAULT_RIDGE)]
        epsilon: f64,
    },
    /// Show information about a frame file
    Info {
        /// Input frame file
        input: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_frame(path: &Path) -> Result<Frame> {
    let frame = read_frame_file(path).with_context(|| format!("Failed to read frame {}", path.display()))?;
    let (bands, rows, cols) = frame.shape();
    info!("{}: {} bands, {} x {}", path.display(), bands, cols, rows);
    Ok(frame)
}

/// Loaded inputs plus the file names recorded in metadata
struct Inputs {
    before: Frame,
    after: Frame,
    weather: WeatherSample,
    frame_refs: Vec<String>,
}

/// Find `stem` in `dir` (`.npy` first, then `.tif`) and load it
fn load_named_frame(dir: &Path, stem: &str) -> Result<(Frame, String)> {
    let path = locate_frame(dir, stem).with_context(|| format!("Failed to find frame {}", stem))?;
    let frame = load_frame(&path)?;
    let name = path
        .file_name()
        .map_or_else(|| stem.to_string(), |n| n.to_string_lossy().into_owned());
    Ok((frame, name))
}

fn load_inputs(frames_dir: &Path, weather_dir: &Path) -> Result<Inputs> {
    let pb = spinner("Reading frames...");
    let (before, before_ref) = load_named_frame(frames_dir, BEFORE_FRAME)?;
    let (after, after_ref) = load_named_frame(frames_dir, AFTER_FRAME)?;
    let weather_path = weather_dir.join(AFTER_WEATHER);
    let weather = read_weather(&weather_path)
        .with_context(|| format!("Failed to read weather {}", weather_path.display()))?;
    pb.finish_and_clear();

    Ok(Inputs {
        before,
        after,
        weather,
        frame_refs: vec![before_ref, after_ref],
    })
}

fn write_outputs(report: &DetectionReport, out: &Path) -> Result<Vec<RunArtifacts>> {
    let pb = spinner("Writing outputs...");
    let writer = ArtifactWriter::new(out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;

    let mut written = Vec::with_capacity(report.runs.len());
    let mut best_artifacts = None;
    for run in &report.runs {
        let artifacts = writer
            .write_run(run.algorithm.name(), &run.score_map, &run.mask, &run.metadata)
            .with_context(|| format!("Failed to write {} outputs", run.algorithm))?;
        if report.best().map(|b| b.algorithm) == Some(run.algorithm) {
            best_artifacts = Some(artifacts.clone());
        }
        written.push(artifacts);
    }

    if let Some(best) = &best_artifacts {
        writer.write_alias(best).context("Failed to write generic outputs")?;
    }
    pb.finish_and_clear();
    Ok(written)
}

fn done(report: &DetectionReport, out: &Path, elapsed: std::time::Duration) {
    let confidences: Vec<String> = report
        .runs
        .iter()
        .map(|run| format!("{}={:.3}", run.algorithm, run.final_confidence()))
        .collect();
    println!("Final confidences: {}", confidences.join(", "));
    if let Some(best) = report.best() {
        println!("  Generic outputs: {}", best.algorithm);
    }
    println!("Outputs saved to: {}", out.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Detect {
            frames_dir,
            weather_dir,
            out,
            algo,
            q,
            epsilon,
        } => {
            let selector: AlgorithmSelector = algo.parse().context("Invalid --algo")?;
            let config = DetectionConfig {
                selector,
                quantile: q,
                rx: RxParams { epsilon },
            };
            config.validate().context("Invalid configuration")?;

            let inputs = load_inputs(&frames_dir, &weather_dir)?;
            let input = DetectionInput::new(&inputs.before, &inputs.after, inputs.weather)
                .with_frame_refs(inputs.frame_refs.iter().cloned());

            let start = Instant::now();
            let report = run_detection(&input, &config).context("Detection failed")?;
            let elapsed = start.elapsed();

            write_outputs(&report, &out)?;
            done(&report, &out, elapsed);

            if let Some(failure) = report.failures.first() {
                let names: Vec<&str> = report.failures.iter().map(|f| f.algorithm.name()).collect();
                anyhow::bail!(
                    "{} of {} algorithms failed ({}); first error: {}",
                    report.failures.len(),
                    selector.algorithms().len(),
                    names.join(", "),
                    failure.error
                );
            }
        }

        Commands::Info { input } => {
            let frame = load_frame(&input)?;
            let (bands, rows, cols) = frame.shape();

            println!("File: {}", input.display());
            println!("Bands: {}", bands);
            println!("Dimensions: {} x {} ({} pixels)", cols, rows, frame.pixel_count());
            println!("\nStatistics:");
            for b in 0..bands {
                let band = Raster::from_array(frame.band(b)?.to_owned());
                let stats = band.statistics();
                println!("  Band {}:", b);
                if let Some(min) = stats.min {
                    println!("    Min: {:.4}", min);
                }
                if let Some(max) = stats.max {
                    println!("    Max: {:.4}", max);
                }
                if let Some(mean) = stats.mean {
                    println!("    Mean: {:.4}", mean);
                }
                println!(
                    "    Valid cells: {} ({:.1}%)",
                    stats.valid_count,
                    100.0 * stats.valid_count as f64 / band.len() as f64
                );
            }
        }
    }

    Ok(())
}
