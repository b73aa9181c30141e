//! Flicker Pipeline - Main Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use classifier::Trainer;
use pipeline::{init_logging, FeaturePipeline, PipelineConfig};
use sensor_acquisition::{CaptureReport, CaptureSession, SerialSensor};
use std::path::PathBuf;
use storage::FeatureDataset;
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser)]
#[command(name = "flicker-pipeline", version, about = "Light-sensor flicker feature pipeline")]
struct Cli {
    /// Configuration file (TOML); FLICKER__* variables override it
    #[arg(short, long, global = true, env = "FLICKER_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture one window from the sensor and append its features
    Capture {
        /// Stimulus label for this window
        #[arg(short, long)]
        label: String,
        /// Override the configured window length (seconds)
        #[arg(short, long)]
        duration: Option<f64>,
    },
    /// Extract features from a recorded `millis,adc` log
    Replay {
        /// Recorded capture log
        #[arg(short, long)]
        input: PathBuf,
        /// Stimulus label for this window
        #[arg(short, long)]
        label: String,
    },
    /// Train and evaluate the classifier on the dataset
    Train,
    /// List the configured stimulus labels and bands
    Stimuli,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging().context("Failed to set tracing subscriber")?;
    let cli = Cli::parse();

    info!("=== Flicker Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let mut config = PipelineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Capture { label, duration } => {
            if let Some(secs) = duration {
                config.capture.duration_secs = secs;
            }
            let mut pipeline = FeaturePipeline::new(&config)?;
            // Fail on a bad label before holding the port for a full window
            pipeline.band_for(&label)?;

            let mut sensor = SerialSensor::open(&config.serial).await?;
            let report = sensor.capture(config.capture.duration()).await?;
            info!("Captured {} samples from {}", report.buffer.len(), sensor.port());
            store(&mut pipeline, &config, &report, &label, cli.json)?;
        }
        Command::Replay { input, label } => {
            let mut pipeline = FeaturePipeline::new(&config)?;
            pipeline.band_for(&label)?;

            let file = tokio::fs::File::open(&input)
                .await
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let report = CaptureSession::new()
                .read_all(&mut BufReader::new(file))
                .await?;
            info!("Read {} samples from {}", report.buffer.len(), input.display());
            store(&mut pipeline, &config, &report, &label, cli.json)?;
        }
        Command::Train => {
            let dataset = FeatureDataset::new(&config.dataset.path);
            let records = dataset.load()?;
            info!("Loaded {} records from {}", records.len(), dataset.path().display());

            let (_model, report) = Trainer::new(config.training.clone()).train(&records)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Model Accuracy: {:.2}% ({} train / {} test rows)",
                    report.accuracy * 100.0,
                    report.train_rows,
                    report.test_rows
                );
                println!("Confusion Matrix:");
                print!("{}", report.confusion);
            }
        }
        Command::Stimuli => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config.stimuli)?);
            } else {
                for stimulus in &config.stimuli {
                    println!(
                        "{:<8} {:.1}-{:.1} Hz",
                        stimulus.label, stimulus.low_hz, stimulus.high_hz
                    );
                }
            }
        }
    }

    Ok(())
}

fn store(
    pipeline: &mut FeaturePipeline,
    config: &PipelineConfig,
    report: &CaptureReport,
    label: &str,
    json: bool,
) -> Result<()> {
    let dataset = FeatureDataset::new(&config.dataset.path);
    let record = pipeline.record_window(&report.buffer, label, &dataset)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("--- Extracted Features ({}) ---", record.label);
        println!("Dominant Frequency: {} Hz", record.dominant_freq);
        println!("Band Power Ratio:   {}", record.band_power_ratio);
        println!("Peak Magnitude:     {}", record.peak_magnitude);
        println!("Spectral Centroid:  {} Hz", record.spectral_centroid);
        println!("Spectral Spread:    {} Hz", record.spectral_spread);
    }
    Ok(())
}
