//! TOML-based exploration tool for the DEMON pipeline.
//!
//! A recipe describes a synthetic signal (carrier, noise, modulation tones),
//! the pipeline parameters, and where to write results. The tool runs the
//! chosen detector and plots the envelope and its spectrum.
//!
//! Run with:
//!   cargo run --example explore                          # Uses explore.toml
//!   cargo run --example explore -- --recipe noise        # Uses embedded recipe
//!   cargo run --example explore -- --config my.toml      # Uses custom file
//!
//! Set `RUST_LOG=debug` to see the designed filter and decimation factor.

mod common;

use clap::Parser;
use demon::{Demodulator, Demon, DemonConfig, EnvelopeEstimate, SqrtPolicy};
use plotters::prelude::*;
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::io::Write;

// ============================================================================
// Recipe Constants
// ============================================================================

const RECIPE_TONE: &str = r#"
[signal]
duration = 1.0
sample_rate = 200000.0
carrier = 25000.0
noise_amplitude = 0.0
noise_seed = 42
modulation = [[50.0, 0.5]]

[demon]
low = 20000.0
high = 30000.0
cutoff = 1000.0
order = 3
detector = "hilbert"

[output]
plot_path = "output/explore_tone.png"
csv_path = "output/explore_tone.csv"
"#;

const RECIPE_NOISE: &str = r#"
[signal]
duration = 2.0
sample_rate = 200000.0
noise_amplitude = 1.0
noise_seed = 7
modulation = [[12.5, 0.3], [37.5, 0.15]]

[demon]
low = 20000.0
high = 30000.0
cutoff = 200.0
order = 3
detector = "square-law"

[output]
plot_path = "output/explore_noise.png"
csv_path = "output/explore_noise.csv"
"#;

const RECIPE_NARROWBAND: &str = r#"
[signal]
duration = 1.0
sample_rate = 200000.0
carrier = 28500.0
noise_amplitude = 0.5
noise_seed = 3
modulation = [[80.0, 0.4]]

[demon]
low = 27000.0
high = 30000.0
cutoff = 500.0
order = 4
detector = "hilbert"

[output]
plot_path = "output/explore_narrowband.png"
csv_path = "output/explore_narrowband.csv"
"#;

// ============================================================================
// Config Structures
// ============================================================================

#[derive(Deserialize)]
struct ExploreConfig {
    signal: SignalConfig,
    demon: PipelineConfig,
    output: OutputConfig,
}

#[derive(Deserialize)]
struct SignalConfig {
    duration: f64,
    sample_rate: f64,
    /// Carrier tone in Hz; broadband noise only when absent
    #[serde(default)]
    carrier: Option<f64>,
    noise_amplitude: f64,
    noise_seed: u64,
    /// (frequency, depth) pairs
    modulation: Vec<(f64, f64)>,
}

#[derive(Deserialize)]
struct PipelineConfig {
    low: f64,
    high: f64,
    cutoff: f64,
    order: usize,
    detector: Detector,
    #[serde(default)]
    sqrt_policy: Policy,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
enum Detector {
    SquareLaw,
    Hilbert,
}

#[derive(Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
enum Policy {
    #[default]
    Clamp,
    Reject,
    Propagate,
}

#[derive(Deserialize)]
struct OutputConfig {
    plot_path: String,
    csv_path: String,
}

impl ExploreConfig {
    fn demon_config(&self) -> DemonConfig {
        let policy = match self.demon.sqrt_policy {
            Policy::Clamp => SqrtPolicy::Clamp,
            Policy::Reject => SqrtPolicy::Reject,
            Policy::Propagate => SqrtPolicy::Propagate,
        };
        DemonConfig::default()
            .with_sample_rate(self.signal.sample_rate)
            .with_band(self.demon.low, self.demon.high)
            .with_cutoff(self.demon.cutoff)
            .with_order(self.demon.order)
            .with_sqrt_policy(policy)
    }

    fn demodulator(&self) -> Demodulator {
        match self.demon.detector {
            Detector::SquareLaw => Demodulator::SquareLaw,
            Detector::Hilbert => Demodulator::HilbertMagnitude,
        }
    }
}

// ============================================================================
// CLI
// ============================================================================

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recipe name (tone, noise, narrowband)
    #[arg(short, long)]
    recipe: Option<String>,

    /// Custom config file path
    #[arg(short, long)]
    config: Option<String>,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    println!("=== DEMON Exploration Tool ===\n");

    // Load config (priority: --recipe > --config > explore.toml)
    let config_str = if let Some(recipe_name) = args.recipe {
        println!("Using recipe: {}", recipe_name);
        load_recipe(&recipe_name)?
    } else if let Some(config_path) = args.config {
        println!("Loading config: {}", config_path);
        fs::read_to_string(config_path)?
    } else {
        match fs::read_to_string("explore.toml") {
            Ok(content) => {
                println!("Using explore.toml");
                content
            }
            Err(_) => {
                println!("No explore.toml found, using tone recipe");
                RECIPE_TONE.to_string()
            }
        }
    };

    let config: ExploreConfig =
        toml::from_str(&config_str).map_err(|e| format!("Failed to parse TOML config: {}", e))?;

    let demodulator = config.demodulator();
    println!();
    println!("Configuration:");
    println!("  Duration: {:.1}s", config.signal.duration);
    println!("  Sample rate: {:.1} Hz", config.signal.sample_rate);
    println!(
        "  Passband: {:.0}-{:.0} Hz (order {})",
        config.demon.low, config.demon.high, config.demon.order
    );
    println!("  Envelope cutoff: {:.1} Hz", config.demon.cutoff);
    println!("  Detector: {}", demodulator.name());
    println!();

    let samples = (config.signal.duration * config.signal.sample_rate) as usize;
    let signal = generate_signal(&config.signal, samples);

    let demon = Demon::new(config.demon_config())?;
    let envelope = demon.run(&signal, demodulator)?;
    let spectrum = common::magnitude_spectrum(envelope.samples());

    println!(
        "Envelope: {} samples at {:.1} Hz (decimated by {})",
        envelope.len(),
        envelope.sample_rate(),
        envelope.decimation_factor()
    );
    if let Some(freq) = strongest_line(&spectrum, &envelope) {
        println!("Strongest modulation line: {:.2} Hz", freq);
    }
    for &(freq, depth) in &config.signal.modulation {
        println!("  (generated: {:.2} Hz at depth {:.2})", freq, depth);
    }

    // Create output directory
    if let Some(parent) = std::path::Path::new(&config.output.plot_path).parent() {
        fs::create_dir_all(parent)?;
    }

    write_csv(&envelope, &config)?;
    generate_plot(&envelope, &spectrum, &config)?;

    println!("\nDone!");
    println!("  Plot: {}", config.output.plot_path);
    println!("  CSV: {}", config.output.csv_path);

    Ok(())
}

// ============================================================================
// Config Loading
// ============================================================================

fn load_recipe(name: &str) -> Result<String, Box<dyn Error>> {
    match name {
        "tone" => Ok(RECIPE_TONE.to_string()),
        "noise" => Ok(RECIPE_NOISE.to_string()),
        "narrowband" => Ok(RECIPE_NARROWBAND.to_string()),
        _ => Err(format!(
            "Unknown recipe '{}'. Available recipes: tone, noise, narrowband",
            name
        )
        .into()),
    }
}

// ============================================================================
// Signal Generation
// ============================================================================

fn generate_signal(config: &SignalConfig, samples: usize) -> Vec<f64> {
    let noise = common::white_noise(samples, config.noise_amplitude, config.noise_seed);
    let source = match config.carrier {
        Some(freq) => common::add(
            &common::sine_wave(samples, config.sample_rate, freq, 1.0),
            &noise,
        ),
        None => noise,
    };
    common::modulate(&source, config.sample_rate, &config.modulation)
}

/// Frequency of the largest spectral line, DC excluded.
fn strongest_line(spectrum: &[f64], envelope: &EnvelopeEstimate) -> Option<f64> {
    let bin_hz = envelope.sample_rate() / envelope.len() as f64;
    spectrum
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(k, _)| k as f64 * bin_hz)
}

// ============================================================================
// CSV Export
// ============================================================================

fn write_csv(envelope: &EnvelopeEstimate, config: &ExploreConfig) -> Result<(), Box<dyn Error>> {
    let mut file = fs::File::create(&config.output.csv_path)?;
    writeln!(file, "sample,time_ms,envelope")?;

    let dt = 1000.0 / envelope.sample_rate();
    for (i, &v) in envelope.samples().iter().enumerate() {
        writeln!(file, "{},{:.3},{:.6}", i, i as f64 * dt, v)?;
    }

    Ok(())
}

// ============================================================================
// Plotting
// ============================================================================

fn generate_plot(
    envelope: &EnvelopeEstimate,
    spectrum: &[f64],
    config: &ExploreConfig,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(&config.output.plot_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((2, 1));

    // Plot 1: envelope over time (first 500ms)
    {
        let rate = envelope.sample_rate();
        let samples = ((0.5 * rate) as usize).clamp(1, envelope.len());
        let shown = &envelope.samples()[..samples];
        let (y_min, y_max) = padded_range(shown);

        let mut chart = ChartBuilder::on(&panels[0])
            .caption(
                format!("{} envelope", config.demodulator().name()),
                ("sans-serif", 24).into_font(),
            )
            .margin(15)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..(samples as f64 * 1000.0 / rate), y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Time (ms)")
            .y_desc("Amplitude")
            .draw()?;

        chart.draw_series(LineSeries::new(
            shown
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64 * 1000.0 / rate, v)),
            BLUE.stroke_width(2),
        ))?;
    }

    // Plot 2: envelope spectrum
    {
        let bin_hz = envelope.sample_rate() / envelope.len() as f64;
        let nyquist = envelope.sample_rate() / 2.0;
        let peak = spectrum.iter().skip(1).fold(0.0f64, |m, &v| m.max(v));

        let mut chart = ChartBuilder::on(&panels[1])
            .caption("Envelope spectrum", ("sans-serif", 20).into_font())
            .margin(15)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..nyquist, 0.0..(peak * 1.1).max(1e-12))?;

        chart
            .configure_mesh()
            .x_desc("Frequency (Hz)")
            .y_desc("Magnitude")
            .draw()?;

        chart.draw_series(LineSeries::new(
            spectrum
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, &m)| (k as f64 * bin_hz, m)),
            RED.stroke_width(1),
        ))?;
    }

    root.present()?;
    Ok(())
}

fn padded_range(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    let margin = ((hi - lo) * 0.1).max(1e-9);
    (lo - margin, hi + margin)
}
