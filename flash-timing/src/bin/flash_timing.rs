//! Flash edge timing tool.
//!
//! Subcommands:
//! - `analyze`: locate both goalposts of a recording CSV and report their times
//! - `synth`: write a synthetic recording with flashes at known sub-frame onsets
//! - `profile`: manage named analysis profiles under `~/.flash_timing/profiles`
//!
//! ```bash
//! cargo run --release --bin flash_timing -- synth flashes.csv --flashes 20.3:40,80.6:120
//! cargo run --release --bin flash_timing -- analyze flashes.csv --json result.json --plot curve.png
//! cargo run --release --bin flash_timing -- profile save wat910 --num-pixels 25
//! cargo run --release --bin flash_timing -- analyze flashes.csv --profile wat910
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use flash_timing::report::{format_report, plot_light_curve, write_json};
use flash_timing::shared_args::{AnalysisArgs, FlashRanges};
use flash_timing::{analyze_flash, AnalysisConfig, FrameTimeBase, LightCurve, Recording};
use log::info;
use shared::{ConfigStorage, Timestamp};
use test_helpers::light_curves::{
    pulse_curve, uniform_exposures, uniform_start_times, with_gaussian_noise,
};

#[derive(Parser, Debug)]
#[command(name = "flash_timing")]
#[command(about = "Sub-frame timing of flash edges in occultation video light curves")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Locate and time both goalposts of a recording
    Analyze {
        /// Recording CSV (intensity,start_time,exposure_s)
        csv: PathBuf,

        /// Write the full result as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write a PNG plot of the light curve and goalposts
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Named profile to start from
        #[arg(long)]
        profile: Option<String>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Write a synthetic recording
    Synth {
        /// Output CSV
        output: PathBuf,

        /// Number of frames
        #[arg(long, default_value_t = 200)]
        len: usize,

        /// Flash ranges in frames (format: "onset:end[,onset:end...]")
        #[arg(long, default_value = "20.3:40,80.6:120")]
        flashes: FlashRanges,

        /// Baseline level
        #[arg(long, default_value_t = 100.0)]
        base: f64,

        /// Flash plateau level
        #[arg(long, default_value_t = 500.0)]
        flash: f64,

        /// Gaussian noise sigma per frame
        #[arg(long, default_value_t = 0.0)]
        noise: f64,

        /// Noise seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Frame period and exposure in seconds
        #[arg(long, default_value_t = 1.0 / 29.97)]
        frame_seconds: f64,

        /// Start time of frame 0 (RFC 3339)
        #[arg(long, default_value = "2024-05-01T03:04:05Z")]
        t0: DateTime<Utc>,
    },

    /// Manage named analysis profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// Save the defaults plus any overrides under a name
    Save {
        name: String,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Print a profile as JSON
    Show { name: String },

    /// List saved profiles
    List,

    /// Delete a profile
    Delete { name: String },
}

fn load_profile(storage: &ConfigStorage, name: &str) -> Result<AnalysisConfig> {
    storage
        .get_profile::<AnalysisConfig>(name)
        .ok_or_else(|| anyhow!("No profile named '{name}'"))?
        .with_context(|| format!("Failed to read profile '{name}'"))
}

fn run_analyze(
    csv: PathBuf,
    json: Option<PathBuf>,
    plot: Option<PathBuf>,
    profile: Option<String>,
    analysis: AnalysisArgs,
) -> Result<()> {
    let base_config = match profile {
        Some(name) => {
            let config = load_profile(&ConfigStorage::new()?, &name)?;
            info!("Using profile '{name}'");
            config
        }
        None => AnalysisConfig::default(),
    };
    let config = analysis.apply(base_config);

    let recording = Recording::load_csv(&csv)
        .with_context(|| format!("Failed to load recording {}", csv.display()))?;
    info!(
        "Loaded {} frames from {}",
        recording.light_curve.len(),
        csv.display()
    );

    let result = analyze_flash(&recording.light_curve, &recording.time_base, &config)?;
    print!("{}", format_report(&result));

    if let Some(path) = json {
        write_json(&path, &result)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote result to {}", path.display());
    }

    if let Some(path) = plot {
        plot_light_curve(&path, &recording.light_curve, &result)
            .map_err(|e| anyhow!("Failed to plot {}: {e}", path.display()))?;
        info!("Wrote plot to {}", path.display());
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_synth(
    output: PathBuf,
    len: usize,
    flashes: FlashRanges,
    base: f64,
    flash: f64,
    noise: f64,
    seed: u64,
    frame_seconds: f64,
    t0: DateTime<Utc>,
) -> Result<()> {
    if !(frame_seconds.is_finite() && frame_seconds > 0.0) {
        bail!("--frame-seconds must be positive, got {frame_seconds}");
    }
    if !(noise.is_finite() && noise >= 0.0) {
        bail!("--noise must be non-negative, got {noise}");
    }
    let FlashRanges(flashes) = flashes;
    let t0 = Timestamp::from_datetime(&t0).ok_or_else(|| anyhow!("--t0 is before 1970"))?;

    let mut samples = pulse_curve(len, &flashes, base, flash);
    if noise > 0.0 {
        samples = with_gaussian_noise(&samples, noise, seed);
    }

    let recording = Recording::new(
        LightCurve::new(samples)?,
        FrameTimeBase::new(
            uniform_start_times(len, t0, frame_seconds),
            uniform_exposures(len, frame_seconds),
        )?,
    )?;
    recording.write_csv(&output)?;
    info!(
        "Wrote {len} frames with {} flash(es) to {}",
        flashes.len(),
        output.display()
    );
    Ok(())
}

fn run_profile(action: ProfileAction) -> Result<()> {
    let storage = ConfigStorage::new()?;
    match action {
        ProfileAction::Save { name, analysis } => {
            let config = analysis.apply(AnalysisConfig::default());
            config.validate()?;
            let path = storage.save_profile(&name, &config)?;
            println!("Saved profile '{name}' to {}", path.display());
        }
        ProfileAction::Show { name } => {
            let config = load_profile(&storage, &name)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ProfileAction::List => {
            let profiles = storage.list_profiles()?;
            if profiles.is_empty() {
                println!("No saved profiles in {}", storage.root_path().display());
            }
            for name in profiles {
                println!("{name}");
            }
        }
        ProfileAction::Delete { name } => {
            if storage.delete_profile(&name)? {
                println!("Deleted profile '{name}'");
            } else {
                bail!("No profile named '{name}'");
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Analyze {
            csv,
            json,
            plot,
            profile,
            analysis,
        } => run_analyze(csv, json, plot, profile, analysis),
        Command::Synth {
            output,
            len,
            flashes,
            base,
            flash,
            noise,
            seed,
            frame_seconds,
            t0,
        } => run_synth(
            output,
            len,
            flashes,
            base,
            flash,
            noise,
            seed,
            frame_seconds,
            t0,
        ),
        Command::Profile { action } => run_profile(action),
    }
}
