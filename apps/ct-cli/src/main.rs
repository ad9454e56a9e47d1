use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use ct_app::{
    AppError, AppResult, EngineConfig, TrendProfile, generate_into_store, load_config_or_default,
    load_profile, render_window, series_summary, template, template_names, validate_profile,
};
use ct_core::{
    Channel, DeviceId, SeriesStore, TimestampMs, format_iso8601, ms_to_minutes, parse_iso8601,
};
use ct_curves::{CurveFamily, CurveParams, SamplePoint, evaluate_sample};
use ct_lod::TimeRange;
use ct_store::JsonSeriesStore;

#[derive(Parser)]
#[command(name = "ct-cli")]
#[command(about = "ColdTrace CLI - synthetic cold-chain time series", long_about = None)]
struct Cli {
    /// Engine configuration YAML (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List curve families and their flags
    Families,
    /// List built-in trend templates
    Templates,
    /// Print one curve family as CSV
    Preview {
        /// Family tag, e.g. exponentialDecay
        family: CurveFamily,
        #[arg(long, default_value_t = 0.0)]
        start: f64,
        #[arg(long, default_value_t = 1.0)]
        end: f64,
        /// Segment duration in minutes
        #[arg(long, default_value_t = 60.0)]
        duration: f64,
        /// Number of intervals to sample
        #[arg(long, default_value_t = 12)]
        steps: usize,
    },
    /// Validate a trend profile file
    Validate {
        /// Path to the profile YAML file
        profile_path: PathBuf,
    },
    /// Synthesize a profile or template into a device series
    Synth {
        /// Path to the profile YAML file
        #[arg(conflicts_with = "template", required_unless_present = "template")]
        profile_path: Option<PathBuf>,
        /// Built-in template name instead of a profile file
        #[arg(long)]
        template: Option<String>,
        /// Device to write
        #[arg(long)]
        device: String,
        /// Series start (ISO 8601)
        #[arg(long)]
        start: String,
        /// Store directory
        #[arg(long)]
        store: PathBuf,
    },
    /// Print a stored window as CSV, decimated for display
    View {
        /// Store directory
        #[arg(long)]
        store: PathBuf,
        /// Device to read
        #[arg(long)]
        device: String,
        #[arg(long, default_value_t = Channel::Temperature)]
        channel: Channel,
        /// Window start (ISO 8601, defaults to series start)
        #[arg(long)]
        from: Option<String>,
        /// Window end (ISO 8601, defaults to series end)
        #[arg(long)]
        to: Option<String>,
        /// Point budget (defaults to the configured budget)
        #[arg(long)]
        max_points: Option<usize>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_config_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Families => cmd_families(),
        Commands::Templates => cmd_templates(),
        Commands::Preview {
            family,
            start,
            end,
            duration,
            steps,
        } => cmd_preview(family, start, end, duration, steps),
        Commands::Validate { profile_path } => cmd_validate(&profile_path),
        Commands::Synth {
            profile_path,
            template,
            device,
            start,
            store,
        } => {
            let profile = match (profile_path, template) {
                (Some(path), _) => load_profile(&path)?,
                (None, Some(name)) => ct_app::template(&name)?,
                (None, None) => {
                    return Err(AppError::InvalidInput(
                        "either a profile path or --template is required".to_string(),
                    ));
                }
            };
            cmd_synth(&config, &profile, &device, &start, &store)
        }
        Commands::View {
            store,
            device,
            channel,
            from,
            to,
            max_points,
            output,
        } => cmd_view(
            &config,
            &store,
            &device,
            channel,
            from.as_deref(),
            to.as_deref(),
            max_points,
            output.as_deref(),
        ),
    }
}

fn cmd_families() -> AppResult<()> {
    println!("{:<16} {:<28} {:>5} {:>12}", "TAG", "LABEL", "NOISY", "RENORMALIZED");
    for family in CurveFamily::all() {
        let spec = family.spec();
        println!(
            "{:<16} {:<28} {:>5} {:>12}",
            spec.tag,
            spec.label,
            if spec.noisy { "yes" } else { "" },
            if spec.renormalized { "yes" } else { "" }
        );
    }
    Ok(())
}

fn cmd_templates() -> AppResult<()> {
    for name in template_names() {
        let profile = template(name)?;
        println!(
            "  {} - {} ({:.0} min)",
            name,
            profile.description,
            profile.duration_minutes()
        );
    }
    Ok(())
}

fn cmd_preview(
    family: CurveFamily,
    start: f64,
    end: f64,
    duration: f64,
    steps: usize,
) -> AppResult<()> {
    let params = CurveParams::new(start, end);
    let steps = steps.max(1);

    let mut csv = String::from("progress,value\n");
    for i in 0..=steps {
        let sample = SamplePoint {
            progress: i as f64 / steps as f64,
            index: i as u64,
            duration_minutes: duration,
        };
        let value = evaluate_sample(family, &sample, &params);
        csv.push_str(&format!("{:.4},{:.4}\n", sample.progress, value));
    }
    print!("{}", csv);
    Ok(())
}

fn cmd_validate(profile_path: &Path) -> AppResult<()> {
    println!("Validating profile: {}", profile_path.display());
    let profile = load_profile(profile_path)?;
    validate_profile(&profile)?;
    println!(
        "✓ Profile '{}' is valid ({} temperature / {} humidity segments, {:.0} min)",
        profile.name,
        profile.temperature.len(),
        profile.humidity.len(),
        profile.duration_minutes()
    );
    Ok(())
}

fn parse_time(value: &str) -> AppResult<TimestampMs> {
    parse_iso8601(value)
        .ok_or_else(|| AppError::InvalidInput(format!("not an ISO 8601 timestamp: {}", value)))
}

fn cmd_synth(
    config: &EngineConfig,
    profile: &TrendProfile,
    device: &str,
    start: &str,
    store_dir: &Path,
) -> AppResult<()> {
    let start_ms = parse_time(start)?;
    let store = JsonSeriesStore::new(store_dir)?;
    let device_id = DeviceId::new(device);

    let rows = generate_into_store(&store, &device_id, profile, start_ms, &config.synth)?;
    println!(
        "✓ Wrote {} rows for {} from profile '{}'",
        rows, device_id, profile.name
    );

    if let Some(series) = store.load_series(&device_id)? {
        for channel in Channel::ALL {
            if let Some(s) = series_summary(&series, channel) {
                println!(
                    "  {:<11} min {:>8.2}  max {:>8.2}  mean {:>8.2}  over {:.0} min",
                    channel.as_str(),
                    s.min,
                    s.max,
                    s.mean,
                    ms_to_minutes(s.end_ms - s.start_ms)
                );
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_view(
    config: &EngineConfig,
    store_dir: &Path,
    device: &str,
    channel: Channel,
    from: Option<&str>,
    to: Option<&str>,
    max_points: Option<usize>,
    output: Option<&Path>,
) -> AppResult<()> {
    let store = JsonSeriesStore::new(store_dir)?;
    let device_id = DeviceId::new(device);

    let series = store
        .load_series(&device_id)?
        .ok_or_else(|| AppError::DeviceNotFound(device.to_string()))?;
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        println!("Series for {} is empty", device_id);
        return Ok(());
    };
    let range = TimeRange::new(
        from.map(parse_time).transpose()?.unwrap_or(first.timestamp_ms),
        to.map(parse_time).transpose()?.unwrap_or(last.timestamp_ms),
    );
    let budget = max_points.unwrap_or(config.max_points);

    let points = render_window(&store, &device_id, channel, range, budget, &config.lod)?;

    let mut csv = format!("timestamp,{}\n", channel.as_str());
    for p in &points {
        let ts = format_iso8601(p.timestamp_ms).unwrap_or_else(|| p.timestamp_ms.to_string());
        csv.push_str(&format!("{},{}\n", ts, p.value));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} of {} points to {}",
            points.len(),
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}
