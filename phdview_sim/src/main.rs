//! PHDView playback demo CLI
//!
//! Generates a synthetic scenario, samples its PHD on a grid and steps
//! through the frames with a navigation script.

use clap::Parser;
use phdview_core::{DisplaySink, PlaybackConfig, PlaybackController};
use phdview_sim::{
    build_session, load_config_file, parse_script, play_through, run_script, PlaybackReport,
    ScenarioId, SimError, SyntheticDataset,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// PHDView playback demo
#[derive(Parser, Debug)]
#[command(name = "phdview-sim")]
#[command(about = "Step through a synthetic PHD sequence with sensor highlights", long_about = None)]
struct Args {
    /// Seed for the synthetic dataset
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (drift, crossing, sparse)
    #[arg(short = 'S', long, default_value = "drift")]
    scenario: String,

    /// Number of time steps
    #[arg(short, long, default_value = "10")]
    frames: usize,

    /// Grid samples per axis
    #[arg(short, long, default_value = "12")]
    resolution: usize,

    /// Show the raw field instead of ln(field + epsilon)
    #[arg(long)]
    linear: bool,

    /// Log floor (default: smallest positive normal f64)
    #[arg(long)]
    epsilon: Option<f64>,

    /// Number of contour levels handed to the renderer
    #[arg(long)]
    contours: Option<usize>,

    /// Playback config JSON; flags above override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Navigation script, e.g. "n,n,p,g5,linear" (default: play through)
    #[arg(long)]
    script: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export the playback report to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Stream frames to the Rerun viewer
    #[cfg(feature = "visualization")]
    #[arg(long)]
    visualize: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    match run(&args) {
        Ok(report) => {
            let failed = report.error_count();
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize report: {}", e);
                        std::process::exit(1);
                    }
                }
            } else if failed == 0 {
                info!("✓ {} steps played on {} frames", report.steps.len() - 1, report.frame_count);
            } else {
                error!("✗ {}/{} steps failed", failed, report.steps.len() - 1);
            }

            if failed > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<PlaybackReport, SimError> {
    let scenario: ScenarioId = args.scenario.parse().map_err(SimError::scenario)?;

    info!("PHDView playback demo v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Scenario: {} - {} ({} target(s))",
        scenario,
        scenario.description(),
        scenario.target_count()
    );

    let dataset = SyntheticDataset::generate(scenario, args.seed, args.frames, args.resolution)?;
    let config = load_config(args)?;

    let script = match &args.script {
        Some(text) => parse_script(text)?,
        None => play_through(dataset.frame_count()),
    };

    let controller = build_session(&dataset, config)?;
    info!("{}: {} sensors, {} frames", controller.title(), controller.registry().len(), controller.len());

    let mut report = PlaybackReport::new(&dataset.name, scenario, args.seed);

    #[cfg(feature = "visualization")]
    if args.visualize {
        let sink = phdview_core::RerunSink::spawn("phdview")
            .map_err(|e| SimError::scenario(format!("cannot start Rerun viewer: {}", e)))?;
        play(controller.with_sink(sink), &dataset, &script, &mut report);
        return finish(args, report);
    }

    play(controller, &dataset, &script, &mut report);
    finish(args, report)
}

/// Config file (or defaults), then command-line overrides.
fn load_config(args: &Args) -> Result<PlaybackConfig, SimError> {
    let mut config = load_config_file(args.config.as_deref())?;

    if args.linear {
        config = config.with_log_mode(false);
    }
    if let Some(epsilon) = args.epsilon {
        config = config.with_epsilon(epsilon);
    }
    if let Some(contours) = args.contours {
        config = config.with_contours(contours);
    }
    config.validate()?;
    Ok(config)
}

fn play<S: DisplaySink>(
    mut controller: PlaybackController<S>,
    dataset: &SyntheticDataset,
    script: &[phdview_sim::NavCommand],
    report: &mut PlaybackReport,
) {
    run_script(&mut controller, dataset, script, report);
}

fn finish(args: &Args, report: PlaybackReport) -> Result<PlaybackReport, SimError> {
    if let Some(path) = &args.export {
        report.write_to_file(path)?;
        info!("Exported {} steps to {}", report.steps.len(), path);
    }
    Ok(report)
}
