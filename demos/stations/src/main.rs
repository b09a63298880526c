//! stations — two trains on a ring of stations, one forward and one backward.
//!
//! Each train runs on its own thread and may only enter a block while it
//! holds that segment's lock; a train finding the next block occupied waits
//! at the platform.  The ring is redrawn on stdout and every train event can
//! be logged to a CSV or text file.
//!
//! ```bash
//! cargo run -p stations -- --step-ms 200 --log events.csv
//! cargo run -p stations -- --config demos/stations/stations.toml --duration-secs 30
//! ```

mod logging;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use rr_core::RailConfig;
use rr_output::logger::DEFAULT_CAPACITY;
use rr_output::{
    Both, ConsoleDisplay, CsvEventLog, CsvSnapshotLog, DisplayStyle, EventLogger, SnapshotObserver,
    TextEventLog,
};
use rr_sim::{SimBuilder, SimObserver, SimReport};

type BoxedObserver = Box<dyn SimObserver + Send>;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Csv,
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "stations")]
#[command(about = "Two trains sharing a ring of single-track segments")]
struct Cli {
    /// TOML file with a `RailConfig`; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of segments in the ring
    #[arg(long)]
    segments: Option<u32>,

    /// Units per segment, station included
    #[arg(long)]
    segment_length: Option<u32>,

    /// Station units at the start of each segment
    #[arg(long)]
    station_length: Option<u32>,

    /// Milliseconds per unit of movement (0 = as fast as possible)
    #[arg(long)]
    step_ms: Option<u64>,

    /// Random ± spread on each step, in milliseconds
    #[arg(long)]
    jitter_ms: Option<u64>,

    /// Seed for the step jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between display refreshes
    #[arg(long)]
    display_ms: Option<u64>,

    /// Write train events to this file (text logs append, CSV logs start over)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Event log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Write one CSV row per train per display refresh to this file
    #[arg(long)]
    snapshots: Option<PathBuf>,

    /// Do not draw the ring
    #[arg(long)]
    no_display: bool,

    /// Draw without ANSI colors or screen clearing
    #[arg(long)]
    no_color: bool,

    /// Stop after this many seconds (default: run until killed)
    #[arg(long)]
    duration_secs: Option<u64>,
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<RailConfig> {
    let Some(path) = path else {
        return Ok(RailConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn apply_overrides(config: &mut RailConfig, cli: &Cli) {
    if let Some(v) = cli.segments       { config.segment_count = v; }
    if let Some(v) = cli.segment_length { config.segment_length = v; }
    if let Some(v) = cli.station_length { config.station_length = v; }
    if let Some(v) = cli.step_ms        { config.step_millis = v; }
    if let Some(v) = cli.jitter_ms      { config.jitter_millis = v; }
    if let Some(v) = cli.seed           { config.seed = v; }
    if let Some(v) = cli.display_ms     { config.display_interval_millis = v; }
}

// ── Output wiring ─────────────────────────────────────────────────────────────

fn spawn_logger(path: &Path, format: LogFormat) -> Result<EventLogger> {
    let logger = match format {
        LogFormat::Csv  => EventLogger::spawn(CsvEventLog::create(path)?, DEFAULT_CAPACITY),
        LogFormat::Text => EventLogger::spawn(TextEventLog::create(path)?, DEFAULT_CAPACITY),
    }
    .with_context(|| format!("opening event log {}", path.display()))?;
    info!(path = %path.display(), ?format, "event log opened");
    Ok(logger)
}

fn build_observer(cli: &Cli) -> Result<Option<BoxedObserver>> {
    let style = if cli.no_color { DisplayStyle::plain() } else { DisplayStyle::default() };
    let display = (!cli.no_display).then(|| ConsoleDisplay::stdout(style));
    let snapshots = match &cli.snapshots {
        Some(path) => Some(SnapshotObserver::new(
            CsvSnapshotLog::create(path)
                .with_context(|| format!("creating snapshot file {}", path.display()))?,
        )),
        None => None,
    };

    let observer: Option<BoxedObserver> = match (display, snapshots) {
        (Some(d), Some(s)) => Some(Box::new(Both(d, s))),
        (Some(d), None)    => Some(Box::new(d)),
        (None, Some(s))    => Some(Box::new(s)),
        (None, None)       => None,
    };
    Ok(observer)
}

fn print_report(report: &SimReport) {
    println!();
    for v in &report.trains {
        println!(
            "Train {}: position {}, {} ticks, {} units, {} laps",
            v.name, v.position, v.tick.0, v.odometer, v.laps
        );
    }
    for (k, s) in report.segments.iter().enumerate() {
        println!("segment {k}: {} entries, {} exits", s.entries, s.exits);
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    config.validate().context("invalid configuration")?;

    let logger = cli.log.as_deref().map(|p| spawn_logger(p, cli.log_format)).transpose()?;

    let mut builder = SimBuilder::new(config);
    if let Some(logger) = &logger {
        builder = builder.events(logger.sink());
    }
    if let Some(observer) = build_observer(&cli)? {
        builder = builder.observer(observer);
    }

    let handle = builder.build().context("building simulation")?.start()?;

    match cli.duration_secs {
        Some(secs) => {
            // The trains' token doubles as the timer; it only fires early if
            // something else stopped the run.
            handle.stop_token().sleep(Duration::from_secs(secs));
            handle.stop();
        }
        None => info!("running until killed"),
    }

    let report = handle.join().context("simulation failed")?;

    if let Some(logger) = logger {
        match logger.finish() {
            Ok(stats) if stats.dropped > 0 => {
                warn!(dropped = stats.dropped, "event log dropped events");
            }
            Ok(stats) => info!(written = stats.written, "event log closed"),
            Err(e) => warn!(error = %e, "event log incomplete"),
        }
    }

    print_report(&report);
    Ok(())
}
