//! Replay application: runs a recorded sensor log through the engine and
//! reports the lengths it finds.

use crate::{
    config::{Config, EXAMPLE_CONFIG},
    engine::{SwimCallback, SwimMetricExtractor},
    error::{Error, Result},
    events::{Event, EventKind},
    length::{LengthStatistics, TurnKind},
    replay::{replay, ReplaySummary, SensorLog},
    state::StrokeKind,
    timer::{IntermediateTimes, SessionTimer},
    utils::safe_cast::{nanos_to_secs, secs_to_nanos},
};
use clap::Parser;
use log::{debug, info, warn};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Command line arguments of `swim-replay`
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "swim-replay", author, version, about = "Replay a swim sensor log through the metrics engine", long_about = None)]
pub struct ReplayArgs {
    /// Sensor log (CSV rows: timestamp_ns, lin_x, lin_y, lin_z, yaw, pitch, roll)
    #[arg(required_unless_present = "write_config")]
    pub input: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Write completed lengths to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print every engine event
    #[arg(short, long)]
    pub events: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// The log starts with a header row
    #[arg(long)]
    pub headers: bool,

    /// Write the example configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,
}

/// Display name of a stroke
#[must_use]
pub fn stroke_label(stroke: StrokeKind) -> &'static str {
    match stroke {
        StrokeKind::Unknown => "unknown",
        StrokeKind::Breast => "breaststroke",
        StrokeKind::Crawl => "freestyle",
        StrokeKind::Back => "backstroke",
        StrokeKind::Butterfly => "butterfly",
    }
}

/// Display name of a turn
#[must_use]
pub fn turn_label(turn: TurnKind) -> &'static str {
    match turn {
        TurnKind::Flip => "flip",
        TurnKind::Open => "open",
        TurnKind::Stopped => "stopped",
    }
}

fn event_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::LengthStart => "length-start",
        EventKind::RollChange => "roll",
        EventKind::PitchChange => "pitch",
        EventKind::Thrust => "thrust",
        EventKind::SwimStateChange => "swim-state",
    }
}

/// One human-readable line per length
#[must_use]
pub fn format_length(number: usize, stats: &LengthStatistics) -> String {
    let direction = stats
        .direction
        .map_or_else(|| "-".to_string(), |d| format!("{:.0}°", d.to_degrees()));
    format!(
        "Length {number:>3}: {:>6.1}s {:>3} strokes {:<12} {:<7} heading {direction}",
        stats.length_secs(),
        stats.stroke_count,
        stroke_label(stats.stroke),
        turn_label(stats.turn),
    )
}

/// Write lengths as CSV with a header row
pub fn write_lengths<W: Write>(writer: W, lengths: &[LengthStatistics]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "length_start_ns",
        "length_time_secs",
        "strokes",
        "stroke",
        "turn",
        "direction",
    ])?;
    for stats in lengths {
        writer.write_record(&[
            stats.length_start.to_string(),
            format!("{:.3}", stats.length_secs()),
            stats.stroke_count.to_string(),
            stroke_label(stats.stroke).to_string(),
            turn_label(stats.turn).to_string(),
            stats.direction.map_or_else(String::new, |d| format!("{d:.4}")),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Engine callback of the replay tool
#[derive(Debug, Default)]
pub struct SessionCallback {
    timer: SessionTimer,
    lengths: Vec<LengthStatistics>,
    show_events: bool,
}

impl SessionCallback {
    #[must_use]
    pub fn new(show_events: bool) -> Self {
        Self {
            show_events,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn lengths(&self) -> &[LengthStatistics] {
        &self.lengths
    }

    #[must_use]
    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut SessionTimer {
        &mut self.timer
    }
}

impl SwimCallback for SessionCallback {
    fn on_event(&mut self, event: &Event) {
        self.timer.on_event(event);
        if self.show_events {
            println!(
                "{:>12.3}s  {:<12} {}",
                nanos_to_secs(event.timestamp),
                event_label(event.kind),
                event.value
            );
        }
    }

    fn on_length_complete(&mut self, stats: LengthStatistics) {
        self.timer.on_length_complete(&stats);
        self.lengths.push(stats);
        println!("{}", format_length(self.lengths.len(), &stats));
    }
}

/// Result of one replay run
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub summary: ReplaySummary,
    pub lengths: Vec<LengthStatistics>,
    /// Summed duration of reported lengths, in nanoseconds
    pub swim_time: i64,
    /// Session timer totals at the last row
    pub session: Option<IntermediateTimes>,
}

/// Main application struct
pub struct ReplayApp {
    args: ReplayArgs,
    config: Config,
}

impl ReplayApp {
    /// Create the application, loading the configuration file if one was given
    pub fn new(args: ReplayArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                let config = Config::from_file(path)?;
                config.validate()?;
                config
            }
            None => Config::default(),
        };
        Ok(Self { args, config })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the replay, or write the example configuration when asked to
    pub fn run(&self) -> Result<Option<ReplayReport>> {
        if let Some(path) = &self.args.write_config {
            std::fs::write(path, EXAMPLE_CONFIG)?;
            info!("Example configuration written to {}", path.display());
            return Ok(None);
        }
        let input = self
            .args
            .input
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("no sensor log given".to_string()))?;

        let has_headers = self.args.headers || self.config.replay.has_headers;
        info!("Replaying {}", input.display());
        let mut log = SensorLog::from_path(input, has_headers)?;
        let mut engine = SwimMetricExtractor::with_config(
            self.config.clone(),
            SessionCallback::new(self.args.events),
        )?;

        let progress_interval = secs_to_nanos(self.config.replay.progress_interval_secs)?;
        let mut next_progress: Option<i64> = None;
        let mut session = None;
        let summary = replay(&mut log, &mut engine, |engine, row| {
            let snapshot = engine.state();
            session = engine.callback_mut().timer_mut().intermediate(&snapshot).or(session);

            let due = next_progress.get_or_insert(row.timestamp.saturating_add(progress_interval));
            if row.timestamp >= *due {
                *due = row.timestamp.saturating_add(progress_interval);
                if let Some(times) = session {
                    info!(
                        "{:.0}s elapsed, {} lengths, {:.0}s swimming",
                        nanos_to_secs(times.total_time),
                        times.lengths,
                        nanos_to_secs(times.swim_time)
                    );
                }
                debug!("State: {snapshot:?}");
            }
        })?;

        if summary.skipped > 0 {
            warn!("{} rows skipped for going back in time", summary.skipped);
        }

        let callback = engine.into_callback();
        let lengths = callback.lengths().to_vec();
        let swim_time = callback.timer().completed_swim_time();

        if let Some(path) = &self.args.output {
            write_lengths(File::create(path)?, &lengths)?;
            info!("Wrote {} lengths to {}", lengths.len(), path.display());
        }

        info!(
            "{} rows, {} lengths, {:.1}s swimming",
            summary.rows,
            lengths.len(),
            nanos_to_secs(swim_time)
        );
        if let Some(times) = session {
            info!(
                "Session: {:.1}s total, {:.1}s in lengths",
                nanos_to_secs(times.total_time),
                nanos_to_secs(times.swim_time)
            );
        }

        Ok(Some(ReplayReport {
            summary,
            lengths,
            swim_time,
            session,
        }))
    }
}
