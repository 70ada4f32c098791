//! Swim metrics library for wrist-worn motion sensors.
//!
//! This library turns a stream of orientation and acceleration samples into
//! per-length swim statistics:
//! - Swim/stop classification from pitch
//! - Stroke counting from roll alternation and acceleration peaks
//! - Turn detection from heading drift against the pool direction
//! - Stroke type and turn type classification
//!
//! Everything runs single-pass on the caller's thread: each sample is handled
//! in bounded time and results are delivered through a [`SwimCallback`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use swim_metrics::{Recorder, SwimMetricExtractor};
//!
//! let mut engine = SwimMetricExtractor::new(Recorder::new());
//!
//! // 50 Hz samples, timestamps in nanoseconds, angles in radians
//! for i in 0..3000_i64 {
//!     let t = 10_000_000_000 + i * 20_000_000;
//!     let roll = 0.8 * (std::f64::consts::PI * t as f64 / 1e9).sin();
//!     engine.on_linear_acceleration(t, 0.0, 0.2, 0.0);
//!     engine.on_orientation_change(t, 0.3, 0.05, roll);
//! }
//! engine.finish();
//!
//! for length in &engine.callback().lengths {
//!     println!("{:.1}s, {} strokes, {:?}", length.length_secs(), length.stroke_count, length.stroke);
//! }
//! ```
//!
//! ## Custom Callback
//!
//! ```no_run
//! use swim_metrics::{Event, LengthStatistics, SwimCallback, SwimMetricExtractor, config::Config};
//!
//! struct Printer;
//!
//! impl SwimCallback for Printer {
//!     fn on_event(&mut self, event: &Event) {
//!         println!("{:?}", event);
//!     }
//!
//!     fn on_length_complete(&mut self, stats: LengthStatistics) {
//!         println!("length: {:.1}s", stats.length_secs());
//!     }
//! }
//!
//! # fn main() -> swim_metrics::Result<()> {
//! let config = Config::from_file("swim.yaml")?;
//! let mut engine = SwimMetricExtractor::with_config(config, Printer)?;
//! engine.on_orientation_change(1_000_000_000, 0.0, 0.1, 0.0);
//! # Ok(())
//! # }
//! ```

/// Replay application and command line arguments
pub mod app;

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

/// Resampled signal detectors for kicks and taps
pub mod detectors;

/// The streaming swim classifier
pub mod engine;

/// Error types and result handling
pub mod error;

/// Event types and the per-length event log
pub mod events;

/// Completed length reports and the reporting guard
pub mod length;

/// Sensor log reading and replay
pub mod replay;

/// Sensor sample value types
pub mod sample;

/// Per-length working state
pub mod state;

/// Whole-session timing
pub mod timer;

/// Angle helpers and safe numeric conversions
pub mod utils;

pub use engine::{Recorder, SwimCallback, SwimMetricExtractor};
pub use error::{Error, Result};
pub use events::{Event, EventKind, RollState};
pub use length::{LengthStatistics, TurnKind};
pub use sample::{Sample, Timestamp};
pub use state::{StrokeKind, SwimSnapshot, SwimState};
