//! Helper functions and utilities for tests
#![allow(dead_code)]

use std::f64::consts::PI;
use swim_metrics::config::Config;
use swim_metrics::constants::GRAVITY_EARTH;
use swim_metrics::{Recorder, Result, SwimMetricExtractor, Timestamp};

pub const SEC: i64 = 1_000_000_000;

/// 50 Hz sensor rate
pub const SAMPLE_PERIOD: i64 = 20_000_000;

/// Pitch of an upright swimmer (head up)
pub const UPRIGHT: f64 = 1.2;

/// Pitch during a tumble turn (head down)
pub const HEAD_DOWN: f64 = -1.2;

/// Pitch while swimming
pub const HORIZONTAL: f64 = 0.05;

/// Wrap an angle into (-π, π]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

fn sample_count(secs: f64) -> i64 {
    (secs * 50.0).round() as i64
}

/// Scripted swimmer driving an engine at 50 Hz.
///
/// Every sample is a linear acceleration followed by an orientation with the
/// same timestamp, like a replayed sensor log.
pub struct Swimmer {
    pub engine: SwimMetricExtractor<Recorder>,
    /// Timestamp of the next sample
    pub t: Timestamp,
    /// Current swimming heading in radians
    pub heading: f64,
    /// Feed raw acceleration (gravity included) instead of linear
    pub global_accel: bool,
    /// Every linear sample as a replay log row
    pub log: Vec<String>,
}

impl Swimmer {
    /// Swimmer whose clock starts at 10 s
    pub fn new() -> Self {
        Self {
            engine: SwimMetricExtractor::new(Recorder::new()),
            t: 10 * SEC,
            heading: 0.0,
            global_accel: false,
            log: Vec::new(),
        }
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            engine: SwimMetricExtractor::with_config(config, Recorder::new())?,
            ..Self::new()
        })
    }

    pub fn recorder(&self) -> &Recorder {
        self.engine.callback()
    }

    /// One sample with the given orientation and forward (y) acceleration
    pub fn sample(&mut self, yaw: f64, pitch: f64, roll: f64, accel_y: f64) {
        let t = self.t;
        if self.global_accel {
            self.engine
                .on_global_acceleration(t, 0.0, 0.0, GRAVITY_EARTH + accel_y);
        } else {
            self.engine.on_linear_acceleration(t, 0.0, accel_y, 0.0);
            self.log.push(format!("{t},0,{accel_y},0,{yaw},{pitch},{roll}"));
        }
        self.engine.on_orientation_change(t, yaw, pitch, roll);
        self.t += SAMPLE_PERIOD;
    }

    /// Stand upright, facing the current heading
    pub fn stand(&mut self, secs: f64) -> &mut Self {
        for _ in 0..sample_count(secs) {
            self.sample(self.heading, UPRIGHT, 0.0, 0.0);
        }
        self
    }

    /// Horizontal with no roll and no kicks
    pub fn glide(&mut self, secs: f64) -> &mut Self {
        for _ in 0..sample_count(secs) {
            self.sample(self.heading, HORIZONTAL, 0.0, 0.0);
        }
        self
    }

    /// Front crawl: roll swings ±0.8 rad with a 2 s period
    pub fn crawl(&mut self, secs: f64) -> &mut Self {
        for i in 0..sample_count(secs) {
            let tau = i as f64 / 50.0;
            let roll = 0.8 * (PI * tau).sin();
            self.sample(self.heading, HORIZONTAL, roll, 0.0);
        }
        self
    }

    /// Backstroke: upside down, roll swings ±0.8 rad around π
    pub fn backstroke(&mut self, secs: f64) -> &mut Self {
        for i in 0..sample_count(secs) {
            let tau = i as f64 / 50.0;
            let roll = wrap_angle(PI + 0.8 * (PI * tau).sin());
            self.sample(self.heading, HORIZONTAL, roll, 0.0);
        }
        self
    }

    /// Breaststroke: flat, with a 0.2 s kick of 4 m/s² every 2 s starting 2.5 s in
    pub fn breaststroke(&mut self, secs: f64) -> &mut Self {
        for i in 0..sample_count(secs) {
            let kicking = i >= 125 && (i - 125) % 100 < 10;
            let accel = if kicking { 4.0 } else { 0.0 };
            self.sample(self.heading, HORIZONTAL, 0.0, accel);
        }
        self
    }

    /// Head-down turn, rotating the heading by π over `secs`
    pub fn flip_turn(&mut self, secs: f64) -> &mut Self {
        self.turn(secs, HEAD_DOWN)
    }

    /// Head-up turn, rotating the heading by π over `secs`
    pub fn open_turn(&mut self, secs: f64) -> &mut Self {
        self.turn(secs, UPRIGHT)
    }

    fn turn(&mut self, secs: f64, pitch: f64) -> &mut Self {
        let n = sample_count(secs);
        let start = self.heading;
        for i in 0..n {
            let yaw = wrap_angle(start + PI * i as f64 / n as f64);
            self.sample(yaw, pitch, 0.0, 0.0);
        }
        self.heading = wrap_angle(start + PI);
        self
    }

    /// Skip ahead without samples
    pub fn gap(&mut self, secs: f64) -> &mut Self {
        self.t += (secs * SEC as f64) as i64;
        self
    }

    pub fn finish(&mut self) -> &mut Self {
        self.engine.finish();
        self
    }
}

/// Write the recorded rows to a fresh file in the temp directory
pub fn write_log(name: &str, rows: &[String]) -> std::io::Result<std::path::PathBuf> {
    let path = std::env::temp_dir().join(format!("swim_metrics_{}_{name}.csv", std::process::id()));
    let mut text = String::from("# timestamp_ns, lin_x, lin_y, lin_z, yaw, pitch, roll\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    std::fs::write(&path, text)?;
    Ok(path)
}

/// Assert that a duration in nanoseconds is within 50 ms of `secs`
pub fn assert_secs(actual: i64, secs: f64) {
    let actual_secs = actual as f64 / SEC as f64;
    assert!(
        (actual_secs - secs).abs() < 0.05,
        "expected about {secs}s, got {actual_secs}s"
    );
}
