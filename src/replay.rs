//! Sensor log replay.
//!
//! A log is a CSV file with one row per sensor reading:
//! `timestamp_ns, lin_x, lin_y, lin_z, yaw, pitch, roll`. Columns are read by
//! position, `#` lines are comments and fields are trimmed.

use crate::engine::{SwimCallback, SwimMetricExtractor};
use crate::sample::Timestamp;
use crate::{Error, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One log row: linear acceleration (m/s²) and orientation (radians)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LogRow {
    pub timestamp: Timestamp,
    pub lin_x: f64,
    pub lin_y: f64,
    pub lin_z: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl LogRow {
    /// Push this row into an engine, acceleration first
    pub fn feed<C: SwimCallback>(&self, engine: &mut SwimMetricExtractor<C>) {
        engine.on_linear_acceleration(self.timestamp, self.lin_x, self.lin_y, self.lin_z);
        engine.on_orientation_change(self.timestamp, self.yaw, self.pitch, self.roll);
    }
}

/// Row reader that drops rows whose timestamp goes backwards
pub struct SensorLog<R: Read> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
    last_timestamp: Option<Timestamp>,
    rows: usize,
    skipped: usize,
}

impl SensorLog<File> {
    /// Open a log file
    pub fn from_path<P: AsRef<Path>>(path: P, has_headers: bool) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, has_headers))
    }
}

impl<R: Read> SensorLog<R> {
    pub fn from_reader(reader: R, has_headers: bool) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);
        Self {
            reader,
            record: csv::StringRecord::new(),
            last_timestamp: None,
            rows: 0,
            skipped: 0,
        }
    }

    /// Rows handed out so far
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rows dropped for going back in time
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Next in-order row, or `None` at end of input
    pub fn next_row(&mut self) -> Result<Option<LogRow>> {
        loop {
            if !self.reader.read_record(&mut self.record)? {
                return Ok(None);
            }
            let row: LogRow = self.record.deserialize(None)?;
            if let Some(last) = self.last_timestamp {
                if row.timestamp < last {
                    let line = self.record.position().map_or(0, csv::Position::line);
                    warn!(
                        "Skipping line {line}: timestamp {} is before {last}",
                        row.timestamp
                    );
                    self.skipped += 1;
                    continue;
                }
            }
            self.last_timestamp = Some(row.timestamp);
            self.rows += 1;
            return Ok(Some(row));
        }
    }
}

impl<R: Read> Iterator for SensorLog<R> {
    type Item = Result<LogRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

/// Counts from one replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    pub rows: usize,
    pub skipped: usize,
    pub first_timestamp: Timestamp,
    pub last_timestamp: Timestamp,
}

impl ReplaySummary {
    /// Sensor time covered by the log, in nanoseconds
    #[must_use]
    pub fn duration(&self) -> i64 {
        self.last_timestamp - self.first_timestamp
    }
}

/// Run every row of `log` through `engine`, then finalize the last length.
///
/// `after_row` is called once per row after the engine has seen it.
///
/// # Errors
///
/// Fails on unreadable or malformed rows, or when the log holds no rows.
pub fn replay<R, C, F>(
    log: &mut SensorLog<R>,
    engine: &mut SwimMetricExtractor<C>,
    mut after_row: F,
) -> Result<ReplaySummary>
where
    R: Read,
    C: SwimCallback,
    F: FnMut(&mut SwimMetricExtractor<C>, &LogRow),
{
    let mut summary = ReplaySummary::default();
    while let Some(row) = log.next_row()? {
        if summary.rows == 0 {
            summary.first_timestamp = row.timestamp;
        }
        row.feed(engine);
        after_row(engine, &row);
        summary.rows += 1;
        summary.last_timestamp = row.timestamp;
    }
    summary.skipped = log.skipped();

    if summary.rows == 0 {
        return Err(Error::ReplayError("sensor log contains no rows".to_string()));
    }

    engine.finish();
    debug!(
        "Replayed {} rows ({} skipped) over {} ns",
        summary.rows,
        summary.skipped,
        summary.duration()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Recorder;
    use crate::events::EventKind;

    const LOG: &str = "\
# timestamp_ns, lin_x, lin_y, lin_z, yaw, pitch, roll
1000000000, 0.0, 0.1, 0.0, 0.0, 1.2, 0.0
2000000000 , 0.0, 0.1, 0.0, 0.0, 0.1, 0.0
1500000000, 0.0, 0.1, 0.0, 0.0, 0.1, 0.0
3000000000, 0.0, 0.1, 0.0, 0.0, 0.1, 0.0
";

    #[test]
    fn test_reads_rows_and_skips_backwards() {
        let mut log = SensorLog::from_reader(LOG.as_bytes(), false);
        let rows: Vec<LogRow> = log.by_ref().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].timestamp, 2_000_000_000);
        assert_eq!(rows[2].timestamp, 3_000_000_000);
        assert_eq!(log.rows(), 3);
        assert_eq!(log.skipped(), 1);
    }

    #[test]
    fn test_header_row() {
        let text = "timestamp_ns,lin_x,lin_y,lin_z,yaw,pitch,roll\n5,0,0,0,0.5,0,0\n";
        let mut log = SensorLog::from_reader(text.as_bytes(), true);
        let row = log.next_row().unwrap().unwrap();
        assert_eq!(row.timestamp, 5);
        assert_eq!(row.yaw, 0.5);
        assert!(log.next_row().unwrap().is_none());
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let mut log = SensorLog::from_reader("1,2,3\n".as_bytes(), false);
        assert!(matches!(log.next_row(), Err(Error::Csv(_))));

        let mut log = SensorLog::from_reader("x,0,0,0,0,0,0\n".as_bytes(), false);
        assert!(log.next_row().is_err());
    }

    #[test]
    fn test_replay_drives_engine() {
        let mut log = SensorLog::from_reader(LOG.as_bytes(), false);
        let mut engine = SwimMetricExtractor::new(Recorder::new());
        let mut seen = 0;
        let summary = replay(&mut log, &mut engine, |_, _| seen += 1).unwrap();
        assert_eq!(seen, 3);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.duration(), 2_000_000_000);
        assert_eq!(engine.callback().count(EventKind::LengthStart), 1);
    }

    #[test]
    fn test_empty_log_is_an_error() {
        let mut log = SensorLog::from_reader("# nothing\n".as_bytes(), false);
        let mut engine = SwimMetricExtractor::new(Recorder::new());
        let err = replay(&mut log, &mut engine, |_, _| {}).unwrap_err();
        assert!(matches!(err, Error::ReplayError(_)));
    }
}
