//! Run statistics: wait-time samplers and the end-of-run summary.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Cap on retained samples per recorder, so a long run cannot grow without
/// bound. Recording past the cap still counts entries, it just stops
/// retaining samples.
const MAX_SAMPLES: usize = 10_000;

#[derive(Default)]
pub struct Recorder {
    samples: Mutex<Vec<f64>>,
}

impl Recorder {
    pub fn record_ms(&self, value: Duration) {
        let mut samples = self
            .samples
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if samples.len() < MAX_SAMPLES {
            samples.push(value.as_secs_f64() * 1000.0);
        }
    }

    pub fn average_ms(&self) -> f64 {
        let samples = self
            .samples
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if samples.is_empty() {
            0.0
        } else {
            samples.iter().sum::<f64>() / samples.len() as f64
        }
    }

    pub fn count(&self) -> usize {
        self.samples
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

/// Shared by all workers during a run.
#[derive(Default)]
pub struct StressStats {
    /// Time each writer spent blocked in `begin_write`.
    pub writer_wait: Recorder,
    /// Wall time of each complete reader session.
    pub reader_session: Recorder,
    pub entries_written: AtomicU64,
}

impl StressStats {
    pub fn add_entries(&self, n: u64) {
        self.entries_written.fetch_add(n, Ordering::Relaxed);
    }

    pub fn summary(&self, elapsed: Duration) -> StressSummary {
        let total_entries = self.entries_written.load(Ordering::Relaxed);
        StressSummary {
            avg_writer_wait_ms: self.writer_wait.average_ms(),
            avg_reader_session_ms: self.reader_session.average_ms(),
            write_sessions: self.writer_wait.count(),
            total_entries,
            entries_per_sec: total_entries as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StressSummary {
    pub avg_writer_wait_ms: f64,
    pub avg_reader_session_ms: f64,
    pub write_sessions: usize,
    pub total_entries: u64,
    pub entries_per_sec: f64,
}

impl std::fmt::Display for StressSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "average writer wait:          {:.2} ms", self.avg_writer_wait_ms)?;
        writeln!(f, "average reader session:       {:.2} ms", self.avg_reader_session_ms)?;
        writeln!(f, "write sessions:               {}", self.write_sessions)?;
        writeln!(f, "total entries written:        {}", self.total_entries)?;
        write!(f, "throughput:                   {:.2} entries/s", self.entries_per_sec)
    }
}
