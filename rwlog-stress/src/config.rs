use std::time::Duration;

/// Run parameters for one stress run.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Slot capacity of the ring log.
    pub capacity: usize,
    /// Number of reader threads.
    pub readers: usize,
    /// Number of writer threads.
    pub writers: usize,
    /// Entries appended per write session.
    pub writer_batch: usize,
    /// Total run time.
    pub duration: Duration,
    /// Reader sleep between sessions.
    pub read_interval: Duration,
    /// Writer sleep between sessions.
    pub write_interval: Duration,
}

impl Default for StressConfig {
    fn default() -> Self {
        StressConfig {
            capacity: 1024,
            readers: 6,
            writers: 4,
            writer_batch: 2,
            duration: Duration::from_secs(10),
            read_interval: Duration::from_millis(2),
            write_interval: Duration::from_millis(3),
        }
    }
}
