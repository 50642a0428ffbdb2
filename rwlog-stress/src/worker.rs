//! Reader and writer thread loops.
//!
//! Cancellation is cooperative: each loop polls the shared stop flag
//! between sessions, and the driver calls `wake_all` after setting it so a
//! thread parked in `begin_read`/`begin_write` notices within one wake
//! round-trip instead of at its next pacing interval.

use crate::config::StressConfig;
use crate::stats::StressStats;
use rwlog::{Entry, RwLog};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{debug, warn};

/// Entries a reader pulls per snapshot, matching a consumer that drains in
/// fixed-size chunks rather than whole-log copies.
pub const SNAPSHOT_CHUNK: usize = 128;

pub fn writer_loop(
    log: &RwLog,
    stats: &StressStats,
    stop: &AtomicBool,
    writer_id: u64,
    config: &StressConfig,
) {
    let mut local_count: u64 = 0;

    while !stop.load(Ordering::SeqCst) {
        let wait_start = Instant::now();
        let mut session = match log.begin_write(writer_id) {
            Ok(session) => session,
            Err(e) => {
                warn!(writer_id, error = %e, "begin_write failed, stopping");
                break;
            }
        };
        stats.writer_wait.record_ms(wait_start.elapsed());

        let mut appended = 0u64;
        for _ in 0..config.writer_batch {
            if stop.load(Ordering::SeqCst) {
                break;
            }
            let payload = format!("writer{}-msg{}", writer_id, local_count);
            match session.append(payload.as_bytes()) {
                Ok(_) => {
                    local_count += 1;
                    appended += 1;
                }
                Err(e) => {
                    warn!(writer_id, error = %e, "append failed, stopping");
                    drop(session);
                    stats.add_entries(appended);
                    return;
                }
            }
        }
        drop(session);
        stats.add_entries(appended);

        if !config.write_interval.is_zero() {
            thread::sleep(config.write_interval);
        }
    }
    debug!(writer_id, local_count, "writer stopped");
}

pub fn reader_loop(
    log: &RwLog,
    stats: &StressStats,
    stop: &AtomicBool,
    reader_id: u64,
    config: &StressConfig,
) {
    let mut buf = vec![Entry::default(); SNAPSHOT_CHUNK];
    let mut last_seen: u64 = 0;

    while !stop.load(Ordering::SeqCst) {
        let session_start = Instant::now();
        let session = match log.begin_read() {
            Ok(session) => session,
            Err(e) => {
                warn!(reader_id, error = %e, "begin_read failed, stopping");
                break;
            }
        };

        match session.snapshot(&mut buf) {
            Ok(n) => {
                for pair in buf[..n].windows(2) {
                    if pair[1].sequence() <= pair[0].sequence() {
                        warn!(
                            reader_id,
                            prev = pair[0].sequence(),
                            next = pair[1].sequence(),
                            "sequence monotonicity violation within snapshot"
                        );
                    }
                }
                if n > 0 {
                    last_seen = buf[n - 1].sequence();
                }
            }
            Err(e) => {
                warn!(reader_id, error = %e, "snapshot failed, stopping");
                drop(session);
                break;
            }
        }
        drop(session);
        stats.reader_session.record_ms(session_start.elapsed());

        if !config.read_interval.is_zero() {
            thread::sleep(config.read_interval);
        }
    }
    debug!(reader_id, last_seen, "reader stopped");
}
