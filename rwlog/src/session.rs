//! RAII access sessions.
//!
//! The admission protocol requires every `begin_*` to pair with exactly one
//! `end_*`, including on error paths; an unpaired `begin_*` deadlocks the
//! monitor permanently. The guards below make the pairing automatic: the
//! matching release runs on drop.

use crate::entry::Entry;
use crate::error::{Result, RwLogError};
use crate::log::RwLog;
use std::os::fd::BorrowedFd;

/// Shared read access to the log. Dropping the session releases it.
///
/// Any number of read sessions may be active at once, but none can start
/// while a writer is active or waiting.
pub struct ReadSession<'a> {
    log: &'a RwLog,
}

impl<'a> ReadSession<'a> {
    pub(crate) fn new(log: &'a RwLog) -> Self {
        ReadSession { log }
    }

    /// Copy up to `buf.len()` live entries into `buf`, oldest first, in
    /// ascending sequence order. Returns the number of entries copied; an
    /// empty log or empty buffer yields 0.
    pub fn snapshot(&self, buf: &mut [Entry]) -> Result<usize> {
        // SAFETY: shared admission is held for the lifetime of the session;
        // mutation (append, destroy) requires exclusive admission.
        match unsafe { self.log.ring_ref() } {
            Some(ring) => Ok(ring.snapshot(buf)),
            None => Err(RwLogError::NotInitialized),
        }
    }

    /// Number of live entries at this instant.
    pub fn len(&self) -> Result<usize> {
        // SAFETY: as in `snapshot`.
        match unsafe { self.log.ring_ref() } {
            Some(ring) => Ok(ring.len()),
            None => Err(RwLogError::NotInitialized),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// File descriptor of the shared backing region, valid while the
    /// session is alive. It can be sent to another process and mapped there
    /// for out-of-process inspection.
    pub fn memory_fd(&self) -> Result<BorrowedFd<'_>> {
        // SAFETY: as in `snapshot`.
        match unsafe { self.log.ring_ref() } {
            Some(ring) => Ok(ring.region().fd()),
            None => Err(RwLogError::NotInitialized),
        }
    }
}

impl Drop for ReadSession<'_> {
    fn drop(&mut self) {
        self.log.monitor().end_read();
    }
}

/// Exclusive write access to the log. Dropping the session releases it and
/// wakes the next waiter (a writer if one is parked, otherwise all readers).
///
/// `append` may be called any number of times per session; one session per
/// batch keeps writer critical sections short.
pub struct WriteSession<'a> {
    log: &'a RwLog,
    writer_id: u64,
}

impl<'a> WriteSession<'a> {
    pub(crate) fn new(log: &'a RwLog, writer_id: u64) -> Self {
        WriteSession { log, writer_id }
    }

    /// Append one entry, evicting the oldest if the log is full. Returns
    /// the assigned sequence number. Never blocks; fails only on an
    /// oversized payload (with no side effect) or a destroyed log.
    pub fn append(&mut self, payload: &[u8]) -> Result<u64> {
        // SAFETY: exclusive admission is held for the lifetime of the
        // session; no other reference to the ring exists.
        match unsafe { self.log.ring_mut() } {
            Some(ring) => ring.append(self.writer_id, payload),
            None => Err(RwLogError::NotInitialized),
        }
    }

    /// Snapshot under exclusive access: sees this session's own appends.
    pub fn snapshot(&self, buf: &mut [Entry]) -> Result<usize> {
        // SAFETY: as in `append` (shared reborrow of exclusively held ring).
        match unsafe { self.log.ring_ref() } {
            Some(ring) => Ok(ring.snapshot(buf)),
            None => Err(RwLogError::NotInitialized),
        }
    }
}

impl Drop for WriteSession<'_> {
    fn drop(&mut self) {
        self.log.monitor().end_write();
    }
}
