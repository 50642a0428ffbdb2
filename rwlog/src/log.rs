//! Log handle and lifecycle.

use crate::error::{Result, RwLogError};
use crate::monitor::{Monitor, MonitorCounters};
use crate::ring::RingLog;
use crate::session::{ReadSession, WriteSession};
use std::cell::UnsafeCell;
use tracing::{debug, info};

/// A bounded, append-only log shared by reader and writer threads.
///
/// Readers take snapshots under shared access; writers append under
/// exclusive access with writer preference (see [`crate::monitor`]). The
/// slot storage lives in a memfd-backed shared region sized at creation.
///
/// The handle is `Sync`: share it across threads with `Arc` (or scoped
/// threads) and open sessions from each.
pub struct RwLog {
    monitor: Monitor,
    ring: UnsafeCell<Option<RingLog>>,
    capacity: usize,
}

// SAFETY: the UnsafeCell contents are only mutated while the monitor grants
// exclusive access (append, destroy) and only read while it grants shared or
// exclusive access; the monitor's mutex provides the happens-before edges.
unsafe impl Send for RwLog {}
unsafe impl Sync for RwLog {}

impl RwLog {
    /// Create a log with `capacity` entry slots backed by a fresh shared
    /// region. Fails on zero capacity or if the region cannot be allocated;
    /// failure leaves nothing behind.
    pub fn create(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(RwLogError::InvalidCapacity(0));
        }
        let ring = RingLog::new(capacity)?;
        info!(
            capacity,
            slot_bytes = std::mem::size_of::<crate::Entry>(),
            "ring log created"
        );

        Ok(RwLog {
            monitor: Monitor::new(),
            ring: UnsafeCell::new(Some(ring)),
            capacity,
        })
    }

    /// Open a shared read session. Blocks while a writer is active or
    /// waiting. The session must be dropped (never leaked) or the monitor
    /// deadlocks permanently; there is no timeout.
    pub fn begin_read(&self) -> Result<ReadSession<'_>> {
        self.monitor.begin_read();
        // SAFETY: shared admission held; destroy needs exclusive admission,
        // so the Option cannot change under us.
        if unsafe { self.ring_ref() }.is_none() {
            self.monitor.end_read();
            return Err(RwLogError::NotInitialized);
        }
        Ok(ReadSession::new(self))
    }

    /// Open an exclusive write session stamped with `writer_id`. Blocks
    /// while readers are active or another writer is active; readers
    /// arriving later are held back until this writer has run. The same
    /// no-leak contract as [`begin_read`](Self::begin_read) applies.
    pub fn begin_write(&self, writer_id: u64) -> Result<WriteSession<'_>> {
        self.monitor.begin_write();
        // SAFETY: exclusive admission held.
        if unsafe { self.ring_ref() }.is_none() {
            self.monitor.end_write();
            return Err(RwLogError::NotInitialized);
        }
        Ok(WriteSession::new(self, writer_id))
    }

    /// Tear down the backing storage. Waits for exclusive access first, so
    /// it is safe relative to in-flight sessions, and is idempotent:
    /// destroying an already-destroyed log is a no-op success. Subsequent
    /// `begin_*` calls return [`RwLogError::NotInitialized`].
    pub fn destroy(&self) -> Result<()> {
        self.monitor.begin_write();
        // SAFETY: exclusive admission held; no session can observe the ring
        // while we take it.
        let taken = unsafe { (*self.ring.get()).take() };
        self.monitor.end_write();
        if taken.is_some() {
            info!(capacity = self.capacity, "ring log destroyed");
        } else {
            debug!("destroy on already-destroyed log ignored");
        }
        Ok(())
    }

    /// Wake every thread parked in `begin_read`/`begin_write` without
    /// changing any admission state. For cooperative shutdown only: woken
    /// threads re-check their admission condition, so this never grants
    /// access by itself. Safe to call any number of times, with or without
    /// parked threads.
    pub fn wake_all(&self) {
        self.monitor.wake_all();
    }

    /// Slot capacity fixed at creation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Diagnostic copy of the admission counters.
    pub fn counters(&self) -> MonitorCounters {
        self.monitor.counters()
    }

    pub(crate) fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// # Safety
    ///
    /// Caller must hold shared or exclusive admission via the monitor.
    pub(crate) unsafe fn ring_ref(&self) -> Option<&RingLog> {
        (*self.ring.get()).as_ref()
    }

    /// # Safety
    ///
    /// Caller must hold exclusive admission via the monitor.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn ring_mut(&self) -> Option<&mut RingLog> {
        (*self.ring.get()).as_mut()
    }
}
