//! Writer-preferring admission monitor.
//!
//! A generic shared/exclusive lock cannot express the fairness policy this
//! log needs: an arriving reader must also yield to *waiting* writers, not
//! just active ones, so a continuous stream of readers can never starve a
//! writer. The policy is implemented as an explicit state machine behind one
//! mutex and two condition variables.
//!
//! A writer that begins waiting runs before any reader that arrives after
//! it; its wait is bounded by the readers that were already active at that
//! moment.

use crate::sync::{Condvar, Mutex, MutexGuard};
use std::sync::PoisonError;
use tracing::trace;

#[derive(Default)]
struct State {
    readers_active: usize,
    readers_waiting: usize,
    writers_waiting: usize,
    writer_active: bool,
}

/// Point-in-time copy of the monitor's counters, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorCounters {
    pub readers_active: usize,
    pub readers_waiting: usize,
    pub writers_waiting: usize,
    pub writer_active: bool,
}

pub(crate) struct Monitor {
    state: Mutex<State>,
    read_cond: Condvar,
    write_cond: Condvar,
}

impl Monitor {
    pub(crate) fn new() -> Self {
        Monitor {
            state: Mutex::new(State::default()),
            read_cond: Condvar::new(),
            write_cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until no writer is active and none is waiting, then join the
    /// active readers.
    pub(crate) fn begin_read(&self) {
        let mut state = self.lock();
        while state.writer_active || state.writers_waiting > 0 {
            state.readers_waiting += 1;
            state = self
                .read_cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            state.readers_waiting -= 1;
        }
        state.readers_active += 1;
        trace!(readers_active = state.readers_active, "reader admitted");
    }

    /// Leave the active readers; the last one out hands the log to a
    /// waiting writer.
    pub(crate) fn end_read(&self) {
        let mut state = self.lock();
        state.readers_active -= 1;
        trace!(readers_active = state.readers_active, "reader released");
        if state.readers_active == 0 && state.writers_waiting > 0 {
            self.write_cond.notify_one();
        }
    }

    /// Block until the log is idle, then take exclusive access. The
    /// `writers_waiting` increment happens before the wait so that readers
    /// arriving in the meantime hold back.
    pub(crate) fn begin_write(&self) {
        let mut state = self.lock();
        state.writers_waiting += 1;
        while state.readers_active > 0 || state.writer_active {
            state = self
                .write_cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.writers_waiting -= 1;
        state.writer_active = true;
        trace!(writers_waiting = state.writers_waiting, "writer admitted");
    }

    /// Release exclusive access. A waiting writer is woken alone (writer
    /// priority, and never more than one so writers cannot race); only when
    /// no writer waits do all parked readers get in.
    pub(crate) fn end_write(&self) {
        let mut state = self.lock();
        state.writer_active = false;
        trace!(
            writers_waiting = state.writers_waiting,
            readers_waiting = state.readers_waiting,
            "writer released"
        );
        if state.writers_waiting > 0 {
            self.write_cond.notify_one();
        } else {
            self.read_cond.notify_all();
        }
    }

    /// Wake every parked reader and writer without touching the counters.
    /// Only bounds shutdown latency; woken threads re-check their admission
    /// condition and re-park if it still holds.
    pub(crate) fn wake_all(&self) {
        let _state = self.lock();
        self.read_cond.notify_all();
        self.write_cond.notify_all();
    }

    pub(crate) fn counters(&self) -> MonitorCounters {
        let state = self.lock();
        MonitorCounters {
            readers_active: state.readers_active,
            readers_waiting: state.readers_waiting,
            writers_waiting: state.writers_waiting,
            writer_active: state.writer_active,
        }
    }
}
