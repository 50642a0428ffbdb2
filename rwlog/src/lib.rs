//! # rwlog - Writer-Preferring Shared Ring Log
//!
//! A bounded, append-only log shared by any number of reader and writer
//! threads. Writers append under exclusive access, readers take consistent
//! snapshots under shared access, and admission is writer-preferring: a
//! waiting writer holds back newly arriving readers, so writers are never
//! starved by continuous read traffic.
//!
//! Storage is a fixed ring of entry slots in a memfd-backed shared region.
//! When the ring is full, an append evicts the oldest entry; sequence
//! numbers keep increasing across wraparound and are never reused.
//!
//! ## Creating a Log
//!
//! ```rust
//! use rwlog::RwLog;
//!
//! let log = RwLog::create(1024)?;
//! assert_eq!(log.capacity(), 1024);
//! # Ok::<(), rwlog::RwLogError>(())
//! ```
//!
//! ## Writing
//!
//! A write session holds exclusive access until dropped. Batch several
//! appends into one session to keep admission overhead off the per-entry
//! path:
//!
//! ```rust
//! # use rwlog::RwLog;
//! # let log = RwLog::create(1024)?;
//! let mut session = log.begin_write(7)?;
//! let first = session.append(b"writer7-msg0")?;
//! let second = session.append(b"writer7-msg1")?;
//! assert_eq!(second, first + 1);
//! drop(session);
//! # Ok::<(), rwlog::RwLogError>(())
//! ```
//!
//! ## Reading
//!
//! A read session may overlap other read sessions. Snapshots copy into a
//! caller-provided buffer, oldest entry first:
//!
//! ```rust
//! # use rwlog::{Entry, RwLog};
//! # let log = RwLog::create(1024)?;
//! # let mut w = log.begin_write(7)?;
//! # w.append(b"hello")?;
//! # drop(w);
//! let session = log.begin_read()?;
//! let mut buf = vec![Entry::default(); 128];
//! let n = session.snapshot(&mut buf)?;
//! for entry in &buf[..n] {
//!     println!("{} {:?}", entry.sequence(), entry.payload());
//! }
//! # Ok::<(), rwlog::RwLogError>(())
//! ```
//!
//! ## Shutdown
//!
//! Cancellation is cooperative: workers poll a stop flag between sessions,
//! and [`RwLog::wake_all`] unparks anything blocked in `begin_read`/
//! `begin_write` so the flag is noticed within one wake round-trip:
//!
//! ```rust
//! # use rwlog::RwLog;
//! # use std::sync::Arc;
//! # use std::sync::atomic::{AtomicBool, Ordering};
//! # let log = Arc::new(RwLog::create(1024)?);
//! let stop = Arc::new(AtomicBool::new(false));
//!
//! stop.store(true, Ordering::SeqCst);
//! log.wake_all();
//! log.destroy()?;
//! log.destroy()?; // idempotent
//! # Ok::<(), rwlog::RwLogError>(())
//! ```
//!
//! ## Liveness contract
//!
//! Sessions release their admission on drop. There is no admission timeout:
//! a session that is leaked (for example with `std::mem::forget`) blocks
//! all future writers, and eventually all readers, permanently.

pub use entry::{Entry, MAX_PAYLOAD};
pub use error::{Result, RwLogError};
pub use log::RwLog;
pub use monitor::MonitorCounters;
pub use session::{ReadSession, WriteSession};

pub mod entry;
pub mod error;
pub mod log;
#[cfg(all(test, feature = "loom"))]
pub(crate) mod loom;
pub(crate) mod memory;
pub mod monitor;
pub(crate) mod ring;
pub mod session;
pub(crate) mod sync;
