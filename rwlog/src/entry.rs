//! Fixed-slot log record.
//!
//! Entries are plain `#[repr(C)]` data so that `capacity * size_of::<Entry>()`
//! sizes the shared region and a slot can be copied in and out with a single
//! `read`/`write`. A fresh region is zero-filled, so `sequence == 0` marks a
//! slot that was never written (assigned sequences start at 1).

use crate::error::{Result, RwLogError};

/// Maximum payload size in bytes. Larger payloads are rejected at append.
pub const MAX_PAYLOAD: usize = 64;

/// One logged record.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    sequence: u64,
    writer_id: u64,
    timestamp_ns: u64,
    payload_len: u32,
    payload: [u8; MAX_PAYLOAD],
}

impl Entry {
    pub(crate) fn new(sequence: u64, writer_id: u64, payload: &[u8]) -> Result<Self> {
        if payload.len() > MAX_PAYLOAD {
            return Err(RwLogError::PayloadTooLarge {
                len: payload.len(),
                max: MAX_PAYLOAD,
            });
        }

        let mut buf = [0u8; MAX_PAYLOAD];
        buf[..payload.len()].copy_from_slice(payload);

        Ok(Entry {
            sequence,
            writer_id,
            timestamp_ns: wall_clock_ns(),
            payload_len: payload.len() as u32,
            payload: buf,
        })
    }

    /// Monotonically increasing sequence number, assigned at append.
    /// Never 0 for a live entry.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Opaque id of the writer that produced this entry. Diagnostics only.
    pub fn writer_id(&self) -> u64 {
        self.writer_id
    }

    /// Wall-clock time of the append, nanoseconds since the Unix epoch.
    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.payload_len as usize]
    }
}

impl Default for Entry {
    fn default() -> Self {
        Entry {
            sequence: 0,
            writer_id: 0,
            timestamp_ns: 0,
            payload_len: 0,
            payload: [0u8; MAX_PAYLOAD],
        }
    }
}

fn wall_clock_ns() -> u64 {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    unsafe {
        libc::clock_gettime(libc::CLOCK_REALTIME, &mut ts);
    }
    ts.tv_sec as u64 * 1_000_000_000 + ts.tv_nsec as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_roundtrip() {
        let entry = Entry::new(1, 7, b"writer7-msg0").unwrap();
        assert_eq!(entry.sequence(), 1);
        assert_eq!(entry.writer_id(), 7);
        assert_eq!(entry.payload(), b"writer7-msg0");
        assert!(entry.timestamp_ns() > 0);
    }

    #[test]
    fn test_empty_payload() {
        let entry = Entry::new(3, 0, b"").unwrap();
        assert_eq!(entry.payload(), b"");
    }

    #[test]
    fn test_max_payload_accepted() {
        let payload = [0xABu8; MAX_PAYLOAD];
        let entry = Entry::new(1, 0, &payload).unwrap();
        assert_eq!(entry.payload(), &payload);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let payload = [0u8; MAX_PAYLOAD + 1];
        let err = Entry::new(1, 0, &payload).unwrap_err();
        assert!(matches!(
            err,
            RwLogError::PayloadTooLarge {
                len,
                max: MAX_PAYLOAD,
            } if len == MAX_PAYLOAD + 1
        ));
    }

    #[test]
    fn test_default_is_zeroed() {
        let entry = Entry::default();
        assert_eq!(entry.sequence(), 0);
        assert_eq!(entry.payload(), b"");
    }
}
