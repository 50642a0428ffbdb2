//! Circular slot storage with overwrite-oldest eviction.
//!
//! `RingLog` owns no synchronization: callers hold the appropriate admission
//! through the [`Monitor`](crate::monitor) before touching it. Appends and
//! snapshots are O(1) per slot and never block.

use crate::entry::Entry;
use crate::error::{Result, RwLogError};
use crate::memory::ShmRegion;
use std::num::NonZeroUsize;
use tracing::trace;

pub(crate) struct RingLog {
    region: ShmRegion,
    capacity: usize,
    head: usize,
    tail: usize,
    count: usize,
    next_sequence: u64,
}

impl RingLog {
    pub(crate) fn new(capacity: usize) -> Result<Self> {
        let bytes = capacity
            .checked_mul(std::mem::size_of::<Entry>())
            .and_then(NonZeroUsize::new)
            .ok_or(RwLogError::InvalidCapacity(capacity))?;
        let region = ShmRegion::new(bytes)?;

        Ok(RingLog {
            region,
            capacity,
            head: 0,
            tail: 0,
            count: 0,
            next_sequence: 1,
        })
    }

    fn slot_ptr(&self, index: usize) -> *mut Entry {
        debug_assert!(index < self.capacity);
        // SAFETY: the region holds exactly `capacity` Entry slots and
        // `index` is a valid slot index.
        unsafe { (self.region.as_ptr().as_ptr() as *mut Entry).add(index) }
    }

    /// Write one entry at `head`, evicting the oldest entry when full.
    /// Requires exclusive access held by the caller. Returns the assigned
    /// sequence number.
    pub(crate) fn append(&mut self, writer_id: u64, payload: &[u8]) -> Result<u64> {
        let entry = Entry::new(self.next_sequence, writer_id, payload)?;
        let sequence = entry.sequence();

        // SAFETY: exclusive access means no concurrent slot reads or writes.
        unsafe {
            self.slot_ptr(self.head).write(entry);
        }

        self.next_sequence += 1;
        self.head = (self.head + 1) % self.capacity;
        if self.count == self.capacity {
            // Full: the slot just written had the oldest live entry.
            self.tail = (self.tail + 1) % self.capacity;
        } else {
            self.count += 1;
        }

        trace!(
            sequence,
            head = self.head,
            tail = self.tail,
            count = self.count,
            "entry appended"
        );
        Ok(sequence)
    }

    /// Copy up to `buf.len()` live entries into `buf`, oldest first, in
    /// ascending sequence order. Requires shared or exclusive access held by
    /// the caller. Returns the number of entries copied.
    pub(crate) fn snapshot(&self, buf: &mut [Entry]) -> usize {
        let n = self.count.min(buf.len());
        for (i, slot) in buf.iter_mut().take(n).enumerate() {
            let index = (self.tail + i) % self.capacity;
            // SAFETY: indices tail..tail+count (mod capacity) hold fully
            // written entries, and the caller's admission excludes writers.
            *slot = unsafe { self.slot_ptr(index).read() };
        }
        n
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn region(&self) -> &ShmRegion {
        &self.region
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use crate::entry::MAX_PAYLOAD;

    fn sequences(buf: &[Entry]) -> Vec<u64> {
        buf.iter().map(Entry::sequence).collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            RingLog::new(0),
            Err(RwLogError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_empty_snapshot() {
        let ring = RingLog::new(4).unwrap();
        let mut buf = vec![Entry::default(); 4];
        assert_eq!(ring.snapshot(&mut buf), 0);
    }

    #[test]
    fn test_append_assigns_increasing_sequences() {
        let mut ring = RingLog::new(8).unwrap();
        assert_eq!(ring.append(1, b"a").unwrap(), 1);
        assert_eq!(ring.append(2, b"b").unwrap(), 2);
        assert_eq!(ring.append(1, b"c").unwrap(), 3);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn test_eviction_keeps_most_recent() {
        // capacity=3, append A,B,C,D: A is evicted, sequence 1 is lost.
        let mut ring = RingLog::new(3).unwrap();
        for payload in [b"A", b"B", b"C", b"D"] {
            ring.append(0, payload).unwrap();
        }

        let mut buf = vec![Entry::default(); 10];
        let n = ring.snapshot(&mut buf);
        assert_eq!(n, 3);
        assert_eq!(sequences(&buf[..n]), vec![2, 3, 4]);
        assert_eq!(buf[0].payload(), b"B");
        assert_eq!(buf[1].payload(), b"C");
        assert_eq!(buf[2].payload(), b"D");
    }

    #[test]
    fn test_eviction_over_many_wraps() {
        let capacity = 5;
        let extra = 13;
        let mut ring = RingLog::new(capacity).unwrap();
        for i in 0..capacity as u64 + extra {
            ring.append(0, format!("m{}", i).as_bytes()).unwrap();
        }

        let mut buf = vec![Entry::default(); capacity];
        let n = ring.snapshot(&mut buf);
        assert_eq!(n, capacity);
        let expected: Vec<u64> = (extra + 1..=extra + capacity as u64).collect();
        assert_eq!(sequences(&buf), expected);
    }

    #[test]
    fn test_snapshot_bounded_by_buffer() {
        let mut ring = RingLog::new(8).unwrap();
        for _ in 0..6 {
            ring.append(0, b"x").unwrap();
        }

        let mut small = vec![Entry::default(); 2];
        assert_eq!(ring.snapshot(&mut small), 2);
        assert_eq!(sequences(&small), vec![1, 2]);

        let mut empty: Vec<Entry> = Vec::new();
        assert_eq!(ring.snapshot(&mut empty), 0);
    }

    #[test]
    fn test_snapshot_sequences_are_consecutive() {
        let mut ring = RingLog::new(7).unwrap();
        for _ in 0..25 {
            ring.append(0, b"x").unwrap();
        }
        let mut buf = vec![Entry::default(); 7];
        let n = ring.snapshot(&mut buf);
        for pair in buf[..n].windows(2) {
            assert_eq!(pair[1].sequence(), pair[0].sequence() + 1);
        }
    }

    #[test]
    fn test_oversized_payload_has_no_side_effect() {
        let mut ring = RingLog::new(4).unwrap();
        ring.append(0, b"ok").unwrap();

        let oversized = [0u8; MAX_PAYLOAD + 1];
        assert!(matches!(
            ring.append(0, &oversized),
            Err(RwLogError::PayloadTooLarge { .. })
        ));

        // The failed append consumed no sequence number and no slot.
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.append(0, b"next").unwrap(), 2);
    }
}
