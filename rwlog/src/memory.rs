//! Shared-memory backing region.
//!
//! The slot array lives in a memfd-backed mapping rather than plain heap
//! memory so the log can be inspected from outside the process: the region's
//! file descriptor can be passed over a unix socket and mapped elsewhere.
//! Swapping in an in-process buffer would only touch this module.

use crate::error::Result;
use core::ptr::NonNull;
use nix::sys::memfd::{memfd_create, MFdFlags};
use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};
use nix::unistd::ftruncate;
use std::num::NonZeroUsize;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};

pub(crate) struct ShmRegion {
    ptr: NonNull<u8>,
    len: NonZeroUsize,
    fd: OwnedFd,
}

impl ShmRegion {
    pub(crate) fn new(len: NonZeroUsize) -> Result<Self> {
        let fd = memfd_create(c"rwlog", MFdFlags::MFD_CLOEXEC)?;
        ftruncate(&fd, len.get() as i64)?;

        let ptr = unsafe {
            mmap(
                None,
                len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                &fd,
                0,
            )?
        };

        Ok(ShmRegion {
            ptr: ptr.cast(),
            len,
            fd,
        })
    }

    pub(crate) fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    pub(crate) fn len(&self) -> usize {
        self.len.get()
    }

    pub(crate) fn fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl Drop for ShmRegion {
    fn drop(&mut self) {
        unsafe {
            let _ = munmap(self.ptr.cast(), self.len.get());
        }
    }
}

unsafe impl Send for ShmRegion {}
unsafe impl Sync for ShmRegion {}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(len: usize) -> ShmRegion {
        ShmRegion::new(NonZeroUsize::new(len).unwrap()).unwrap()
    }

    #[test]
    fn test_region_is_zero_filled() {
        let region = region(4096);
        let ptr = region.as_ptr().as_ptr();
        unsafe {
            for i in 0..region.len() {
                assert_eq!(ptr.add(i).read(), 0, "byte {} not zero", i);
            }
        }
    }

    #[test]
    fn test_region_readback() {
        let region = region(4096);
        let ptr = region.as_ptr().as_ptr();
        unsafe {
            for i in 0..region.len() {
                ptr.add(i).write((i % 251) as u8);
            }
            for i in 0..region.len() {
                assert_eq!(ptr.add(i).read(), (i % 251) as u8);
            }
        }
    }

    #[test]
    fn test_region_keeps_fd_open() {
        use std::os::fd::AsRawFd;

        let region = region(4096);
        assert!(region.fd().as_raw_fd() >= 0);
    }

    #[test]
    fn test_unaligned_length() {
        // No page-multiple requirement: the length is whatever the slot
        // array needs.
        let region = region(88 * 3);
        assert_eq!(region.len(), 264);
    }
}
