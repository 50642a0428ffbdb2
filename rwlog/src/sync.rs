//! Primitive selection: std for normal builds, loom under the `loom`
//! feature so the monitor's admission protocol can be model-checked.

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::{Condvar, Mutex, MutexGuard};

#[cfg(feature = "loom")]
pub(crate) use loom::sync::{Condvar, Mutex, MutexGuard};
