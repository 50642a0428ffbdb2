use thiserror::Error;

#[derive(Error, Debug)]
pub enum RwLogError {
    #[error("log is not initialized (already destroyed)")]
    NotInitialized,

    #[error("capacity must be greater than zero, got {0}")]
    InvalidCapacity(usize),

    #[error("payload of {len} bytes exceeds the {max} byte slot limit")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("shared region allocation failed: {0}")]
    AllocationFailed(#[from] nix::errno::Errno),
}

pub type Result<T> = std::result::Result<T, RwLogError>;
