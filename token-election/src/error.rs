//! Error types for token negotiation

use std::io;
use std::path::PathBuf;

/// Errors that can occur while negotiating or using the token.
///
/// A lock held by another process is not an error; it is reported as
/// [`crate::AcquireOutcome::NotObtained`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The lock file could not be opened or created
    #[error("Failed to open lock file '{path}': {source}")]
    LockFileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The OS rejected the lock attempt for a reason other than contention
    #[error("Failed to acquire lock: {0}")]
    LockAcquisition(#[source] io::Error),

    /// A retry was attempted without an open lock handle
    #[error("Lock handle is not open; acquire() must succeed before retry_acquire()")]
    HandleNotOpen,

    /// The session has not performed its initial acquisition yet
    #[error("Session has not been started")]
    SessionNotStarted,

    /// The session has already released its lock
    #[error("Session has been shut down")]
    SessionClosed,

    /// The exchange file exists but could not be read
    #[error("Failed to read exchange file '{path}': {source}")]
    ExchangeRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The exchange file could not be replaced
    #[error("Failed to write exchange file '{path}': {source}")]
    ExchangeWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TokenError {
    /// Create a LockFileOpen error.
    pub fn lock_file_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LockFileOpen {
            path: path.into(),
            source,
        }
    }

    /// Create an ExchangeRead error.
    pub fn exchange_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ExchangeRead {
            path: path.into(),
            source,
        }
    }

    /// Create an ExchangeWrite error.
    pub fn exchange_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ExchangeWrite {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure means a shared resource could not be reached at all.
    ///
    /// These are the errors a caller is expected to treat as fatal.
    pub fn is_resource_unavailable(&self) -> bool {
        matches!(
            self,
            Self::LockFileOpen { .. } | Self::ExchangeRead { .. } | Self::ExchangeWrite { .. }
        )
    }
}

/// Result type for token operations
pub type Result<T> = std::result::Result<T, TokenError>;
