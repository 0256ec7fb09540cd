//! Exclusive advisory lock on the lock file
//!
//! The lock is taken with a single non-blocking attempt. A lock held by another
//! process is reported as [`AcquireOutcome::NotObtained`], never as an error, so
//! callers can poll without treating contention as a failure.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::{Result, TokenError};

/// Result of one non-blocking lock attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// This handle now holds the exclusive lock
    Obtained,
    /// Another handle holds the lock
    NotObtained,
}

impl AcquireOutcome {
    pub fn is_obtained(self) -> bool {
        matches!(self, Self::Obtained)
    }
}

/// Owner of the lock file handle and of the lock taken through it.
///
/// The handle is opened by the first [`acquire`](Self::acquire) and kept open
/// until [`release`](Self::release), so later retries reuse the same handle.
/// Dropping the guard releases it as well.
#[derive(Debug)]
pub struct LockGuard {
    /// Path to the lock file
    path: PathBuf,
    /// Open handle on the lock file, if any
    file: Option<File>,
    /// Whether the lock was obtained through `file`
    held: bool,
}

impl LockGuard {
    /// Create a guard for the given lock path without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            held: false,
        }
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the lock file handle is currently open
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Open the lock file (creating it if absent) and try once to lock it.
    ///
    /// Fails only when the lock file cannot be opened. If the handle is
    /// already open the attempt is made on the existing handle.
    pub fn acquire(&mut self) -> Result<AcquireOutcome> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&self.path)
                .map_err(|e| TokenError::lock_file_open(&self.path, e))?;
            debug!(path = %self.path.display(), "Opened lock file");
            self.file = Some(file);
        }
        self.try_lock()
    }

    /// Try once more to lock the handle opened by a previous [`acquire`](Self::acquire).
    pub fn retry_acquire(&mut self) -> Result<AcquireOutcome> {
        if self.file.is_none() {
            return Err(TokenError::HandleNotOpen);
        }
        self.try_lock()
    }

    /// Whether this guard holds a lock that is still backed by the lock path.
    ///
    /// The lock counts as lost when the lock file has been deleted or replaced
    /// since it was locked, because a new holder could then lock the new file.
    pub fn is_held(&self) -> bool {
        match &self.file {
            Some(file) if self.held => still_backs_path(file, &self.path),
            _ => false,
        }
    }

    /// Release the lock if held and close the handle.
    ///
    /// Errors are logged and swallowed. Calling this repeatedly, or without a
    /// prior acquisition, does nothing.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            if self.held {
                match FileExt::unlock(&file) {
                    Ok(()) => debug!(path = %self.path.display(), "Released lock"),
                    Err(e) => {
                        warn!(path = %self.path.display(), error = %e, "Failed to release lock")
                    }
                }
            }
            drop(file);
            debug!(path = %self.path.display(), "Closed lock file");
        }
        self.held = false;
    }

    fn try_lock(&mut self) -> Result<AcquireOutcome> {
        let file = self.file.as_ref().ok_or(TokenError::HandleNotOpen)?;
        if self.held {
            return Ok(AcquireOutcome::Obtained);
        }

        match file.try_lock_exclusive() {
            Ok(()) => {
                self.held = true;
                debug!(path = %self.path.display(), "Lock obtained");
                Ok(AcquireOutcome::Obtained)
            }
            Err(e) if is_contended(&e) => {
                debug!(path = %self.path.display(), "Lock held elsewhere");
                Ok(AcquireOutcome::NotObtained)
            }
            Err(e) => Err(TokenError::LockAcquisition(e)),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.release();
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(unix)]
fn still_backs_path(file: &File, path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (file.metadata(), std::fs::metadata(path)) {
        (Ok(open), Ok(on_disk)) => open.dev() == on_disk.dev() && open.ino() == on_disk.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn still_backs_path(_file: &File, path: &Path) -> bool {
    path.exists()
}
