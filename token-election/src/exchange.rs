//! Shared token content stored in the exchange file

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::debug;

use crate::config::TokenConfig;
use crate::error::{Result, TokenError};

/// Content returned by [`ExchangeFile::read`] when the file does not exist.
pub const NO_CONTENT_SENTINEL: &str = "<no-file>";

/// Text blob shared between all cooperating processes.
///
/// Reads and writes are not coordinated with the lock; callers decide who may
/// write.
#[derive(Debug, Clone)]
pub struct ExchangeFile {
    path: PathBuf,
}

impl ExchangeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Exchange file at the location named by `config`
    pub fn from_config(config: &TokenConfig) -> Self {
        Self::new(config.exchange_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole content, or [`NO_CONTENT_SENTINEL`] if the file is missing.
    pub fn read(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Exchange file missing");
                Ok(NO_CONTENT_SENTINEL.to_string())
            }
            Err(e) => Err(TokenError::exchange_read(&self.path, e)),
        }
    }

    /// Replace the whole content.
    ///
    /// The text is written to a temporary file next to the target and renamed
    /// over it, so readers see either the old or the new content. The target
    /// keeps its permissions; a new file gets the process default mode.
    pub fn write(&self, content: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let existing = match fs::metadata(&self.path) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(TokenError::exchange_write(&self.path, e)),
        };

        #[cfg_attr(not(unix), allow(unused_mut))]
        let mut builder = Builder::new();
        #[cfg(unix)]
        if existing.is_none() {
            use std::os::unix::fs::PermissionsExt;
            // Subject to the umask, like a plain create
            builder.permissions(fs::Permissions::from_mode(0o666));
        }

        let mut staged = builder
            .tempfile_in(dir)
            .map_err(|e| TokenError::exchange_write(&self.path, e))?;
        if let Some(permissions) = existing {
            staged
                .as_file()
                .set_permissions(permissions)
                .map_err(|e| TokenError::exchange_write(&self.path, e))?;
        }
        staged
            .write_all(content.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| TokenError::exchange_write(&self.path, e))?;
        staged
            .persist(&self.path)
            .map_err(|e| TokenError::exchange_write(&self.path, e.error))?;

        debug!(path = %self.path.display(), bytes = content.len(), "Exchange file written");
        Ok(())
    }
}
