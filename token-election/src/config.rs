//! Location of the lock file and the exchange file.

use std::path::{Path, PathBuf};

/// Default name of the lock file used for master arbitration.
pub const DEFAULT_LOCK_FILE_NAME: &str = "token.lock";

/// Default name of the file holding the shared token content.
pub const DEFAULT_EXCHANGE_FILE_NAME: &str = "token.exchange";

/// Paths shared by every cooperating process.
///
/// All processes that should negotiate with each other must be built from an
/// equal configuration. The default places both files in the working directory.
///
/// ```
/// use token_election::TokenConfig;
///
/// let config = TokenConfig::new()
///     .with_base_dir("/var/run/myapp")
///     .with_lock_file_name("myapp.lock");
///
/// assert!(config.lock_path().ends_with("myapp.lock"));
/// assert!(config.exchange_path().ends_with("token.exchange"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    base_dir: PathBuf,
    lock_file_name: String,
    exchange_file_name: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            lock_file_name: DEFAULT_LOCK_FILE_NAME.to_string(),
            exchange_file_name: DEFAULT_EXCHANGE_FILE_NAME.to_string(),
        }
    }
}

impl TokenConfig {
    /// Create a configuration with the default file names in the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory holding both files
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Set the lock file name
    pub fn with_lock_file_name(mut self, name: impl Into<String>) -> Self {
        self.lock_file_name = name.into();
        self
    }

    /// Set the exchange file name
    pub fn with_exchange_file_name(mut self, name: impl Into<String>) -> Self {
        self.exchange_file_name = name.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Full path of the lock file
    pub fn lock_path(&self) -> PathBuf {
        self.base_dir.join(&self.lock_file_name)
    }

    /// Full path of the exchange file
    pub fn exchange_path(&self) -> PathBuf {
        self.base_dir.join(&self.exchange_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_are_relative_to_working_dir() {
        let config = TokenConfig::default();
        assert_eq!(config.base_dir(), Path::new("."));
        assert_eq!(config.lock_path(), Path::new("./token.lock"));
        assert_eq!(config.exchange_path(), Path::new("./token.exchange"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = TokenConfig::new()
            .with_base_dir("/srv/token")
            .with_lock_file_name("leader.lock")
            .with_exchange_file_name("payload.txt");

        assert_eq!(config.lock_path(), Path::new("/srv/token/leader.lock"));
        assert_eq!(config.exchange_path(), Path::new("/srv/token/payload.txt"));
    }

    #[test]
    fn test_configs_with_same_paths_are_equal() {
        let a = TokenConfig::new().with_base_dir("/a");
        let b = TokenConfig::new().with_base_dir("/a");
        assert_eq!(a, b);
        assert_ne!(a, TokenConfig::new().with_base_dir("/b"));
    }
}
