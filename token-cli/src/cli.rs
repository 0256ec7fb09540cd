//! CLI definition for the token shell.

use std::path::PathBuf;

use clap::Parser;
use token_election::{TokenConfig, DEFAULT_EXCHANGE_FILE_NAME, DEFAULT_LOCK_FILE_NAME};

/// Token - share one writable token between processes
///
/// The first process becomes master and may write the token. Others start as
/// observers: they can read it and retry to become master.
#[derive(Parser, Debug)]
#[command(name = "token")]
#[command(version)]
#[command(about = "Share one writable token between processes on this machine")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long)]
    pub debug: bool,

    /// Directory holding the lock and exchange files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Name of the lock file inside DIR
    #[arg(long, value_name = "NAME", default_value = DEFAULT_LOCK_FILE_NAME)]
    pub lock_file: String,

    /// Name of the exchange file inside DIR
    #[arg(long, value_name = "NAME", default_value = DEFAULT_EXCHANGE_FILE_NAME)]
    pub exchange_file: String,
}

impl Cli {
    /// Paths shared with the other processes
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new()
            .with_base_dir(&self.dir)
            .with_lock_file_name(&self.lock_file)
            .with_exchange_file_name(&self.exchange_file)
    }
}
