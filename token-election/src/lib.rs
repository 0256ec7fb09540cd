//! File-lock based master/observer negotiation for processes sharing a token file.
//!
//! Processes on one machine agree on a single writer ("master") for a shared
//! text file by racing for an exclusive advisory lock on a second file. The
//! loser becomes an observer that can read the token and retry later.
//!
//! # Overview
//!
//! - **Non-blocking**: every lock attempt returns immediately; observers poll
//! - **Contention is not an error**: [`AcquireOutcome::NotObtained`] is a normal result
//! - **Crash-safe**: the OS drops the advisory lock when the holder's handle closes
//! - **Configurable**: lock and exchange paths come from [`TokenConfig`]
//!
//! # Example
//!
//! ```no_run
//! use token_election::{ExchangeFile, Role, RoleSession, TokenConfig};
//!
//! let config = TokenConfig::new().with_base_dir("/tmp/shared");
//! let exchange = ExchangeFile::from_config(&config);
//! let mut session = RoleSession::new(&config);
//!
//! match session.start()? {
//!     Role::Master => exchange.write("hello")?,
//!     Role::Observer => println!("token: {}", exchange.read()?),
//! }
//!
//! session.shutdown();
//! # Ok::<(), token_election::TokenError>(())
//! ```

mod config;
mod error;
mod exchange;
mod guard;
mod session;

pub use config::{TokenConfig, DEFAULT_EXCHANGE_FILE_NAME, DEFAULT_LOCK_FILE_NAME};
pub use error::{Result, TokenError};
pub use exchange::{ExchangeFile, NO_CONTENT_SENTINEL};
pub use guard::{AcquireOutcome, LockGuard};
pub use session::{Role, RoleSession};
