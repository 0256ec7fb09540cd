//! Token shell - interactive front end for `token-election`.
//!
//! The binary starts a [`token_election::RoleSession`], announces the role it
//! obtained and then reads commands from stdin:
//!
//! - master: `read`, `write <text>`, `help`, `exit`
//! - observer: `read`, `retry`, `help`, `exit`
//!
//! A successful `retry` switches the shell to the master command set.

pub mod cli;
pub mod shell;

pub use cli::Cli;
pub use shell::{Command, Shell, ShellExit};
