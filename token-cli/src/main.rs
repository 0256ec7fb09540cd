//! Token CLI - share one writable token between processes.
//!
//! Usage:
//! - `token`: negotiate in the working directory and open the shell
//! - `token --dir <DIR>`: negotiate using the files inside DIR
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error (lock or exchange file unreachable)

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use token_cli::{Cli, Shell};
use token_election::{ExchangeFile, RoleSession};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("token_election=debug,token_cli=debug,token=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(result_to_exit(run(&cli)));
}

/// Negotiate the role, run the shell, and release the lock on every path.
fn run(cli: &Cli) -> anyhow::Result<()> {
    println!("Starting application");

    let config = cli.token_config();
    let exchange = ExchangeFile::from_config(&config);
    let mut session = RoleSession::new(&config);

    let result = drive(&mut session, &exchange);

    println!("Release token controller");
    session.shutdown();
    result
}

fn drive(session: &mut RoleSession, exchange: &ExchangeFile) -> anyhow::Result<()> {
    let role = session
        .start()
        .context("cannot negotiate the token lock")?;
    tracing::debug!(role = %role, "negotiated");

    let stdin = io::stdin();
    let exit = Shell::new(session, exchange).run(
        stdin.lock(),
        &mut io::stdout(),
        &mut io::stderr(),
    )?;
    tracing::debug!(?exit, "shell finished");
    Ok(())
}

/// Convert a result to an exit code, reporting the error.
fn result_to_exit(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Failure: {:#}", e);
            1
        }
    }
}
