//! Line-oriented command loop driving a [`RoleSession`].
//!
//! The command set depends on the role: a master can `write` the token, an
//! observer can `retry` to become master. Both can `read`, `help` and `exit`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use token_election::{ExchangeFile, Role, RoleSession, TokenError};

const PROMPT: &str = "$ ";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Exit,
    Read,
    Write(String),
    Retry,
    /// Unknown, or not available in the current role
    Invalid(String),
}

impl Command {
    /// Parse a line against the commands available to `role`
    pub fn parse(line: &str, role: Role) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word, role) {
            ("", _) => Command::Empty,
            ("help", _) if rest.is_empty() => Command::Help,
            ("exit", _) if rest.is_empty() => Command::Exit,
            ("read", _) if rest.is_empty() => Command::Read,
            ("write", Role::Master) => Command::Write(rest.to_string()),
            ("retry", Role::Observer) if rest.is_empty() => Command::Retry,
            _ => Command::Invalid(line.to_string()),
        }
    }
}

/// Why the command loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    /// The operator typed `exit`
    Requested,
    /// The input stream was closed
    EndOfInput,
}

/// Interactive shell over a started session and the exchange file
pub struct Shell<'a> {
    session: &'a mut RoleSession,
    exchange: &'a ExchangeFile,
}

impl<'a> Shell<'a> {
    pub fn new(session: &'a mut RoleSession, exchange: &'a ExchangeFile) -> Self {
        Self { session, exchange }
    }

    /// Run commands from `input` until `exit` or end of input.
    ///
    /// Command output goes to `out`, complaints about invalid input go to
    /// `err`. Failures to reach the exchange file end the loop with an error.
    pub fn run<R, W, E>(&mut self, mut input: R, out: &mut W, err: &mut E) -> Result<ShellExit>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut role = self
            .session
            .current_role()
            .ok_or(TokenError::SessionNotStarted)?;
        writeln!(out, "Starting as {}", role)?;

        let mut raw = Vec::new();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            raw.clear();
            if input
                .read_until(b'\n', &mut raw)
                .context("failed to read command")?
                == 0
            {
                tracing::debug!("input closed");
                return Ok(ShellExit::EndOfInput);
            }
            // Undecodable bytes become U+FFFD and fall through to Invalid
            let line = String::from_utf8_lossy(&raw);

            match Command::parse(&line, role) {
                Command::Empty => {}
                Command::Help => print_help(out, role)?,
                Command::Exit => {
                    writeln!(out, "Exiting application")?;
                    return Ok(ShellExit::Requested);
                }
                Command::Read => {
                    let content = self.exchange.read()?;
                    writeln!(out, "   Content: '{}'", content)?;
                }
                Command::Write(content) => {
                    self.exchange.write(&content)?;
                    writeln!(out, "   Content: '{}'", content)?;
                }
                Command::Retry => {
                    writeln!(out, "Re-trying acquire token")?;
                    role = self.session.try_promote()?;
                    if role == Role::Master {
                        writeln!(out, "   lock acquired")?;
                        writeln!(out, "Starting as {}", role)?;
                    } else {
                        writeln!(out, "   lock NOT acquired")?;
                    }
                }
                Command::Invalid(text) => {
                    writeln!(err, "Invalid command: '{}'", text)?;
                }
            }
        }
    }
}

fn print_help<W: Write>(out: &mut W, role: Role) -> std::io::Result<()> {
    writeln!(out, "   available commands:")?;
    writeln!(out, "      help  : show this list")?;
    writeln!(out, "      exit  : exit application")?;
    writeln!(out, "      read  : read and display the content of the token")?;
    match role {
        Role::Master => writeln!(out, "      write : write a content into the token"),
        Role::Observer => writeln!(out, "      retry : retry to acquire the token"),
    }
}
