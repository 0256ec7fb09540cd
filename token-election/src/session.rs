//! Master/observer role negotiation on top of [`LockGuard`]

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::TokenConfig;
use crate::error::{Result, TokenError};
use crate::guard::{AcquireOutcome, LockGuard};

/// Role a process settled into after negotiating the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Holds the lock and owns the exchange file
    Master,
    /// Lock is held elsewhere; may retry to become master
    Observer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Master => write!(f, "master"),
            Role::Observer => write!(f, "observer"),
        }
    }
}

/// Per-process view of the negotiation.
///
/// A session starts undetermined, settles into [`Role::Master`] or
/// [`Role::Observer`] on [`start`](Self::start), and may move from observer to
/// master on [`try_promote`](Self::try_promote). It never moves back.
///
/// ```no_run
/// use token_election::{Role, RoleSession, TokenConfig};
///
/// let mut session = RoleSession::new(&TokenConfig::default());
/// if session.start()? == Role::Observer {
///     // later, on operator request
///     session.try_promote()?;
/// }
/// session.shutdown();
/// # Ok::<(), token_election::TokenError>(())
/// ```
#[derive(Debug)]
pub struct RoleSession {
    guard: LockGuard,
    role: Option<Role>,
    shut_down: bool,
}

impl RoleSession {
    /// Create a session for the lock path of `config`
    pub fn new(config: &TokenConfig) -> Self {
        Self::from_guard(LockGuard::new(config.lock_path()))
    }

    /// Create a session driving an existing guard
    pub fn from_guard(guard: LockGuard) -> Self {
        Self {
            guard,
            role: None,
            shut_down: false,
        }
    }

    /// Perform the initial acquisition and settle into a role.
    ///
    /// Only a failure to open the lock file is returned as an error. A failed
    /// lock call degrades to [`Role::Observer`]. Calling this again once a role
    /// is known returns that role.
    pub fn start(&mut self) -> Result<Role> {
        if self.shut_down {
            return Err(TokenError::SessionClosed);
        }
        if let Some(role) = self.role {
            return Ok(role);
        }

        let outcome = degrade(self.guard.acquire())?;
        let role = self.settle(outcome);
        info!(role = %role, lock = %self.guard.path().display(), "Session started");
        Ok(role)
    }

    /// Retry once to become master while observing.
    ///
    /// Returns the resulting role; a master stays master without another lock
    /// attempt.
    pub fn try_promote(&mut self) -> Result<Role> {
        if self.shut_down {
            return Err(TokenError::SessionClosed);
        }
        match self.role {
            None => Err(TokenError::SessionNotStarted),
            Some(Role::Master) => Ok(Role::Master),
            Some(Role::Observer) => {
                let outcome = degrade(self.guard.retry_acquire())?;
                let role = self.settle(outcome);
                if role == Role::Master {
                    info!(lock = %self.guard.path().display(), "Promoted to master");
                } else {
                    debug!("Promotion attempt failed, still observing");
                }
                Ok(role)
            }
        }
    }

    /// The role held, or `None` before [`start`](Self::start).
    ///
    /// Shutting down does not reset the role.
    pub fn current_role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_master(&self) -> bool {
        self.role == Some(Role::Master)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Whether the underlying lock is currently held by this session
    pub fn holds_lock(&self) -> bool {
        self.guard.is_held()
    }

    /// Release the lock and close the handle. Never fails; repeat calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.guard.release();
        self.shut_down = true;
        debug!(role = ?self.role, "Session shut down");
    }

    fn settle(&mut self, outcome: AcquireOutcome) -> Role {
        let role = if outcome.is_obtained() && self.guard.is_held() {
            Role::Master
        } else {
            Role::Observer
        };
        self.role = Some(role);
        role
    }
}

impl Drop for RoleSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Turn a lock call failure into "not obtained", keeping open failures fatal.
fn degrade(result: Result<AcquireOutcome>) -> Result<AcquireOutcome> {
    match result {
        Err(TokenError::LockAcquisition(e)) => {
            warn!(error = %e, "Lock attempt failed, continuing as observer");
            Ok(AcquireOutcome::NotObtained)
        }
        other => other,
    }
}
