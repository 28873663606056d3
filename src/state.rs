//! Shared session state.
//!
//! DESIGN
//! ======
//! `SessionState` is the single process-wide authentication snapshot. It is
//! owned by the `SessionStore` and published to observers (the navigation
//! gate, screen renderers) through a watch channel. Observers treat each
//! snapshot as immutable; only the store mutates state, and only through its
//! named transitions.

use serde::{Deserialize, Serialize};

// =============================================================================
// SESSION USER
// =============================================================================

/// Identity of the signed-in member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Username the member signed in with.
    pub username: String,
}

impl SessionUser {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into() }
    }
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Snapshot of the authentication session.
///
/// Invariant: `user` is present iff `authenticated` is true. Every transition
/// in the store preserves this; `is_consistent` checks it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    /// True iff the current session has a verified identity.
    pub authenticated: bool,
    /// Signed-in member, present iff `authenticated`.
    pub user: Option<SessionUser>,
    /// True while a login attempt is in flight.
    pub pending: bool,
    /// Message from the most recent failed login attempt.
    pub last_error: Option<String>,
}

impl SessionState {
    /// The initial shape: signed out, nothing pending, no error.
    /// `logout` resets to exactly this value.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// An authenticated snapshot for the given user.
    #[must_use]
    pub fn signed_in(user: SessionUser) -> Self {
        Self { authenticated: true, user: Some(user), pending: false, last_error: None }
    }

    /// Check the `user` ⇔ `authenticated` invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.user.is_some() == self.authenticated
    }

    /// Username of the signed-in member, if any. Greeting text reads this.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
