//! Credential verification and the login submission flow.
//!
//! DESIGN
//! ======
//! Verification sits behind the `CredentialVerifier` trait so the store's
//! transition logic never knows how credentials are checked. The shipped
//! `DemoVerifier` is the placeholder rule (demo/demo); a real identity
//! provider integration would implement the same trait.
//!
//! A login attempt has three phases: `begin_login`, an awaited verification
//! (the demo verifier sleeps to stand in for a network round-trip), then
//! settlement via `complete_login` or `fail_login`. Once begun, an attempt
//! always settles; there is no cancellation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::services::persistence::env_parse;
use crate::services::session::SessionStore;
use crate::state::SessionUser;

/// Message recorded in `SessionState.last_error` and shown on the login
/// screen when verification rejects the pair.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "demo";
const DEFAULT_LOGIN_DELAY_MS: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("a login attempt is already in flight")]
    AttemptInFlight,
}

/// Pluggable verification seam. Implementations resolve a credential pair to
/// a verified identity or reject it.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> Result<SessionUser, AuthError>;
}

// =============================================================================
// DEMO VERIFIER
// =============================================================================

/// Placeholder verifier: accepts `demo`/`demo`. The username comparison is
/// case-sensitive, the password comparison is not.
#[derive(Debug, Clone)]
pub struct DemoVerifier {
    delay: Duration,
}

impl DemoVerifier {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Settle delay from `LOGIN_DELAY_MS` (default 1000).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(Duration::from_millis(env_parse("LOGIN_DELAY_MS", DEFAULT_LOGIN_DELAY_MS)))
    }
}

#[async_trait]
impl CredentialVerifier for DemoVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        // Stands in for a real auth request round-trip.
        tokio::time::sleep(self.delay).await;

        if username == DEMO_USERNAME && password.to_lowercase() == DEMO_PASSWORD {
            Ok(SessionUser::new(username))
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

// =============================================================================
// SUBMISSION FLOW
// =============================================================================

/// Drive one login attempt through the store.
///
/// Rejects a second submission while one is pending; otherwise runs
/// begin → verify → settle. The store snapshot after return is either
/// signed in or signed out with `last_error` set.
///
/// # Errors
///
/// `AttemptInFlight` when a prior attempt has not settled yet;
/// `InvalidCredentials` when verification rejects the pair.
pub async fn submit_login(
    store: &SessionStore,
    verifier: &dyn CredentialVerifier,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    if store.snapshot().pending {
        debug!(username, "rejecting duplicate login submission");
        return Err(AuthError::AttemptInFlight);
    }

    store.begin_login();
    match verifier.verify(username, password).await {
        Ok(user) => {
            store.complete_login(&user.username).await;
            Ok(())
        }
        Err(e) => {
            store.fail_login(INVALID_CREDENTIALS_MESSAGE);
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
