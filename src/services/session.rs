//! Session store — single authority over `SessionState`.
//!
//! DESIGN
//! ======
//! The store owns the process-wide session snapshot and publishes every
//! transition on a watch channel; the navigation gate and screen renderers
//! subscribe instead of reaching into shared mutable state. All mutations go
//! through the four named transitions (`begin_login`, `complete_login`,
//! `fail_login`, `logout`) plus the one-shot startup `rehydrate`.
//!
//! ERROR HANDLING
//! ==============
//! Persistence is best-effort: a failed `save`/`clear` is logged at warn and
//! the in-memory transition stands. A failed `load` during rehydration is
//! treated as "no prior session". No storage failure is fatal.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::services::persistence::{PersistedSession, SessionStorage};
use crate::state::{SessionState, SessionUser};

/// Single authority over the session lifecycle.
///
/// Clone-cheap handle: internally everything is behind `Arc`/watch senders,
/// so the shell, the gate, and background tasks can share one store.
pub struct SessionStore {
    state_tx: watch::Sender<SessionState>,
    hydrated_tx: watch::Sender<bool>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::signed_out());
        let (hydrated_tx, _) = watch::channel(false);
        Self { state_tx, hydrated_tx, storage }
    }

    // =========================================================================
    // OBSERVATION
    // =========================================================================

    /// Subscribe to session snapshots. The receiver is marked changed on
    /// every transition, including no-op ones like a repeated `logout`.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Subscribe to rehydration completion. Flips to true exactly once.
    #[must_use]
    pub fn hydrated(&self) -> watch::Receiver<bool> {
        self.hydrated_tx.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        *self.hydrated_tx.borrow()
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// A login attempt is starting: mark pending, clear the previous error.
    ///
    /// Unconditional: the duplicate-submission guard lives in the caller
    /// (`services::auth::submit_login`), not here.
    pub fn begin_login(&self) {
        self.state_tx.send_modify(|state| {
            state.pending = true;
            state.last_error = None;
        });
    }

    /// A login attempt settled successfully. Safe to call in any state; the
    /// final snapshot is the same regardless of what preceded it.
    pub async fn complete_login(&self, username: &str) {
        let user = SessionUser::new(username);
        self.state_tx.send_replace(SessionState::signed_in(user.clone()));
        info!(username, "login completed");

        // Failure states are not durable; only the authenticated pair is.
        let record = PersistedSession::signed_in(user);
        if let Err(e) = self.storage.save(&record).await {
            warn!(error = %e, "failed to persist session; continuing in-memory");
        }
    }

    /// A login attempt settled with a failure. Returns to the signed-out
    /// shape with the message recorded. Not persisted.
    pub fn fail_login(&self, message: impl Into<String>) {
        let message = message.into();
        info!(error = %message, "login failed");
        self.state_tx.send_replace(SessionState {
            last_error: Some(message),
            ..SessionState::signed_out()
        });
    }

    /// Sign out: reset to the initial shape and clear the persisted session.
    /// Idempotent.
    pub async fn logout(&self) {
        self.state_tx.send_replace(SessionState::signed_out());
        info!("signed out");

        if let Err(e) = self.storage.clear().await {
            warn!(error = %e, "failed to clear persisted session");
        }
    }

    // =========================================================================
    // REHYDRATION
    // =========================================================================

    /// Restore a previously persisted session, then mark rehydration
    /// complete. Called once at startup, before the gate's first decision.
    ///
    /// A load failure or an unrestorable record (signed out, or missing the
    /// user) is equivalent to no prior session.
    pub async fn rehydrate(&self) {
        match self.storage.load().await {
            Ok(Some(PersistedSession { authenticated: true, user: Some(user) })) => {
                info!(username = %user.username, "restored persisted session");
                self.state_tx.send_replace(SessionState::signed_in(user));
            }
            Ok(Some(_)) | Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "session rehydration failed; starting signed out");
            }
        }
        self.hydrated_tx.send_replace(true);
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
