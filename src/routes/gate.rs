//! Navigation gate — keeps the active screen consistent with the session.
//!
//! DESIGN
//! ======
//! The redirect rule is a pure function of (rehydration complete,
//! authenticated, current route); the gate task is the plumbing that re-runs
//! it whenever the session snapshot, the route, or the hydration flag
//! changes. Decisions are suspended until rehydration completes so a
//! restored session is never bounced to login by a premature evaluation.
//!
//! The gate issues `replace`, never push: the store changes data, the gate
//! translates data into navigation.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::routes::{Route, Router};
use crate::services::session::SessionStore;

/// Redirect decision, first match wins:
///
/// 1. rehydration incomplete → no action
/// 2. signed out on a protected route → login
/// 3. signed in outside the protected area → dashboard
/// 4. otherwise → no action
#[must_use]
pub fn decide(hydrated: bool, authenticated: bool, route: Route) -> Option<Route> {
    if !hydrated {
        return None;
    }
    if !authenticated && route.in_protected_area() {
        return Some(Route::Login);
    }
    if authenticated && !route.in_protected_area() {
        return Some(Route::DASHBOARD);
    }
    None
}

/// Spawn the gate task: evaluate once, then re-evaluate on every session,
/// route, or hydration change until all senders are gone.
pub fn spawn_gate_task(
    store: &SessionStore,
    router: Arc<dyn Router>,
    mut route_rx: watch::Receiver<Route>,
) -> JoinHandle<()> {
    let mut session_rx = store.subscribe();
    let mut hydrated_rx = store.hydrated();

    tokio::spawn(async move {
        loop {
            let hydrated = *hydrated_rx.borrow_and_update();
            let authenticated = session_rx.borrow_and_update().authenticated;
            let route = *route_rx.borrow_and_update();

            if let Some(target) = decide(hydrated, authenticated, route) {
                info!(from = %route, to = %target, "redirecting");
                router.replace(target);
                // The replace lands in route_rx and drives the next pass.
            }

            tokio::select! {
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = route_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = hydrated_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
