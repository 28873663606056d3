use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::timeout;

use crate::routes::{Screen, WatchRouter};
use crate::services::persistence::{MemoryStorage, PersistedSession};
use crate::state::SessionUser;

/// Router wrapper that counts gate-issued `replace` calls. Test-driven
/// navigation goes through `navigate`, which is not counted.
struct RecordingRouter {
    inner: WatchRouter,
    replaces: AtomicUsize,
}

impl RecordingRouter {
    fn new(initial: Route) -> Arc<Self> {
        Arc::new(Self { inner: WatchRouter::new(initial), replaces: AtomicUsize::new(0) })
    }

    fn navigate(&self, route: Route) {
        self.inner.replace(route);
    }

    fn subscribe(&self) -> watch::Receiver<Route> {
        self.inner.subscribe()
    }

    fn replace_count(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }
}

impl Router for RecordingRouter {
    fn current(&self) -> Route {
        self.inner.current()
    }

    fn replace(&self, route: Route) {
        self.replaces.fetch_add(1, Ordering::SeqCst);
        self.inner.replace(route);
    }
}

async fn wait_for_route(rx: &mut watch::Receiver<Route>, want: Route) {
    timeout(Duration::from_secs(1), async {
        while *rx.borrow_and_update() != want {
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("route never arrived");
}

/// Let the gate task drain any pending evaluations.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(25)).await;
}

// =============================================================================
// decide
// =============================================================================

#[test]
fn decide_suspends_until_rehydrated() {
    assert_eq!(decide(false, false, Route::DASHBOARD), None);
    assert_eq!(decide(false, true, Route::Login), None);
    assert_eq!(decide(false, false, Route::Login), None);
}

#[test]
fn decide_redirects_signed_out_from_protected_area() {
    assert_eq!(decide(true, false, Route::DASHBOARD), Some(Route::Login));
    assert_eq!(decide(true, false, Route::Drawer(Screen::Benefits)), Some(Route::Login));
}

#[test]
fn decide_redirects_signed_in_to_dashboard() {
    assert_eq!(decide(true, true, Route::Login), Some(Route::DASHBOARD));
    assert_eq!(decide(true, true, Route::NotFound), Some(Route::DASHBOARD));
}

#[test]
fn decide_leaves_consistent_states_alone() {
    assert_eq!(decide(true, false, Route::Login), None);
    assert_eq!(decide(true, false, Route::NotFound), None);
    assert_eq!(decide(true, true, Route::DASHBOARD), None);
    assert_eq!(decide(true, true, Route::Drawer(Screen::Profile)), None);
}

// =============================================================================
// gate task
// =============================================================================

#[tokio::test]
async fn signed_out_navigation_into_drawer_replaces_once_to_login() {
    let store = SessionStore::new(MemoryStorage::new());
    store.rehydrate().await;

    let router = RecordingRouter::new(Route::Login);
    let _gate = spawn_gate_task(&store, router.clone(), router.subscribe());
    let mut rx = router.subscribe();

    router.navigate(Route::Drawer(Screen::Benefits));
    wait_for_route(&mut rx, Route::Login).await;

    settle().await;
    assert_eq!(router.replace_count(), 1);
}

#[tokio::test]
async fn restored_session_navigating_to_login_replaces_once_to_dashboard() {
    let storage = MemoryStorage::with_session(PersistedSession::signed_in(SessionUser::new("demo")));
    let store = SessionStore::new(storage);
    store.rehydrate().await;

    let router = RecordingRouter::new(Route::DASHBOARD);
    let _gate = spawn_gate_task(&store, router.clone(), router.subscribe());
    let mut rx = router.subscribe();

    router.navigate(Route::Login);
    wait_for_route(&mut rx, Route::DASHBOARD).await;

    settle().await;
    assert_eq!(router.replace_count(), 1);
}

#[tokio::test]
async fn no_redirect_before_rehydration_even_if_route_changes_first() {
    let store = SessionStore::new(MemoryStorage::new());

    let router = RecordingRouter::new(Route::Login);
    let _gate = spawn_gate_task(&store, router.clone(), router.subscribe());
    let mut rx = router.subscribe();

    // Route event arrives before rehydration: the gate must stay quiet.
    router.navigate(Route::Drawer(Screen::Benefits));
    settle().await;
    assert_eq!(router.replace_count(), 0);
    assert_eq!(router.current(), Route::Drawer(Screen::Benefits));

    // Rehydration completes with no prior session: now the gate acts.
    store.rehydrate().await;
    wait_for_route(&mut rx, Route::Login).await;
    assert_eq!(router.replace_count(), 1);
}

#[tokio::test]
async fn completed_login_moves_login_screen_into_drawer() {
    let store = SessionStore::new(MemoryStorage::new());
    store.rehydrate().await;

    let router = RecordingRouter::new(Route::Login);
    let _gate = spawn_gate_task(&store, router.clone(), router.subscribe());
    let mut rx = router.subscribe();

    store.complete_login("demo").await;
    wait_for_route(&mut rx, Route::DASHBOARD).await;
}

#[tokio::test]
async fn logout_moves_drawer_back_to_login() {
    let storage = MemoryStorage::with_session(PersistedSession::signed_in(SessionUser::new("demo")));
    let store = SessionStore::new(storage);
    store.rehydrate().await;

    let router = RecordingRouter::new(Route::DASHBOARD);
    let _gate = spawn_gate_task(&store, router.clone(), router.subscribe());
    let mut rx = router.subscribe();

    store.logout().await;
    wait_for_route(&mut rx, Route::Login).await;
}

#[tokio::test]
async fn failed_login_does_not_move_off_the_login_screen() {
    let store = SessionStore::new(MemoryStorage::new());
    store.rehydrate().await;

    let router = RecordingRouter::new(Route::Login);
    let _gate = spawn_gate_task(&store, router.clone(), router.subscribe());

    store.begin_login();
    store.fail_login("Invalid username or password");
    settle().await;

    assert_eq!(router.current(), Route::Login);
    assert_eq!(router.replace_count(), 0);
}
