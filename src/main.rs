mod routes;
mod services;
mod shell;
mod state;

use std::sync::Arc;

use routes::{Route, WatchRouter};
use services::auth::DemoVerifier;
use services::persistence::JsonFileStorage;
use services::session::SessionStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let storage = Arc::new(JsonFileStorage::from_env());
    tracing::info!(path = %storage.path().display(), "session storage configured");

    let store = Arc::new(SessionStore::new(storage));
    let router = Arc::new(WatchRouter::new(Route::Login));

    // The gate starts suspended; rehydration completion triggers its first
    // real evaluation, so a restored session lands on the dashboard and a
    // cold start stays on login.
    let _gate = routes::gate::spawn_gate_task(&store, router.clone(), router.subscribe());
    store.rehydrate().await;

    let verifier = Arc::new(DemoVerifier::from_env());
    shell::Shell::new(store, router, verifier).run().await;
}
