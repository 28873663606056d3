//! Terminal shell — screen renderers and user input.
//!
//! DESIGN
//! ======
//! Stand-in for the portal's screen layer. It renders the active screen from
//! the current route and session snapshot, and translates commands into the
//! same calls a screen would make: `submit_login` from the login screen,
//! `logout` from the drawer, plain navigation everywhere. It never mutates
//! `SessionState` directly; navigation and session changes come back to it
//! through the watch channels.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::routes::{Route, Router, Screen, WatchRouter};
use crate::services::auth::{self, AuthError, CredentialVerifier};
use crate::services::session::SessionStore;
use crate::state::SessionState;

pub struct Shell {
    store: Arc<SessionStore>,
    router: Arc<WatchRouter>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl Shell {
    #[must_use]
    pub fn new(
        store: Arc<SessionStore>,
        router: Arc<WatchRouter>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self { store, router, verifier }
    }

    /// Run until stdin closes or `quit`.
    pub async fn run(self) {
        let mut route_rx = self.router.subscribe();
        let mut session_rx = self.store.subscribe();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        render(self.router.current(), &self.store.snapshot());

        loop {
            tokio::select! {
                changed = route_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    render(*route_rx.borrow_and_update(), &self.store.snapshot());
                }
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    render(self.router.current(), &session_rx.borrow_and_update());
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if !self.handle_command(line.trim()).await {
                                break;
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            debug!(error = %e, "stdin read failed");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Returns false when the shell should exit.
    async fn handle_command(&self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        match parts.next() {
            None => {}
            Some("quit" | "exit") => return false,
            Some("login") => {
                let (Some(username), Some(password)) = (parts.next(), parts.next()) else {
                    println!("usage: login <username> <password>");
                    return true;
                };
                self.submit(username, password);
            }
            Some("logout") => self.store.logout().await,
            Some("go") => {
                let Some(path) = parts.next() else {
                    println!("usage: go <path>");
                    return true;
                };
                self.router.replace(Route::parse(path));
            }
            Some("help") => print_help(),
            Some(other) => println!("unknown command: {other} (try `help`)"),
        }
        true
    }

    /// Fire a login attempt without blocking the render loop; the outcome
    /// comes back through the session watch.
    fn submit(&self, username: &str, password: &str) {
        let store = Arc::clone(&self.store);
        let verifier = Arc::clone(&self.verifier);
        let username = username.to_owned();
        let password = password.to_owned();
        tokio::spawn(async move {
            match auth::submit_login(&store, verifier.as_ref(), &username, &password).await {
                Ok(()) | Err(AuthError::InvalidCredentials) => {
                    // Outcome is rendered from the session snapshot.
                }
                Err(AuthError::AttemptInFlight) => {
                    println!("a login attempt is already in progress");
                }
            }
        });
    }
}

// =============================================================================
// RENDERING
// =============================================================================

fn render(route: Route, session: &SessionState) {
    println!();
    match route {
        Route::Login => render_login(session),
        Route::Drawer(screen) => render_screen(screen, session),
        Route::NotFound => {
            println!("== Not Found ==");
            println!("This screen does not exist.");
        }
    }
}

fn render_login(session: &SessionState) {
    println!("== Welcome Back ==");
    println!("Login to your account (demo credentials: demo / demo)");
    if session.pending {
        println!("Signing in...");
    }
    if let Some(error) = &session.last_error {
        println!("Login Failed: {error}. Please try again.");
    }
}

fn render_screen(screen: Screen, session: &SessionState) {
    println!("== {} ==", screen.title());
    if screen == Screen::Dashboard {
        if let Some(username) = session.username() {
            println!("Welcome back, {username}!");
        }
    }
    let drawer = Screen::ALL
        .iter()
        .map(|s| s.title())
        .collect::<Vec<_>>()
        .join(" | ");
    println!("[{drawer}]");
}

fn print_help() {
    println!("commands:");
    println!("  login <username> <password>");
    println!("  logout");
    println!("  go <path>        e.g. go /(drawer)/benefits");
    println!("  quit");
}
