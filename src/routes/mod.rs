//! Route model — screens, path parsing, and the router seam.
//!
//! ARCHITECTURE
//! ============
//! Routes mirror the portal's screen tree: a login screen, a not-found
//! fallback, and a protected drawer group with five screens. Only the first
//! path segment matters to the navigation gate; it classifies a route as
//! inside or outside the protected area.

use std::fmt;

use tokio::sync::watch;
use tracing::debug;

pub mod gate;

/// First path segment marking the protected drawer group.
pub const DRAWER_SEGMENT: &str = "(drawer)";

// =============================================================================
// SCREENS
// =============================================================================

/// Screens inside the protected drawer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Benefits,
    FindProvider,
    ClaimsBills,
    Profile,
}

impl Screen {
    /// Path segment under the drawer group. The dashboard is the group
    /// index and has no segment of its own.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Dashboard => "",
            Self::Benefits => "benefits",
            Self::FindProvider => "find-provider",
            Self::ClaimsBills => "claims-bills",
            Self::Profile => "profile",
        }
    }

    #[must_use]
    fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "" => Some(Self::Dashboard),
            "benefits" => Some(Self::Benefits),
            "find-provider" => Some(Self::FindProvider),
            "claims-bills" => Some(Self::ClaimsBills),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }

    /// Title shown in the drawer and screen header.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Benefits => "Benefits",
            Self::FindProvider => "Find a Provider",
            Self::ClaimsBills => "Claims & Bills",
            Self::Profile => "Profile",
        }
    }

    pub const ALL: [Self; 5] =
        [Self::Dashboard, Self::Benefits, Self::FindProvider, Self::ClaimsBills, Self::Profile];
}

// =============================================================================
// ROUTES
// =============================================================================

/// A resolved route. `Drawer` routes form the protected area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Drawer(Screen),
    NotFound,
}

impl Route {
    /// Root of the protected area; the gate redirects authenticated
    /// sessions here.
    pub const DASHBOARD: Self = Self::Drawer(Screen::Dashboard);

    /// Resolve a path to a route. Classification only looks at the first
    /// segment; unknown paths fall through to `NotFound`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next().unwrap_or_default();
        match first {
            "login" => Self::Login,
            DRAWER_SEGMENT => {
                let slug = segments.next().unwrap_or_default();
                Screen::from_slug(slug).map_or(Self::NotFound, Self::Drawer)
            }
            _ => Self::NotFound,
        }
    }

    /// True iff the route lives inside the protected drawer group.
    #[must_use]
    pub fn in_protected_area(self) -> bool {
        matches!(self, Self::Drawer(_))
    }

    /// Path form, e.g. `/login` or `/(drawer)/benefits`.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::Drawer(Screen::Dashboard) => format!("/{DRAWER_SEGMENT}"),
            Self::Drawer(screen) => format!("/{DRAWER_SEGMENT}/{}", screen.slug()),
            Self::NotFound => "/+not-found".into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Router collaborator: the gate reads the current route and issues
/// forced navigations through it. `replace` swaps the current entry rather
/// than pushing, so back-navigation cannot resurrect a route inconsistent
/// with the session.
pub trait Router: Send + Sync {
    fn current(&self) -> Route;
    fn replace(&self, route: Route);
}

/// Watch-channel router: the current route lives in a watch channel so the
/// gate and the shell can react to navigation without polling.
#[derive(Debug)]
pub struct WatchRouter {
    tx: watch::Sender<Route>,
}

impl WatchRouter {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Subscribe to route changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }
}

impl Router for WatchRouter {
    fn current(&self) -> Route {
        *self.tx.borrow()
    }

    fn replace(&self, route: Route) {
        debug!(%route, "route replaced");
        self.tx.send_replace(route);
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
