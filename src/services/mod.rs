//! Domain services behind the portal's screens.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the session lifecycle, credential verification, and
//! durable persistence so the route layer and screen renderers stay focused
//! on navigation and display.

pub mod auth;
pub mod persistence;
pub mod session;
