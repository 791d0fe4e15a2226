// ============================
// crates/authgate/src/lib.rs
// ============================
//! Embeddable credential and session handling for axum services.
//!
//! `authgate` authenticates users by password, issues short-lived access
//! tokens and longer-lived refresh tokens, verifies tokens on protected
//! requests, and rotates refresh tokens on every exchange. Persistence is
//! the host's business: supply any [`store::UserStore`] implementation
//! (or use [`store::MemoryStore`] to get going) and merge
//! [`router::create_router`] into your application router.

pub mod config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod router;
pub mod session;
pub mod store;
pub mod token;

use std::sync::Arc;

use crate::config::Settings;
use crate::session::SessionManager;
use crate::store::UserStore;

pub use error::AuthError;
pub use middleware::AuthUser;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Session manager driving every credential operation
    pub sessions: Arc<SessionManager<S>>,
    /// Settings, read-only for the process lifetime
    pub settings: Arc<Settings>,
}

// Manual impl: cloning shares the Arcs, so `S` itself need not be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: UserStore> AppState<S> {
    /// Create a new application state from a host store and settings.
    pub fn new(store: S, settings: Settings) -> Self {
        let settings = Arc::new(settings);
        let sessions = Arc::new(SessionManager::new(store, Arc::clone(&settings)));
        Self { sessions, settings }
    }
}
