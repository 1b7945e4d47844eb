//! Authenticated session lifecycle.
//!
//! `SessionManager` owns the one authenticated identity of the running
//! client: establishes it on login, persists it across restarts,
//! restores it at startup, and invalidates it wholesale when the API
//! answers 401.
//!
//! Key properties:
//! - Exactly one session at a time, behind an `RwLock` for cheap reads
//! - Invalidation never redirects when already on the login route
//! - The shell drains navigation requests by polling `take_pending_redirect`

pub mod store;

use std::path::Path;
use std::sync::{Mutex, RwLock};

use crate::config;
use crate::models::{CredentialsResponse, Session, User};

pub use store::{SessionStore, SessionStoreError};

// ═══════════════════════════════════════════════════════════
// Route context
// ═══════════════════════════════════════════════════════════

/// Where the shell currently is. Feeds the 401 redirect-loop check
/// and the support chat's page context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    pub path: String,
    pub title: String,
}

impl Default for RouteContext {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            title: String::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// SessionManager
// ═══════════════════════════════════════════════════════════

/// Owns the authenticated identity and its persistence.
///
/// Shared via `Arc` between the `Portal` and the HTTP client; every
/// request reads the bearer token through it, and the client calls
/// `handle_unauthorized` on any 401 from a protected endpoint.
pub struct SessionManager {
    /// Active session. `None` when signed out.
    session: RwLock<Option<Session>>,
    /// Durable copy for restarts.
    store: SessionStore,
    /// Shell's current location.
    route: RwLock<RouteContext>,
    /// Navigation request produced by invalidation, drained by polling.
    pending_redirect: Mutex<Option<String>>,
}

impl SessionManager {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            session: RwLock::new(None),
            store: SessionStore::new(data_dir),
            route: RwLock::new(RouteContext::default()),
            pending_redirect: Mutex::new(None),
        }
    }

    // ── Read path ───────────────────────────────────────────

    /// Clone of the active session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    /// Clone of the active user profile, if signed in.
    pub fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .map(|guard| guard.as_ref().map(|s| s.user.clone()))
            .unwrap_or(None)
    }

    /// Bearer token for outgoing requests.
    pub fn bearer_token(&self) -> Option<String> {
        self.session
            .read()
            .map(|guard| guard.as_ref().map(|s| s.token.clone()))
            .unwrap_or(None)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    // ── Lifecycle (write path) ──────────────────────────────

    /// Establish a session from a login/register/OAuth payload.
    ///
    /// Persists the session for restarts. A failed disk write degrades
    /// to an in-memory-only session with a warning; losing restore is
    /// better than failing a successful login.
    pub fn establish(&self, credentials: CredentialsResponse) -> Result<Session, SessionError> {
        let session = Session::from(credentials);
        if let Err(e) = self.store.save(&session) {
            tracing::warn!("Could not persist session: {e}");
        }
        let mut guard = self.session.write().map_err(|_| SessionError::LockPoisoned)?;
        *guard = Some(session.clone());
        tracing::info!(user = %session.user.email, role = session.user.role.as_str(), "Session established");
        Ok(session)
    }

    /// Sign out: drop the in-memory session and the persisted copy.
    pub fn clear(&self) -> Result<(), SessionError> {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Could not remove persisted session: {e}");
        }
        let mut guard = self.session.write().map_err(|_| SessionError::LockPoisoned)?;
        *guard = None;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Startup restore, disk half: adopt the persisted session
    /// optimistically so the shell can render the signed-in state
    /// immediately. The caller follows up with an identity check and
    /// `update_user`; a 401 along the way lands in `handle_unauthorized`.
    ///
    /// Idempotent: repeated calls with the same persisted state yield
    /// the same in-memory state.
    pub fn restore_cached(&self) -> Option<User> {
        let session = self.store.load()?;
        let user = session.user.clone();
        match self.session.write() {
            Ok(mut guard) => {
                *guard = Some(session);
                tracing::info!(user = %user.email, "Session restored from disk");
                Some(user)
            }
            Err(_) => None,
        }
    }

    /// Refresh the cached profile after a successful identity check,
    /// keeping the existing tokens.
    pub fn update_user(&self, user: User) -> Result<(), SessionError> {
        let mut guard = self.session.write().map_err(|_| SessionError::LockPoisoned)?;
        if let Some(session) = guard.as_mut() {
            session.user = user;
            if let Err(e) = self.store.save(session) {
                tracing::warn!("Could not persist refreshed profile: {e}");
            }
        }
        Ok(())
    }

    // ── Unauthorized handling ───────────────────────────────

    /// Global 401 hook: invalidate the session and request navigation
    /// to the login route, unless the shell is already there, so an
    /// unauthorized response on the login page can never loop.
    pub fn handle_unauthorized(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Could not remove persisted session: {e}");
        }
        if let Ok(mut guard) = self.session.write() {
            *guard = None;
        }

        let on_login = self
            .route
            .read()
            .map(|route| route.path == config::LOGIN_ROUTE)
            .unwrap_or(false);
        if on_login {
            tracing::debug!("Unauthorized while on the login route, no redirect");
            return;
        }
        if let Ok(mut pending) = self.pending_redirect.lock() {
            *pending = Some(config::LOGIN_ROUTE.to_string());
        }
        tracing::info!("Session invalidated, redirecting to login");
    }

    /// Drain the pending navigation request, if any. Polled by the shell.
    pub fn take_pending_redirect(&self) -> Option<String> {
        self.pending_redirect
            .lock()
            .map(|mut pending| pending.take())
            .unwrap_or(None)
    }

    // ── Route context ───────────────────────────────────────

    /// Record the shell's current location.
    pub fn set_route(&self, path: &str, title: &str) {
        if let Ok(mut route) = self.route.write() {
            route.path = path.to_string();
            route.title = title.to_string();
        }
    }

    pub fn current_route(&self) -> RouteContext {
        self.route
            .read()
            .map(|route| route.clone())
            .unwrap_or_default()
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Sign in to continue")]
    NotAuthenticated,
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
