//! Login/logout lifecycle on top of a session store.
//!
//! Sign-in is two round-trips: the credential exchange issues the auth
//! headers, then a token validation fetches the canonical profile. Nothing
//! is persisted unless both succeed, so a half-finished login can never
//! leave a broken session behind.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::api::{ApiClient, ClientError};
use crate::session::{AuthHeaders, Session, SessionStore};

/// Where the manager currently is in the auth lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Unauthenticated,
    /// A login attempt is in flight.
    Authenticating,
    Authenticated,
}

/// Owns the current session and drives login, logout, restore and verify
/// against whichever [`SessionStore`] it was built with.
pub struct AuthManager {
    store: Box<dyn SessionStore>,
    phase: AuthPhase,
    session: Option<Session>,
}

impl AuthManager {
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        Self {
            store,
            phase: AuthPhase::Unauthenticated,
            session: None,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The header bundle of the current session.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn headers(&self) -> Result<AuthHeaders> {
        self.session
            .as_ref()
            .map(Session::headers)
            .context("Not logged in")
    }

    /// Signs in and persists the session.
    ///
    /// The profile stored is the one token validation returns, not the
    /// sign-in body. On any failure the manager ends unauthenticated and
    /// the store keeps whatever it held before.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn login(&mut self, client: &ApiClient, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::validation("email and password are required").into());
        }

        self.phase = AuthPhase::Authenticating;
        match self.login_inner(client, email, password).await {
            Ok(session) => {
                self.session = Some(session.clone());
                self.phase = AuthPhase::Authenticated;
                debug!(uid = %session.uid, "login succeeded");
                Ok(session)
            }
            Err(err) => {
                self.session = None;
                self.phase = AuthPhase::Unauthenticated;
                Err(err)
            }
        }
    }

    async fn login_inner(&self, client: &ApiClient, email: &str, password: &str) -> Result<Session> {
        let (_, auth) = client
            .sign_in(email, password)
            .await
            .context("Sign in failed")?;
        let user = client
            .validate_token(&auth)
            .await
            .context("Token validation failed")?;
        let session = Session::new(user, auth);
        self.store.save(&session).context("Failed to persist session")?;
        Ok(session)
    }

    /// Clears the session. A storage failure is logged, not surfaced, so
    /// logout always leaves the manager unauthenticated.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear stored session");
        }
        self.session = None;
        self.phase = AuthPhase::Unauthenticated;
    }

    /// Restores a prior login from the store without a backend round-trip.
    ///
    /// Anything short of a complete stored session (absent, incomplete, or
    /// unreadable) leaves the manager logged out rather than erroring.
    pub fn restore(&mut self) -> AuthPhase {
        match self.store.load() {
            Ok(Some(session)) if session.is_complete() => {
                self.session = Some(session);
                self.phase = AuthPhase::Authenticated;
            }
            Ok(Some(_)) => {
                debug!("stored session incomplete; staying logged out");
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "could not read stored session; staying logged out");
            }
        }
        self.phase
    }

    /// Revalidates the current token against the backend and refreshes the
    /// stored profile.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn verify(&mut self, client: &ApiClient) -> Result<Session> {
        let headers = self.headers()?;
        let user = client
            .validate_token(&headers)
            .await
            .context("Token validation failed")?;
        let session = Session::new(user, headers);
        self.store.save(&session).context("Failed to persist session")?;
        self.session = Some(session.clone());
        self.phase = AuthPhase::Authenticated;
        Ok(session)
    }
}
