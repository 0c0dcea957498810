//! Session lifecycle: construction on login, registration or resume, and
//! teardown on logout or on any 401.
//!
//! A [`Session`] is an explicit value handed to every screen. The only
//! durable piece is the bearer token, stored under
//! [`TOKEN_KEY`](paya_core::store::TOKEN_KEY). Any change to the token also
//! drops [`ONBOARDING_RESTORED_KEY`](paya_core::store::ONBOARDING_RESTORED_KEY)
//! so onboarding reconciles once more in the next session.

use paya_core::store::{ONBOARDING_RESTORED_KEY, TOKEN_KEY};
use paya_core::{KeyValueStore, MerchantSession, StoreError};
use thiserror::Error;

use crate::client::MerchantClient;
use crate::error::ApiError;
use crate::types::{AuthResponse, RegisterRequest};

/// Where the user is sent once the session has been torn down.
pub const LOGIN_LOCATION: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The token was rejected and has been cleared; the user must sign in.
    RedirectToLogin { location: &'static str },
}

impl SessionEvent {
    #[must_use]
    pub fn location(&self) -> &'static str {
        match self {
            SessionEvent::RedirectToLogin { location } => location,
        }
    }
}

/// Result of passing an API call through [`SessionManager::guard`].
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("session expired; sign in again ({})", .0.location())]
    Redirect(SessionEvent),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// An authenticated merchant: a client holding the bearer token plus the
/// account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    client: MerchantClient,
    user: MerchantSession,
}

impl Session {
    #[must_use]
    pub fn new(client: MerchantClient, user: MerchantSession) -> Self {
        Self { client, user }
    }

    #[must_use]
    pub fn client(&self) -> &MerchantClient {
        &self.client
    }

    #[must_use]
    pub fn user(&self) -> &MerchantSession {
        &self.user
    }
}

/// Owns the unauthenticated client and the token slot in the store.
#[derive(Debug, Clone)]
pub struct SessionManager {
    client: MerchantClient,
    store: KeyValueStore,
}

impl SessionManager {
    #[must_use]
    pub fn new(client: MerchantClient, store: KeyValueStore) -> Self {
        Self { client, store }
    }

    #[must_use]
    pub fn store(&self) -> &KeyValueStore {
        &self.store
    }

    /// Signs in and persists the token.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotMerchant`] if the account is not a merchant; the
    ///   token is not stored.
    /// - Any error from [`MerchantClient::login`].
    /// - [`ApiError::Store`] if the token cannot be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let auth = self.client.login(email, password).await?;
        self.establish(auth)
    }

    /// Creates a merchant account and signs in with it.
    ///
    /// # Errors
    ///
    /// Same as [`SessionManager::login`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session, ApiError> {
        let auth = self.client.register(request).await?;
        self.establish(auth)
    }

    /// Restores the session from the stored token.
    ///
    /// Returns `Ok(None)` when there is no token, or when the server rejects
    /// it or reports a non-merchant account; in those cases the stored token
    /// is cleared.
    ///
    /// # Errors
    ///
    /// Transport and server errors other than 401 are propagated and leave
    /// the token in place, as does [`ApiError::Store`].
    pub async fn resume(&self) -> Result<Option<Session>, ApiError> {
        let Some(token) = self.store.get::<String>(TOKEN_KEY)? else {
            return Ok(None);
        };
        let client = self.client.clone().with_token(token);

        match client.me().await {
            Ok(user) if user.is_merchant() => {
                tracing::debug!(user_id = %user.id, "session resumed");
                Ok(Some(Session::new(client, user)))
            }
            Ok(user) => {
                tracing::warn!(user_id = %user.id, role = %user.role, "stored token belongs to a non-merchant account");
                self.clear_token()?;
                Ok(None)
            }
            Err(ApiError::Unauthorized) => {
                tracing::info!("stored token rejected; clearing it");
                self.clear_token()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Clears the stored token. The server keeps no session state to revoke.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] if the store cannot be rewritten.
    pub fn logout(&self) -> Result<(), ApiError> {
        if self.clear_token()? {
            tracing::info!("signed out");
        }
        Ok(())
    }

    /// Applies the global 401 rule to an API result: on
    /// [`ApiError::Unauthorized`] the stored token is cleared and
    /// [`SessionEvent::RedirectToLogin`] is reported. Other errors pass
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// [`GuardError::Redirect`] on 401, [`GuardError::Api`] for everything else.
    pub fn guard<T>(&self, result: Result<T, ApiError>) -> Result<T, GuardError> {
        match result {
            Ok(value) => Ok(value),
            Err(ApiError::Unauthorized) => {
                if let Err(e) = self.clear_token() {
                    tracing::warn!(error = %e, "failed to clear rejected token");
                }
                tracing::info!(location = LOGIN_LOCATION, "token rejected; redirecting to login");
                Err(GuardError::Redirect(SessionEvent::RedirectToLogin {
                    location: LOGIN_LOCATION,
                }))
            }
            Err(e) => Err(GuardError::Api(e)),
        }
    }

    fn establish(&self, auth: AuthResponse) -> Result<Session, ApiError> {
        if !auth.user.is_merchant() {
            return Err(ApiError::NotMerchant {
                email: auth.user.email,
                role: auth.user.role.to_string(),
            });
        }
        self.store.set(TOKEN_KEY, &auth.token)?;
        self.store.remove(ONBOARDING_RESTORED_KEY)?;
        tracing::info!(user_id = %auth.user.id, "signed in");
        let client = self.client.clone().with_token(auth.token);
        Ok(Session::new(client, auth.user))
    }

    /// Drops the token together with the per-session restoration marker.
    /// Returns whether a token was present.
    fn clear_token(&self) -> Result<bool, StoreError> {
        self.store.remove(ONBOARDING_RESTORED_KEY)?;
        self.store.remove(TOKEN_KEY)
    }
}
