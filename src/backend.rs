//! Identity backend contract
//!
//! The remote authentication service the orchestrator exchanges
//! credentials with. Only the contract lives here; concrete clients are
//! supplied by the embedding application (a mock implementation ships in
//! [`crate::testing`]).

use crate::credentials::ExchangePayload;
use crate::models::auth::BackendError;
use crate::models::AuthenticatedUser;
use async_trait::async_trait;

/// Operations the identity backend must support.
///
/// Every operation that can fail reports a [`BackendError`] carrying a
/// structured code plus the backend's own description.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Register a new email/password account and sign it in.
    async fn create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, BackendError>;

    /// Sign in with an existing email/password account.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, BackendError>;

    /// Create or resume an anonymous session.
    async fn sign_in_anonymously(&self) -> Result<AuthenticatedUser, BackendError>;

    /// Exchange a validated federated credential for a signed-in user.
    async fn sign_in_with_credential(
        &self,
        payload: ExchangePayload,
    ) -> Result<AuthenticatedUser, BackendError>;

    /// Send a password-reset message to `email`.
    async fn send_password_reset(&self, email: &str) -> Result<(), BackendError>;

    /// Replace the signed-in user's password.
    async fn update_password(&self, new_password: &str) -> Result<(), BackendError>;

    /// The currently signed-in user, if any. This is a local lookup and
    /// must not hit the network.
    async fn current_user(&self) -> Option<AuthenticatedUser>;

    /// Fetch the current session ID token, optionally forcing a refresh
    /// instead of serving a cached value.
    async fn id_token(&self, force_refresh: bool) -> Result<String, BackendError>;

    /// Invalidate the current session.
    async fn sign_out(&self) -> Result<(), BackendError>;
}
