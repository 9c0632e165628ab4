//! Sign-in orchestration
//!
//! The [`SignInOrchestrator`] drives the end-to-end flow for every
//! provider: credential acquisition through the injected platform flows,
//! validation and exchange, the backend round trip, and the
//! fire-and-forget refresh of the session token cache.

mod apple;

use crate::backend::IdentityBackend;
use crate::credentials::ProviderCredential;
use crate::models::auth::{AuthError, BackendErrorCode};
use crate::models::AuthenticatedUser;
use crate::providers::{AppleFlowHandle, AppleScope, AppleSignIn, AppleSignInRequest, GoogleSignIn};
use crate::session::SessionTokenCache;
use crate::settings::SignonSettings;
use apple::AppleFlow;
use std::sync::Arc;

/// Orchestrates sign-in across all supported providers.
///
/// All operations are async and independently invocable; concurrent
/// attempts are isolated, with each Apple attempt owning its own nonce.
/// Every successful sign-in triggers a session token refresh that is not
/// awaited — see [`SessionTokenCache`] for the consistency window.
pub struct SignInOrchestrator {
    backend: Arc<dyn IdentityBackend>,
    tokens: Arc<SessionTokenCache>,
    nonce_length: usize,
}

impl SignInOrchestrator {
    #[must_use]
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self::with_settings(backend, &SignonSettings::default())
    }

    #[must_use]
    pub fn with_settings(backend: Arc<dyn IdentityBackend>, settings: &SignonSettings) -> Self {
        Self {
            backend,
            tokens: Arc::new(SessionTokenCache::new()),
            nonce_length: settings.nonce.length,
        }
    }

    /// The session token cache refreshed after every successful sign-in.
    #[must_use]
    pub fn session_tokens(&self) -> Arc<SessionTokenCache> {
        Arc::clone(&self.tokens)
    }

    /// Sign in with an existing email/password account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Backend`] with whatever the backend reports
    /// (bad credentials, unknown user, network).
    pub async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let user = self.backend.sign_in_with_password(email, password).await?;
        log::info!("signed in user {} via password", user.id);
        self.spawn_token_refresh();
        Ok(user)
    }

    /// Register a new email/password account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Backend`] if the backend rejects the account,
    /// e.g. when the email is already in use.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let user = self.backend.create_user(email, password).await?;
        log::info!("created user {}", user.id);
        self.spawn_token_refresh();
        Ok(user)
    }

    /// Sign in anonymously.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Backend`] on backend failure.
    pub async fn sign_in_anonymously(&self) -> Result<AuthenticatedUser, AuthError> {
        let user = self.backend.sign_in_anonymously().await?;
        log::info!("signed in anonymous user {}", user.id);
        self.spawn_token_refresh();
        Ok(user)
    }

    /// Run the Google sign-in flow: present the vendor prompt, validate
    /// the returned tokens, and exchange them with the backend.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] if the flow fails or is cancelled,
    /// [`AuthError::MissingToken`] before any backend call when the SDK
    /// returned no ID or access token, and [`AuthError::Backend`] on
    /// exchange failure.
    pub async fn sign_in_with_google(
        &self,
        google: &dyn GoogleSignIn,
    ) -> Result<AuthenticatedUser, AuthError> {
        let tokens = google.sign_in().await?;
        let payload = ProviderCredential::GoogleTokens {
            id_token: tokens.id_token,
            access_token: tokens.access_token,
        }
        .into_payload()?;

        let user = self.backend.sign_in_with_credential(payload).await?;
        log::info!("signed in user {} via google", user.id);
        self.spawn_token_refresh();
        Ok(user)
    }

    /// Run the Apple sign-in flow: generate a nonce, present the OS prompt
    /// with the nonce digest, await the single completion callback, then
    /// exchange the credential with the backend.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NonceExpired`] when the completion arrives
    /// after the attempt's nonce was invalidated, [`AuthError::NoResponse`]
    /// when the flow closes without delivering anything,
    /// [`AuthError::Provider`] when the flow reports an error (including
    /// user cancel), [`AuthError::MissingToken`] when the payload carries
    /// no usable identity token, and [`AuthError::Backend`] on exchange
    /// failure.
    pub async fn sign_in_with_apple(
        &self,
        apple: &dyn AppleSignIn,
    ) -> Result<AuthenticatedUser, AuthError> {
        let (flow, nonce_digest) = AppleFlow::begin(self.nonce_length)?;
        let (handle, completion) = AppleFlowHandle::channel();
        apple.present(
            AppleSignInRequest {
                nonce_digest,
                scopes: vec![AppleScope::FullName, AppleScope::Email],
            },
            handle,
        );

        match completion.await {
            Ok(Ok(authorization)) => {
                let payload = flow.complete(authorization)?.into_payload()?;
                let user = self.backend.sign_in_with_credential(payload).await?;
                log::info!("signed in user {} via apple", user.id);
                self.spawn_token_refresh();
                Ok(user)
            }
            Ok(Err(provider_error)) => {
                flow.invalidate();
                log::debug!("apple sign-in failed: {provider_error}");
                Err(provider_error.into())
            }
            // The handle was dropped without firing: the flow closed
            // without yielding a value or an error.
            Err(_closed) => {
                flow.invalidate();
                Err(AuthError::NoResponse)
            }
        }
    }

    /// Send a password-reset message to `email`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Backend`] on backend failure.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        self.backend.send_password_reset(email).await?;
        Ok(())
    }

    /// Replace the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] — without contacting the
    /// backend — when no user is signed in, otherwise
    /// [`AuthError::Backend`] on backend failure.
    pub async fn update_password(&self, new_password: &str) -> Result<(), AuthError> {
        if self.backend.current_user().await.is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        self.backend.update_password(new_password).await?;
        Ok(())
    }

    /// The currently signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when no user is signed in.
    pub async fn current_user(&self) -> Result<AuthenticatedUser, AuthError> {
        self.backend
            .current_user()
            .await
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Clear the local session token and request backend invalidation.
    /// Already being signed out is not a failure.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Backend`] on any backend failure other than
    /// "not signed in".
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.tokens.clear();
        match self.backend.sign_out().await {
            Ok(()) => Ok(()),
            Err(err) if err.code == BackendErrorCode::NotSignedIn => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Refresh the session token cache without waiting for the result.
    /// Success of the sign-in that triggered this does not depend on it.
    fn spawn_token_refresh(&self) {
        let backend = Arc::clone(&self.backend);
        let tokens = Arc::clone(&self.tokens);
        tokio::spawn(async move {
            tokens.refresh(backend.as_ref()).await;
        });
    }
}
