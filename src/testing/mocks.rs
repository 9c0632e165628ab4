//! Mock objects and fake implementations for testing
//!
//! In-memory stand-ins for the identity backend and the platform sign-in
//! flows, with enough instrumentation to assert on call counts and on the
//! payloads that crossed the seam.

use crate::backend::IdentityBackend;
use crate::credentials::ExchangePayload;
use crate::models::auth::{BackendError, BackendErrorCode};
use crate::models::{AppleAuthorization, AuthenticatedUser, GoogleTokens};
use crate::providers::{
    AppleFlowHandle, AppleSignIn, AppleSignInRequest, GoogleSignIn, ProviderError,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory identity backend stub.
///
/// Tracks the signed-in user, counts operations that would hit the
/// network, and records the last credential payload it received.
/// `current_user` and `id_token` are intentionally not counted as network
/// calls, so "no backend call" assertions stay meaningful.
pub struct MockIdentityBackend {
    user: Mutex<Option<AuthenticatedUser>>,
    email_user_id: String,
    issued_token: String,
    fail_with: Option<BackendError>,
    last_payload: Mutex<Option<ExchangePayload>>,
    calls: AtomicUsize,
}

impl Default for MockIdentityBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            user: Mutex::new(None),
            email_user_id: "mock-user-1".to_string(),
            issued_token: "mock-id-token".to_string(),
            fail_with: None,
            last_payload: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Use `id` for users produced by email and credential sign-ins.
    #[must_use]
    pub fn with_user_id(mut self, id: &str) -> Self {
        self.email_user_id = id.to_string();
        self
    }

    /// Issue `token` from `id_token` fetches.
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.issued_token = token.to_string();
        self
    }

    /// Fail every network operation with `error`.
    #[must_use]
    pub fn failing_with(mut self, error: BackendError) -> Self {
        self.fail_with = Some(error);
        self
    }

    /// Number of operations that would have hit the network.
    #[must_use]
    pub fn backend_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The last credential payload passed to `sign_in_with_credential`.
    #[must_use]
    pub fn last_payload(&self) -> Option<ExchangePayload> {
        self.last_payload.lock().unwrap().clone()
    }

    fn begin_call(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn establish(&self, user: AuthenticatedUser) -> AuthenticatedUser {
        *self.user.lock().unwrap() = Some(user.clone());
        user
    }
}

#[async_trait]
impl IdentityBackend for MockIdentityBackend {
    async fn create_user(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AuthenticatedUser, BackendError> {
        self.begin_call()?;
        Ok(self.establish(AuthenticatedUser {
            id: self.email_user_id.clone(),
            email: Some(email.to_string()),
            photo_url: None,
        }))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AuthenticatedUser, BackendError> {
        self.begin_call()?;
        Ok(self.establish(AuthenticatedUser {
            id: self.email_user_id.clone(),
            email: Some(email.to_string()),
            photo_url: None,
        }))
    }

    async fn sign_in_anonymously(&self) -> Result<AuthenticatedUser, BackendError> {
        self.begin_call()?;
        Ok(self.establish(AuthenticatedUser {
            id: format!("anon-{}", Uuid::new_v4()),
            email: None,
            photo_url: None,
        }))
    }

    async fn sign_in_with_credential(
        &self,
        payload: ExchangePayload,
    ) -> Result<AuthenticatedUser, BackendError> {
        self.begin_call()?;
        let provider = payload.provider();
        *self.last_payload.lock().unwrap() = Some(payload);
        // Suffix the provider id so tests can tell which path ran.
        Ok(self.establish(AuthenticatedUser {
            id: format!("{}@{}", self.email_user_id, provider.id()),
            email: None,
            photo_url: None,
        }))
    }

    async fn send_password_reset(&self, _email: &str) -> Result<(), BackendError> {
        self.begin_call()
    }

    async fn update_password(&self, _new_password: &str) -> Result<(), BackendError> {
        self.begin_call()?;
        if self.user.lock().unwrap().is_none() {
            return Err(BackendError::new(
                BackendErrorCode::NotSignedIn,
                "no current user",
            ));
        }
        Ok(())
    }

    async fn current_user(&self) -> Option<AuthenticatedUser> {
        self.user.lock().unwrap().clone()
    }

    async fn id_token(&self, _force_refresh: bool) -> Result<String, BackendError> {
        if self.user.lock().unwrap().is_none() {
            return Err(BackendError::new(
                BackendErrorCode::NotSignedIn,
                "no current user",
            ));
        }
        Ok(self.issued_token.clone())
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.begin_call()?;
        let mut user = self.user.lock().unwrap();
        if user.is_none() {
            return Err(BackendError::new(
                BackendErrorCode::NotSignedIn,
                "no current user",
            ));
        }
        *user = None;
        Ok(())
    }
}

/// Scripted Google sign-in flow.
pub struct MockGoogleSignIn {
    result: Result<GoogleTokens, ProviderError>,
}

impl MockGoogleSignIn {
    #[must_use]
    pub fn succeeding(tokens: GoogleTokens) -> Self {
        Self { result: Ok(tokens) }
    }

    #[must_use]
    pub fn failing(error: ProviderError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl GoogleSignIn for MockGoogleSignIn {
    async fn sign_in(&self) -> Result<GoogleTokens, ProviderError> {
        self.result.clone()
    }
}

/// What a scripted Apple flow does with its completion handle.
enum AppleBehavior {
    Succeed(AppleAuthorization),
    Fail(ProviderError),
    /// Drop the handle without completing: the flow closes silently.
    Ignore,
    /// Keep the handle for manual completion via `take_handle`.
    Stash,
}

/// Scripted Apple sign-in flow. Records the request it was presented with
/// so tests can inspect the nonce digest and scopes.
pub struct MockAppleSignIn {
    behavior: AppleBehavior,
    last_request: Mutex<Option<AppleSignInRequest>>,
    stashed_handle: Mutex<Option<AppleFlowHandle>>,
}

impl MockAppleSignIn {
    #[must_use]
    pub fn succeeding(authorization: AppleAuthorization) -> Self {
        Self::with_behavior(AppleBehavior::Succeed(authorization))
    }

    #[must_use]
    pub fn failing(error: ProviderError) -> Self {
        Self::with_behavior(AppleBehavior::Fail(error))
    }

    /// Flow that closes without delivering a completion.
    #[must_use]
    pub fn ignoring() -> Self {
        Self::with_behavior(AppleBehavior::Ignore)
    }

    /// Flow that holds its completion handle until the test fires it.
    #[must_use]
    pub fn stashing() -> Self {
        Self::with_behavior(AppleBehavior::Stash)
    }

    fn with_behavior(behavior: AppleBehavior) -> Self {
        Self {
            behavior,
            last_request: Mutex::new(None),
            stashed_handle: Mutex::new(None),
        }
    }

    /// The request from the most recent `present` call.
    #[must_use]
    pub fn last_request(&self) -> Option<AppleSignInRequest> {
        self.last_request.lock().unwrap().clone()
    }

    /// Take the stashed completion handle, if this flow was built with
    /// [`MockAppleSignIn::stashing`] and has been presented.
    #[must_use]
    pub fn take_handle(&self) -> Option<AppleFlowHandle> {
        self.stashed_handle.lock().unwrap().take()
    }
}

impl AppleSignIn for MockAppleSignIn {
    fn present(&self, request: AppleSignInRequest, handle: AppleFlowHandle) {
        *self.last_request.lock().unwrap() = Some(request);
        match &self.behavior {
            AppleBehavior::Succeed(authorization) => handle.succeed(authorization.clone()),
            AppleBehavior::Fail(error) => handle.fail(error.clone()),
            AppleBehavior::Ignore => drop(handle),
            AppleBehavior::Stash => *self.stashed_handle.lock().unwrap() = Some(handle),
        }
    }
}
