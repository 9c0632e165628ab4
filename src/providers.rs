//! Platform sign-in collaborators
//!
//! The seam between the orchestrator and the vendor/OS sign-in SDKs. The
//! Google flow is a plain async call; the Apple flow is modeled after the
//! OS behavior of presenting a modal and delivering exactly one completion
//! callback, expressed here as a consumed-once handle over a capacity-one
//! channel.

use crate::models::{AppleAuthorization, GoogleTokens};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

/// Failure reported by a platform sign-in flow.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The user dismissed the sign-in prompt. A normal failure, not fatal.
    #[error("the user cancelled the sign-in prompt")]
    Cancelled,
    #[error("{0}")]
    Other(String),
}

/// Google platform sign-in flow: presents the vendor prompt and returns
/// whatever token material the SDK produced.
#[async_trait]
pub trait GoogleSignIn: Send + Sync {
    async fn sign_in(&self) -> Result<GoogleTokens, ProviderError>;
}

/// Scopes requested from the Apple sign-in prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppleScope {
    FullName,
    Email,
}

/// Request handed to the Apple platform flow. Carries the nonce digest,
/// never the raw nonce.
#[derive(Debug, Clone)]
pub struct AppleSignInRequest {
    pub nonce_digest: String,
    pub scopes: Vec<AppleScope>,
}

/// Completion handle for one Apple sign-in attempt.
///
/// The flow consumes the handle through exactly one of [`succeed`] or
/// [`fail`]; dropping it unfired closes the attempt with no response. A
/// completion whose awaiting attempt was abandoned is dropped silently —
/// no leak, no panic.
///
/// [`succeed`]: AppleFlowHandle::succeed
/// [`fail`]: AppleFlowHandle::fail
pub struct AppleFlowHandle {
    tx: oneshot::Sender<Result<AppleAuthorization, ProviderError>>,
}

impl AppleFlowHandle {
    pub(crate) fn channel() -> (
        Self,
        oneshot::Receiver<Result<AppleAuthorization, ProviderError>>,
    ) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Deliver a successful authorization.
    pub fn succeed(self, authorization: AppleAuthorization) {
        // An orphaned completion has no receiver; that is fine.
        let _ = self.tx.send(Ok(authorization));
    }

    /// Deliver a failure, including user cancellation.
    pub fn fail(self, error: ProviderError) {
        let _ = self.tx.send(Err(error));
    }
}

/// Apple platform sign-in flow: presents the OS modal for `request` and
/// delivers exactly one completion through `handle`.
pub trait AppleSignIn: Send + Sync {
    fn present(&self, request: AppleSignInRequest, handle: AppleFlowHandle);
}
