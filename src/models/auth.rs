//! Common authentication error types
//!
//! This module provides the unified error taxonomy used across all sign-in
//! flows, plus the structured backend error carried back from the identity
//! backend collaborator.

use crate::providers::ProviderError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Which token was absent from a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    GoogleId,
    GoogleAccess,
    AppleIdentity,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GoogleId => "Google ID token",
            Self::GoogleAccess => "Google access token",
            Self::AppleIdentity => "Apple identity token",
        };
        f.write_str(name)
    }
}

/// Error type for sign-in orchestration operations.
///
/// Every failure surfaces to the immediate caller as one of these variants;
/// nothing is retried internally. Retry policy, if any, belongs to the
/// caller.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad input to an operation, such as a zero nonce length.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A required token was absent from a provider response.
    #[error("{0} missing from provider response")]
    MissingToken(TokenKind),
    /// The raw nonce was absent when the Apple credential was built.
    #[error("raw nonce missing from Apple sign-in attempt")]
    MissingNonce,
    /// An Apple completion arrived after its nonce had been invalidated.
    /// The attempt must fail rather than silently authenticate.
    #[error("Apple sign-in completed after its nonce was invalidated")]
    NonceExpired,
    /// The provider flow closed without yielding a result or an error.
    #[error("provider flow closed without a response")]
    NoResponse,
    /// The operation requires a signed-in user and none exists.
    #[error("no user is currently signed in")]
    NotAuthenticated,
    /// Failure reported by the identity backend.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// Failure reported by a platform sign-in flow, including user cancel.
    #[error("sign-in provider error: {0}")]
    Provider(#[from] ProviderError),
    /// The secure random source is unavailable. Unrecoverable; the
    /// operation aborts rather than degrading nonce quality.
    #[error("secure random source unavailable: {0}")]
    EnvironmentFault(String),
}

impl AuthError {
    /// Friendly message suitable for direct display to the user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Backend(err) => err.user_message(),
            Self::NotAuthenticated => SIGN_IN_REQUIRED_MESSAGE,
            _ => UNKNOWN_ERROR_MESSAGE,
        }
    }
}

const SIGN_IN_REQUIRED_MESSAGE: &str = "You need to be signed in to do that.";
const UNKNOWN_ERROR_MESSAGE: &str = "Unknown authentication error.";

/// Structured failure codes reported by the identity backend.
///
/// Matching on codes instead of provider error strings keeps the friendly
/// message table stable across provider wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorCode {
    InvalidCredential,
    UserNotFound,
    EmailAlreadyInUse,
    WeakPassword,
    NotSignedIn,
    Network,
    Unknown,
}

/// Opaque failure from the identity backend, carrying a structured code
/// and the backend's own human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identity backend error: {message}")]
pub struct BackendError {
    pub code: BackendErrorCode,
    pub message: String,
}

impl BackendError {
    #[must_use]
    pub fn new(code: BackendErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Friendly message for the error code, defaulting to a generic
    /// unknown-error message for unmapped codes.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        FRIENDLY_MESSAGES
            .get(&self.code)
            .copied()
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
    }
}

static FRIENDLY_MESSAGES: Lazy<HashMap<BackendErrorCode, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            BackendErrorCode::InvalidCredential,
            "The password is incorrect.\nPlease, try again.",
        ),
        (
            BackendErrorCode::UserNotFound,
            "No account matches those details.",
        ),
        (
            BackendErrorCode::EmailAlreadyInUse,
            "An account with that email already exists.",
        ),
        (
            BackendErrorCode::WeakPassword,
            "That password is too weak. Pick a longer one.",
        ),
        (BackendErrorCode::NotSignedIn, SIGN_IN_REQUIRED_MESSAGE),
        (
            BackendErrorCode::Network,
            "A network error occurred. Check your connection and try again.",
        ),
    ])
});
