//! Per-attempt Apple sign-in state
//!
//! One [`AppleFlow`] exists per attempt and owns that attempt's nonce. The
//! attempt moves through: nonce generated → prompt shown → completed
//! (success or failure) or expired. At most one nonce is current for an
//! attempt; a completion that arrives after the nonce was cleared must
//! fail instead of silently authenticating.

use crate::credentials::ProviderCredential;
use crate::models::auth::{AuthError, TokenKind};
use crate::models::AppleAuthorization;
use crate::nonce::{generate_nonce, nonce_digest};
use std::sync::{Arc, Mutex, PoisonError};

/// The single in-flight nonce of one attempt.
#[derive(Clone, Default)]
struct NonceState(Arc<Mutex<Option<String>>>);

impl NonceState {
    fn set(&self, nonce: String) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(nonce);
    }

    fn take(&self) -> Option<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// State for one Apple sign-in attempt.
pub(crate) struct AppleFlow {
    nonce: NonceState,
}

impl AppleFlow {
    /// Generate a fresh nonce and return the flow together with the digest
    /// to hand to the OS prompt. The raw nonce stays inside the flow.
    pub(crate) fn begin(nonce_length: usize) -> Result<(Self, String), AuthError> {
        let nonce = generate_nonce(nonce_length)?;
        let digest = nonce_digest(&nonce);
        let state = NonceState::default();
        state.set(nonce);
        Ok((Self { nonce: state }, digest))
    }

    /// Invalidate the in-flight nonce. Any completion arriving afterwards
    /// fails with [`AuthError::NonceExpired`].
    pub(crate) fn invalidate(&self) {
        self.nonce.take();
    }

    /// Build the Apple credential from a successful completion payload,
    /// consuming the attempt's nonce.
    ///
    /// The nonce check comes first: a stale completion must fail as
    /// expired even when its payload looks otherwise valid.
    pub(crate) fn complete(
        &self,
        authorization: AppleAuthorization,
    ) -> Result<ProviderCredential, AuthError> {
        let Some(raw_nonce) = self.nonce.take() else {
            return Err(AuthError::NonceExpired);
        };

        let id_token = match authorization.identity_token {
            Some(bytes) => Some(
                String::from_utf8(bytes)
                    .map_err(|_| AuthError::MissingToken(TokenKind::AppleIdentity))?,
            ),
            None => None,
        };

        Ok(ProviderCredential::AppleTokens {
            id_token,
            raw_nonce: Some(raw_nonce),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::ExchangePayload;
    use crate::testing::builders::AppleAuthorizationBuilder;

    #[test]
    fn completed_flow_yields_credential_with_raw_nonce() {
        let (flow, digest) = AppleFlow::begin(32).unwrap();
        let authorization = AppleAuthorizationBuilder::new()
            .with_identity_token("apple-jwt")
            .build();

        let credential = flow.complete(authorization).unwrap();
        let payload = credential.into_payload().unwrap();
        let ExchangePayload::Apple {
            id_token,
            raw_nonce,
        } = payload
        else {
            panic!("expected apple payload");
        };

        assert_eq!(id_token, "apple-jwt");
        assert_eq!(raw_nonce.len(), 32);
        // The digest sent to the prompt must never equal the raw nonce.
        assert_ne!(raw_nonce, digest);
        assert_eq!(crate::nonce::nonce_digest(&raw_nonce), digest);
    }

    #[test]
    fn completion_after_invalidation_is_expired() {
        let (flow, _digest) = AppleFlow::begin(32).unwrap();
        flow.invalidate();

        let authorization = AppleAuthorizationBuilder::new()
            .with_identity_token("apple-jwt")
            .build();
        assert!(matches!(
            flow.complete(authorization),
            Err(AuthError::NonceExpired)
        ));
    }

    #[test]
    fn second_completion_is_expired() {
        let (flow, _digest) = AppleFlow::begin(32).unwrap();
        let authorization = AppleAuthorizationBuilder::new()
            .with_identity_token("apple-jwt")
            .build();

        flow.complete(authorization.clone()).unwrap();
        assert!(matches!(
            flow.complete(authorization),
            Err(AuthError::NonceExpired)
        ));
    }

    #[test]
    fn missing_identity_token_passes_through_as_absent() {
        let (flow, _digest) = AppleFlow::begin(32).unwrap();
        let credential = flow.complete(AppleAuthorization::default()).unwrap();
        // Presence is enforced at exchange, before any backend call.
        assert!(matches!(
            credential.into_payload(),
            Err(AuthError::MissingToken(TokenKind::AppleIdentity))
        ));
    }

    #[test]
    fn non_utf8_identity_token_is_rejected() {
        let (flow, _digest) = AppleFlow::begin(32).unwrap();
        let authorization = AppleAuthorization {
            identity_token: Some(vec![0xff, 0xfe, 0xfd]),
            ..AppleAuthorization::default()
        };
        assert!(matches!(
            flow.complete(authorization),
            Err(AuthError::MissingToken(TokenKind::AppleIdentity))
        ));
    }
}
