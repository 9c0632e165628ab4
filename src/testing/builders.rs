//! Builders and helpers for test fixture data

use crate::models::{AppleAuthorization, PersonName};
use base64::{engine::general_purpose, Engine as _};

/// Fluent builder for Apple authorization payloads.
#[derive(Default)]
pub struct AppleAuthorizationBuilder {
    identity_token: Option<Vec<u8>>,
    email: Option<String>,
    name: Option<PersonName>,
}

impl AppleAuthorizationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity token from a UTF-8 string, as the OS would deliver
    /// a JWT.
    #[must_use]
    pub fn with_identity_token(mut self, token: &str) -> Self {
        self.identity_token = Some(token.as_bytes().to_vec());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    #[must_use]
    pub fn with_name(mut self, given: &str, family: &str) -> Self {
        self.name = Some(PersonName {
            given: Some(given.to_string()),
            family: Some(family.to_string()),
            nickname: None,
        });
        self
    }

    #[must_use]
    pub fn build(self) -> AppleAuthorization {
        AppleAuthorization {
            identity_token: self.identity_token,
            email: self.email,
            name: self.name,
        }
    }
}

/// Assemble an unsigned JWT-shaped ID token for fixtures. The structure is
/// enough to stand in for a provider token; nothing verifies the empty
/// signature.
#[must_use]
pub fn fake_id_token(subject: &str, email: Option<&str>) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let claims = serde_json::json!({ "sub": subject, "email": email });
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.")
}
