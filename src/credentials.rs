//! Credential exchange: provider-specific token material to backend payload
//!
//! Pure mapping with no network or state. Required fields are checked here
//! so that an invalid provider response fails before any backend call is
//! attempted.

use crate::models::auth::{AuthError, TokenKind};
use crate::models::AuthProvider;

/// Raw credential material for one sign-in attempt. Exactly one variant is
/// populated per attempt.
#[derive(Debug, Clone)]
pub enum ProviderCredential {
    EmailPassword {
        email: String,
        password: String,
    },
    Anonymous,
    /// Tokens as returned by the Google SDK; either may be absent.
    GoogleTokens {
        id_token: Option<String>,
        access_token: Option<String>,
    },
    /// Apple identity token plus the raw (undigested) nonce of the attempt.
    AppleTokens {
        id_token: Option<String>,
        raw_nonce: Option<String>,
    },
}

impl ProviderCredential {
    #[must_use]
    pub const fn provider(&self) -> AuthProvider {
        match self {
            Self::EmailPassword { .. } => AuthProvider::Email,
            Self::Anonymous => AuthProvider::Anonymous,
            Self::GoogleTokens { .. } => AuthProvider::Google,
            Self::AppleTokens { .. } => AuthProvider::Apple,
        }
    }

    /// Validate the credential and convert it into the backend-facing
    /// exchange payload.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingToken`] when a required Google or Apple
    /// token is absent, and [`AuthError::MissingNonce`] when the Apple raw
    /// nonce is absent.
    pub fn into_payload(self) -> Result<ExchangePayload, AuthError> {
        match self {
            Self::EmailPassword { email, password } => {
                Ok(ExchangePayload::EmailPassword { email, password })
            }
            Self::Anonymous => Ok(ExchangePayload::Anonymous),
            Self::GoogleTokens {
                id_token,
                access_token,
            } => {
                let id_token = id_token.ok_or(AuthError::MissingToken(TokenKind::GoogleId))?;
                let access_token =
                    access_token.ok_or(AuthError::MissingToken(TokenKind::GoogleAccess))?;
                Ok(ExchangePayload::Google {
                    id_token,
                    access_token,
                })
            }
            Self::AppleTokens {
                id_token,
                raw_nonce,
            } => {
                let id_token = id_token.ok_or(AuthError::MissingToken(TokenKind::AppleIdentity))?;
                let raw_nonce = raw_nonce.ok_or(AuthError::MissingNonce)?;
                Ok(ExchangePayload::Apple {
                    id_token,
                    raw_nonce,
                })
            }
        }
    }
}

/// Validated exchange payload handed to the identity backend. All required
/// fields are guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangePayload {
    EmailPassword {
        email: String,
        password: String,
    },
    Anonymous,
    Google {
        id_token: String,
        access_token: String,
    },
    Apple {
        id_token: String,
        raw_nonce: String,
    },
}

impl ExchangePayload {
    #[must_use]
    pub const fn provider(&self) -> AuthProvider {
        match self {
            Self::EmailPassword { .. } => AuthProvider::Email,
            Self::Anonymous => AuthProvider::Anonymous,
            Self::Google { .. } => AuthProvider::Google,
            Self::Apple { .. } => AuthProvider::Apple,
        }
    }
}
