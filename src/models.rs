use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub mod auth;

/// Identity providers a sign-in attempt can be federated through.
///
/// The canonical id strings are the ones identity backends use to tag
/// linked provider accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthProvider {
    Google,
    Apple,
    Email,
    Anonymous,
}

impl AuthProvider {
    /// Canonical provider identifier string.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Google => "google.com",
            Self::Apple => "apple.com",
            Self::Email => "password",
            Self::Anonymous => "anonymous",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Normalized record of a signed-in user, produced only by a successful
/// exchange with the identity backend. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: Option<String>,
    pub photo_url: Option<Url>,
}

/// Raw token material handed back by the Google platform sign-in flow.
/// Either field may be absent; validation happens at credential exchange.
#[derive(Debug, Clone, Default)]
pub struct GoogleTokens {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
}

/// Name components Apple shares on the first authorization only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub given: Option<String>,
    pub family: Option<String>,
    pub nickname: Option<String>,
}

impl PersonName {
    /// Given and family name joined, falling back to whichever is present.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (self.given.as_deref(), self.family.as_deref()) {
            (Some(given), Some(family)) => Some(format!("{given} {family}")),
            (Some(given), None) => Some(given.to_string()),
            (None, Some(family)) => Some(family.to_string()),
            (None, None) => None,
        }
    }

    /// Full name, or the nickname when no name components were shared.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.full_name().or_else(|| self.nickname.clone())
    }
}

/// Payload delivered by the OS-level Apple sign-in callback.
///
/// The identity token arrives as raw bytes from the OS; UTF-8 decoding and
/// presence checks happen when the attempt's credential is built.
#[derive(Debug, Clone, Default)]
pub struct AppleAuthorization {
    pub identity_token: Option<Vec<u8>>,
    pub email: Option<String>,
    pub name: Option<PersonName>,
}
