//! Session token cache
//!
//! A single-value, last-write-wins holder of the current session ID token,
//! refreshed after every successful sign-in. The token lives in memory
//! only and is never persisted; its lifetime is managed entirely by the
//! backend.

use crate::backend::IdentityBackend;
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// An ID token together with the instant it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    pub refreshed_at: DateTime<Utc>,
}

impl CachedToken {
    fn new(value: String) -> Self {
        Self {
            value,
            refreshed_at: Utc::now(),
        }
    }

    /// Age of the cached token. Staleness policy is the caller's; the
    /// cache itself applies no TTL.
    #[must_use]
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.refreshed_at
    }
}

/// Process-scoped cache of the current session token.
///
/// Writes are atomic pointer swaps, so concurrent refreshes are safe; the
/// last completed write wins with no ordering guarantee between racers.
///
/// Sign-in paths refresh this cache fire-and-forget: a reader immediately
/// after a successful sign-in may still observe an absent or previous
/// token until the refresh lands. That eventual-consistency window is by
/// contract, not a defect.
#[derive(Default)]
pub struct SessionTokenCache {
    token: ArcSwapOption<CachedToken>,
}

impl SessionTokenCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token, if any refresh has completed since the last
    /// clear.
    #[must_use]
    pub fn current(&self) -> Option<Arc<CachedToken>> {
        self.token.load_full()
    }

    /// Force-fetch a fresh ID token from the backend and overwrite the
    /// cached value. A failed fetch is logged and leaves the cache
    /// untouched; the refresh is best effort.
    pub async fn refresh(&self, backend: &dyn IdentityBackend) {
        match backend.id_token(true).await {
            Ok(token) => {
                self.token.store(Some(Arc::new(CachedToken::new(token))));
                log::debug!("session token refreshed");
            }
            Err(err) => log::debug!("session token refresh failed: {err}"),
        }
    }

    /// Drop the cached token, e.g. on sign-out.
    pub fn clear(&self) {
        self.token.store(None);
    }
}
