#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the signon library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod backend;
pub mod credentials;
pub mod models;
pub mod nonce;
pub mod orchestrator;
pub mod providers;
pub mod session;
pub mod settings;

// Make test utilities available for both unit tests and integration tests
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use backend::IdentityBackend;
pub use credentials::{ExchangePayload, ProviderCredential};
pub use models::auth::{AuthError, BackendError, BackendErrorCode, TokenKind};
pub use models::{AppleAuthorization, AuthProvider, AuthenticatedUser, GoogleTokens, PersonName};
pub use orchestrator::SignInOrchestrator;
pub use providers::{
    AppleFlowHandle, AppleScope, AppleSignIn, AppleSignInRequest, GoogleSignIn, ProviderError,
};
pub use session::{CachedToken, SessionTokenCache};
pub use settings::SignonSettings;
