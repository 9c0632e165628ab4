//! Testing utilities for signon
//!
//! Mock collaborators and fixture builders for exercising sign-in flows
//! without a real identity backend or platform SDK. Available to unit
//! tests, and to integration tests through the `testing` cargo feature.
//!
//! ## Organization
//!
//! - [`mocks`] - Mock backend and platform sign-in flows
//! - [`builders`] - Builders and helpers for fixture data

pub mod builders;
pub mod mocks;

// Re-export commonly used items for convenience
pub use builders::{fake_id_token, AppleAuthorizationBuilder};
pub use mocks::{MockAppleSignIn, MockGoogleSignIn, MockIdentityBackend};

/// Common test constants
pub mod constants {
    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";

    /// Default test password
    pub const TEST_PASSWORD: &str = "correct horse battery staple";

    /// Default test user id
    pub const TEST_USER_ID: &str = "user-123";

    /// Default stub session token
    pub const TEST_SESSION_TOKEN: &str = "stub-session-token";
}
