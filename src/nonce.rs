//! Cryptographic nonce generation for replay-protected sign-in flows
//!
//! The raw nonce is never handed to the provider; only its digest goes out
//! with the authorization request, and the raw value is presented back to
//! the backend for verification against the provider's signed response.

use crate::models::auth::AuthError;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Characters a nonce may contain: digits, upper and lower case ASCII
/// letters, `-`, `.` and `_`.
pub const NONCE_CHARSET: &[u8] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-._abcdefghijklmnopqrstuvwxyz";

/// Default nonce length, in characters, used by the Apple flow.
pub const DEFAULT_NONCE_LENGTH: usize = 32;

/// How many random bytes to draw from the OS per batch.
const RANDOM_BATCH_SIZE: usize = 16;

/// Generate a cryptographically random nonce of exactly `length`
/// characters drawn from [`NONCE_CHARSET`].
///
/// Bytes are drawn from the OS CSPRNG in batches and accepted only when
/// they fall below the charset size, so the distribution stays uniform
/// (no modulo bias).
///
/// # Errors
///
/// Returns [`AuthError::InvalidArgument`] for a zero length, and
/// [`AuthError::EnvironmentFault`] if the secure random source fails —
/// that fault is unrecoverable and must abort the sign-in attempt.
pub fn generate_nonce(length: usize) -> Result<String, AuthError> {
    if length == 0 {
        return Err(AuthError::InvalidArgument(
            "nonce length must be positive".to_string(),
        ));
    }

    let mut nonce = String::with_capacity(length);
    let mut batch = [0u8; RANDOM_BATCH_SIZE];
    while nonce.len() < length {
        OsRng
            .try_fill_bytes(&mut batch)
            .map_err(|e| AuthError::EnvironmentFault(e.to_string()))?;
        for &byte in &batch {
            if nonce.len() == length {
                break;
            }
            // Rejection sampling: only bytes inside the charset count.
            if (byte as usize) < NONCE_CHARSET.len() {
                nonce.push(char::from(NONCE_CHARSET[byte as usize]));
            }
        }
    }

    Ok(nonce)
}

/// Hex-encoded SHA-256 digest of the nonce's UTF-8 bytes.
#[must_use]
pub fn nonce_digest(nonce: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}
