//! Library configuration
//!
//! Settings are loaded with the following priority (highest to lowest):
//! environment variables, `Settings.toml` in `SIGNON_SECRETS_DIR`,
//! `Settings.toml` in the current directory, built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SignonSettings {
    pub nonce: NonceSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NonceSettings {
    /// Length, in characters, of the nonce bound to each Apple sign-in
    /// attempt.
    pub length: usize,
}

impl Default for NonceSettings {
    fn default() -> Self {
        Self {
            length: crate::nonce::DEFAULT_NONCE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Soft staleness bound, in seconds, callers may apply to cached
    /// session tokens. The cache itself enforces no TTL.
    pub token_max_age_seconds: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            token_max_age_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SignonSettings {
    /// Load settings from configuration files and environment variables.
    /// Also initializes the logger unless the host application already
    /// installed one.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self> {
        Self::initialize_logging();
        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        Ok(settings)
    }

    /// Initialize env_logger; a host application may already own the
    /// global logger, in which case this is a no-op.
    fn initialize_logging() {
        let _ = env_logger::try_init();
    }

    fn load_base_settings() -> Result<Self> {
        let mut settings = Self::default();

        let default_path = std::path::PathBuf::from("Settings.toml");
        if default_path.exists() {
            let toml_content = fs::read_to_string(&default_path)
                .with_context(|| format!("failed to read {}", default_path.display()))?;
            settings = basic_toml::from_str(&toml_content)
                .with_context(|| format!("failed to parse {}", default_path.display()))?;
            log::info!("loaded base settings from {}", default_path.display());
        }

        if let Ok(secrets_dir) = std::env::var("SIGNON_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                let toml_content = fs::read_to_string(&secrets_path)
                    .with_context(|| format!("failed to read {}", secrets_path.display()))?;
                settings = basic_toml::from_str(&toml_content)
                    .with_context(|| format!("failed to parse {}", secrets_path.display()))?;
                log::info!("overriding settings from {}", secrets_path.display());
            } else {
                log::info!(
                    "SIGNON_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    fn apply_env_overrides(settings: &mut Self) {
        Self::apply_numeric_env_override("SIGNON_NONCE_LENGTH", &mut settings.nonce.length);
        Self::apply_numeric_env_override(
            "SIGNON_TOKEN_MAX_AGE_SECONDS",
            &mut settings.session.token_max_age_seconds,
        );
        if let Ok(level) = std::env::var("RUST_LOG") {
            settings.logging.level = level;
        }
    }

    /// Helper to apply numeric environment variable overrides.
    fn apply_numeric_env_override<T: std::str::FromStr>(env_var: &str, target: &mut T) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.parse::<T>() {
                *target = value;
            }
        }
    }
}
