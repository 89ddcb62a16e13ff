//! Configuration loading and validation for the `encryptor` binary.
//!
//! All values are read from environment variables at startup. The library
//! API takes no configuration; only the command-line front end uses this.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated `encryptor` configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the gateway public key: PEM (SPKI or PKCS#1) or base64 DER.
    /// **Required.**
    pub public_key_path: String,

    /// Identifier the gateway issued the public key under. **Required.**
    pub key_id: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON rather than human-readable text.
    #[serde(default = "default_log_json")]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_json() -> bool {
    true
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.public_key_path, "PUBLIC_KEY_PATH")?;
        ensure_non_empty(&self.key_id, "KEY_ID")?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
