//! `encryptor`: command-line front end for payment-field encryption.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured logging (stderr).
//! 3. Load the gateway public key from `PUBLIC_KEY_PATH`.
//! 4. Read one request JSON document from stdin.
//! 5. Print the envelope on stdout.

use std::io::Read;

use anyhow::{Context, Result};
use tracing::info;

use encryptor::config::Config;
use encryptor::{telemetry, PaymentEncryptor, PublicKeyMaterial, RequestEncryptionData};

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level, cfg.log_json)?;
    info!(version = env!("CARGO_PKG_VERSION"), kid = %cfg.key_id, "encryptor starting");

    // -----------------------------------------------------------------------
    // 3. Public key
    // -----------------------------------------------------------------------
    let key_text = std::fs::read_to_string(&cfg.public_key_path)
        .with_context(|| format!("failed to read public key from {}", cfg.public_key_path))?;
    let public_key = load_public_key(&cfg.key_id, &key_text)?;

    // -----------------------------------------------------------------------
    // 4. Request
    // -----------------------------------------------------------------------
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read request from stdin")?;
    let request: RequestEncryptionData =
        serde_json::from_str(&input).context("request is not a valid payment request document")?;

    // -----------------------------------------------------------------------
    // 5. Encrypt
    // -----------------------------------------------------------------------
    let envelope = PaymentEncryptor::new()
        .encrypt(request, Some(&public_key))
        .context("payment field encryption failed")?;
    println!("{envelope}");

    Ok(())
}

fn load_public_key(key_id: &str, text: &str) -> Result<PublicKeyMaterial> {
    let key = if text.trim_start().starts_with("-----BEGIN") {
        PublicKeyMaterial::from_pem(key_id, text)
    } else {
        PublicKeyMaterial::from_base64_der(key_id, text)
    };
    key.context("failed to parse gateway public key")
}
