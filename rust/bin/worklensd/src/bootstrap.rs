//! Bootstrap — startup checks and password verification.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordVerifier};

use crate::config::ServerConfig;

/// Verify server configuration is ready for production use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.root.password_hash.is_empty() {
        anyhow::bail!(
            "No root password hash found in configuration.\n\
             Run `worklens context create <name>` to set up the server first."
        );
    }
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.site.host.is_empty() {
        anyhow::bail!("Site host is empty in configuration.");
    }
    Ok(())
}

/// Verify a password against the stored argon2id hash. A malformed
/// hash simply fails verification.
pub fn verify_root_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
