//! `worklens context create` — write a server config file.

use std::path::Path;

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

/// Create `{config_dir}/{name}.toml` with a fresh JWT secret and the
/// argon2id hash of the root password.
pub fn create(
    name: &str,
    config_dir: &str,
    data_dir: &str,
    site_host: &str,
    password: &str,
) -> anyhow::Result<()> {
    let config_path = Path::new(config_dir).join(format!("{}.toml", name));
    if config_path.exists() {
        anyhow::bail!("Config {} already exists.", config_path.display());
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?
        .to_string();

    // 44 chars of random base64 is plenty for an HMAC secret.
    let jwt_secret = format!(
        "{}{}",
        SaltString::generate(&mut OsRng).as_str(),
        SaltString::generate(&mut OsRng).as_str()
    );

    let config = format!(
        "[site]\n\
         host = \"{site_host}\"\n\
         \n\
         [storage]\n\
         data_dir = \"{data_dir}\"\n\
         \n\
         [jwt]\n\
         secret = \"{jwt_secret}\"\n\
         \n\
         [root]\n\
         password_hash = \"{password_hash}\"\n"
    );

    std::fs::create_dir_all(config_dir)?;
    std::fs::write(&config_path, config)?;
    println!("Created {}", config_path.display());
    println!("Start the server with: worklensd -c {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().to_str().unwrap();
        create("test", config_dir, "/tmp/wl-data", "example.com", "hunter2").unwrap();

        let text = std::fs::read_to_string(dir.path().join("test.toml")).unwrap();
        assert!(text.contains("host = \"example.com\""));
        assert!(text.contains("data_dir = \"/tmp/wl-data\""));
        assert!(text.contains("$argon2id$"));

        // Refuses to overwrite.
        assert!(create("test", config_dir, "/tmp/wl-data", "example.com", "x").is_err());
    }
}
