//! Server configuration — TOML file loaded at startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub site: SiteConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    pub jwt: JwtConfig,
    pub root: RootConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Public host of the site, used to classify internal links.
    /// May include a port ("reviews.example.com:8080").
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database and other state.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct I18nConfig {
    /// Directory containing `{lang}.json` translation files.
    /// Defaults to `{data_dir}/translations`.
    #[serde(default)]
    pub translations_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GeoConfig {
    /// Path to a MaxMind country `.mmdb` file. Missing or unreadable
    /// file disables IP detection instead of failing startup.
    #[serde(default)]
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: u64,
}

fn default_expire_secs() -> u64 {
    86400
}

#[derive(Debug, Clone, Deserialize)]
pub struct RootConfig {
    /// argon2id hash of the root password.
    pub password_hash: String,
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<ServerConfig> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {:?}: {}", path, e))?;
        let config: ServerConfig = toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("invalid config {:?}: {}", path, e))?;
        Ok(config)
    }

    pub fn resolve_db_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join("reviews.sqlite")
    }

    pub fn resolve_translations_dir(&self) -> PathBuf {
        match &self.i18n.translations_dir {
            Some(dir) => PathBuf::from(dir),
            None => Path::new(&self.storage.data_dir).join("translations"),
        }
    }
}
