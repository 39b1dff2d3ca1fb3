//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: COMICS_, sections separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/comics-api/config.toml
//! 4. System directory: /etc/comics-api/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;

const APP_NAME: &str = "comics-api";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Comic collection configuration
    #[serde(default)]
    pub comics: ComicsConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// One of `permissive`, `restrictive` or `disabled`
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            cors_mode: default_cors_mode(),
        }
    }
}

/// Settings for the comic collection endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComicsConfig {
    /// Absolute collection URI used for every hypermedia link.
    ///
    /// When unset, links are rebuilt from the request's scheme and host plus
    /// `mount_path`.
    #[serde(default)]
    pub base_uri: Option<String>,

    /// Path the collection is mounted at
    #[serde(default = "default_mount_path")]
    pub mount_path: String,

    /// Directory static assets are written to and served from
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Subdirectory of `assets_dir` holding uploaded images
    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    /// `max-age` sent with `Cache-Control` on fresh GET responses
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,

    /// Page size used when `limit` is present but not a positive integer
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Number of comics created by the seed endpoint when no amount is given
    #[serde(default = "default_seed_amount")]
    pub seed_amount: u32,
}

impl Default for ComicsConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            mount_path: default_mount_path(),
            assets_dir: default_assets_dir(),
            image_dir: default_image_dir(),
            cache_max_age_secs: default_cache_max_age(),
            default_limit: default_limit(),
            seed_amount: default_seed_amount(),
        }
    }
}

impl ComicsConfig {
    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    /// Mount path without a trailing slash, always starting with `/`
    pub fn normalized_mount_path(&self) -> String {
        let trimmed = self.mount_path.trim_matches('/');
        format!("/{trimmed}")
    }
}

// Default value functions
fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_body_limit_mb() -> usize {
    10
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_mount_path() -> String {
    "/comics".to_string()
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_image_dir() -> String {
    "images".to_string()
}

fn default_cache_max_age() -> u64 {
    60
}

fn default_limit() -> u32 {
    6
}

fn default_seed_amount() -> u32 {
    10
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so later files override earlier ones
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("COMICS_").split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("COMICS_").split("__"))
            .extract()?;

        Ok(config)
    }

    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current working directory (highest priority for dev/testing)
        paths.push(PathBuf::from("config.toml"));

        // 2. XDG config directory (~/.config/comics-api/config.toml)
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        if let Ok(path) = xdg_dirs.place_config_file("config.toml") {
            paths.push(path);
        }

        // 3. System-wide directory
        paths.push(PathBuf::from("/etc").join(APP_NAME).join("config.toml"));

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_NAME.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
            },
            middleware: MiddlewareConfig::default(),
            comics: ComicsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8000);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.comics.default_limit, 6);
        assert_eq!(config.comics.cache_max_age(), Duration::from_secs(60));
        assert!(config.comics.base_uri.is_none());
    }

    #[test]
    fn test_normalized_mount_path() {
        let mut comics = ComicsConfig::default();
        assert_eq!(comics.normalized_mount_path(), "/comics");

        comics.mount_path = "api/comics/".to_string();
        assert_eq!(comics.normalized_mount_path(), "/api/comics");
    }

    #[test]
    fn test_load_from_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "comics.toml",
                r#"
                [service]
                name = "comics-test"
                port = 9000

                [comics]
                base_uri = "http://example.test/comics/"
                "#,
            )?;
            jail.set_env("COMICS_COMICS__DEFAULT_LIMIT", "12");

            let config = Config::load_from("comics.toml").expect("config loads");
            assert_eq!(config.service.name, "comics-test");
            assert_eq!(config.service.port, 9000);
            assert_eq!(
                config.comics.base_uri.as_deref(),
                Some("http://example.test/comics/")
            );
            assert_eq!(config.comics.default_limit, 12);
            assert_eq!(config.comics.image_dir, "images");
            Ok(())
        });
    }
}
