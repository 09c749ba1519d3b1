use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::model::ArtifactOrderingPolicy;

const ENV_CONFIG_PATH: &str = "EO_DIGEST_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_JWT_SECRET: &str = "EO_DIGEST_JWT_SECRET";
const ENV_SITE_URL: &str = "EO_DIGEST_SITE_URL";
const DEFAULT_SITE_URL: &str = "https://slak.me";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "127.0.0.1";

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub artifact_order: ArtifactOrderingPolicy,
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub artifact_order: ArtifactOrderingPolicy,
    /// HS256 secret admin bearer tokens are signed with
    pub jwt_secret: Option<String>,
    /// Public site origin used to build sitemap URLs, without trailing slash
    pub site_url: String,
    pub port: u16,
    pub host: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("artifact_order", &self.artifact_order)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("site_url", &self.site_url)
            .field("port", &self.port)
            .field("host", &self.host)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifact_order: ArtifactOrderingPolicy::default(),
            jwt_secret: None,
            site_url: DEFAULT_SITE_URL.to_string(),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let jwt_secret = std::env::var(ENV_JWT_SECRET)
            .ok()
            .filter(|s| !s.trim().is_empty());
        if jwt_secret.is_none() {
            tracing::warn!("{} is not set, admin operations will be rejected", ENV_JWT_SECRET);
        }

        let site_url = normalize_site_url(
            &std::env::var(ENV_SITE_URL).unwrap_or_else(|_| DEFAULT_SITE_URL.to_string()),
        );

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let artifact_order = Self::load_config_file(&config_path)
            .map(|cf| cf.artifact_order)
            .unwrap_or_default();

        tracing::info!(
            version = artifact_order.version,
            sections = artifact_order.sections.len(),
            unlisted = ?artifact_order.unlisted,
            "Artifact ordering policy loaded"
        );

        Self {
            artifact_order,
            jwt_secret,
            site_url,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match parse_config_file(&contents) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration from file");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse the YAML config file; an empty file yields the defaults
pub fn parse_config_file(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
    let contents = contents.trim();
    if contents.is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(contents)
}

fn normalize_site_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
