//! Server configuration.
//!
//! Defaults work out of the box; a TOML file can override any subset of
//! fields, and CLI flags override the file (see the server binary).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Directory of challenge pack TOML files. The builtin tutorial campaign
    /// is used when unset.
    pub challenge_dir: Option<PathBuf>,
    /// Request limits
    pub limits: LimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Largest request body the server will read, in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            challenge_dir: None,
            limits: LimitConfig::default(),
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ServerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.challenge_dir.is_none());
        assert_eq!(config.limits.max_body_bytes, 64 * 1024);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 3000

            [limits]
            max_body_bytes = 1024
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.limits.max_body_bytes, 1024);
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = ServerConfig::from_path(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_challenge_dir_round_trips() {
        let config: ServerConfig = toml::from_str(r#"challenge_dir = "packs/campaign""#).unwrap();
        assert_eq!(config.challenge_dir, Some(PathBuf::from("packs/campaign")));
    }
}
