// File: src/config.rs
// Purpose: Configuration parsing from rhtmx-spa.toml

use crate::dom::MountMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Application shell settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,

    /// Name of the container routes mount into
    #[serde(default = "default_main")]
    pub main: String,

    /// Mount behavior for routes that don't pick one themselves
    #[serde(default)]
    pub mount_mode: MountMode,

    #[serde(default)]
    pub debug: bool,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Directory containing component folders (default: "components")
    #[serde(default = "default_components_dir")]
    pub components_dir: String,

    /// Clean up slashes before matching (default: false)
    #[serde(default)]
    pub normalize_paths: bool,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Where guarded routes send unauthenticated visitors
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Upper bound for one authenticate call, in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    #[serde(default)]
    pub users: Vec<UserEntry>,
}

/// A user known to the in-memory authenticator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntry {
    pub username: String,
    pub password: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub keys: Option<String>,
}

impl UserEntry {
    /// Display name, falling back to the username
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }
}

impl AuthConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

// Default values
fn default_title() -> String {
    "rhtmx-spa".to_string()
}

fn default_main() -> String {
    "main".to_string()
}

fn default_components_dir() -> String {
    "components".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            main: default_main(),
            mount_mode: MountMode::Replace,
            debug: false,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            components_dir: default_components_dir(),
            normalize_paths: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            timeout_ms: None,
            users: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./rhtmx-spa.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx-spa.toml")
    }
}
