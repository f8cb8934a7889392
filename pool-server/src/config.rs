//! Server configuration.
//!
//! Values come from three layers, later ones winning:
//!
//! 1. built-in defaults ([`ServerConfig::default`]);
//! 2. a TOML file, either passed with `--config` or `pool-server.toml` in
//!    the working directory when it exists;
//! 3. command-line flags.
//!
//! ```toml
//! listen = "0.0.0.0:8080"
//! data_dir = "/var/lib/pool"
//! log_level = "debug"
//!
//! [db]
//! backend = "sqlite"
//! connection_string = "/var/lib/pool/estimates.db"
//!
//! [company]
//! name = "MOSPOOL"
//! phone = "+7 985 200-00-41"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pool_core::db::DbConfig;
use pool_core::export::CompanyProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "pool-server.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    pub listen: String,
    /// Holds `clients.json` and the `drafts/` directory.
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Log file, in addition to stdout.
    pub log_file: Option<PathBuf>,
    pub db: DbConfig,
    pub company: CompanyProfile,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_string(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            log_file: None,
            db: DbConfig {
                backend: "sqlite".to_string(),
                connection_string: "estimates.db".to_string(),
            },
            company: CompanyProfile::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid server configuration")
    }

    /// Reads `path`, or the default file when `path` is `None` and the
    /// default file exists. Falls back to built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    debug!("No configuration file, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn clients_file(&self) -> PathBuf {
        self.data_dir.join("clients.json")
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.data_dir.join("drafts")
    }
}
