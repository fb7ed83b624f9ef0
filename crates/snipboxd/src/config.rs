//! snipboxd.toml configuration.
//!
//! Precedence, lowest first: built-in defaults, the optional TOML file,
//! command-line flags.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Interface to bind; all interfaces by default.
    pub host: String,
    pub port: u16,
    /// SQLite file holding the snippets table.
    pub database: PathBuf,
    /// Directory the frontend is served from.
    pub static_dir: PathBuf,
    /// File under `static_dir` served for `/` and unmatched paths.
    pub entry_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database: PathBuf::from("snippets.db"),
            static_dir: PathBuf::from("static"),
            entry_file: "index.html".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Defaults, or the given file if any.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid host address {:?}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
