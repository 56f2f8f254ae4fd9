//! Layered server configuration.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `./invoice-server.toml`, or the file passed with `--config`
//! 3. `INVOICE_*` environment variables (`INVOICE_DATABASE_PATH`, ...)
//! 4. `PORT`

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "invoice-server.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file path. `:memory:` opens a private in-memory database.
    pub database_path: String,
    /// Default tracing level for the `invoice_server` target. `RUST_LOG` wins.
    pub log_level: String,
    /// Replace caller-supplied invoice totals with the sum of the items.
    pub recompute_totals: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_path: "invoice.db".to_string(),
            log_level: "info".to_string(),
            recompute_totals: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load configuration from `./invoice-server.toml` with env overrides.
pub fn load_config() -> Result<ServerConfig, figment::Error> {
    load_config_from_path(Path::new(DEFAULT_CONFIG_FILE))
}

/// Load configuration from a specific file with env overrides.
///
/// A missing file is not an error; defaults and env still apply.
pub fn load_config_from_path(path: &Path) -> Result<ServerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ServerConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("INVOICE_"))
        .merge(Env::raw().only(&["port"]))
        .extract()
}

/// Load configuration from TOML text only. No environment lookup.
pub fn load_config_from_str(toml_content: &str) -> Result<ServerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ServerConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}
