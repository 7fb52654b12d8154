//! Application configuration for Cravey.
//!
//! User config lives at `~/.cravey/cravey.toml`.
//! CLI flags override the `PORT` environment variable, which overrides config
//! file values, which override defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CraveyError, Result};
use crate::types::API_VERSION;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "cravey.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".cravey";

/// Environment variable consulted for the listen port.
pub const PORT_ENV_VAR: &str = "PORT";

// ---------------------------------------------------------------------------
// Config structs (matching cravey.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Cross-origin policy.
    #[serde(default)]
    pub cors: CorsSettings,

    /// Settings for talking to a remote enrichment server.
    #[serde(default)]
    pub client: ClientSettings,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Version reported by `/health`.
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            version: default_version(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}
fn default_version() -> String {
    API_VERSION.into()
}

/// `[cors]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. `"*"` allows any origin.
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,

    /// Allowed request methods.
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed request headers.
    #[serde(default = "default_headers")]
    pub allowed_headers: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: default_origins(),
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
        }
    }
}

fn default_origins() -> Vec<String> {
    vec!["*".into()]
}
fn default_methods() -> Vec<String> {
    vec!["GET".into(), "POST".into(), "OPTIONS".into()]
}
fn default_headers() -> Vec<String> {
    vec!["Content-Type".into(), "Accept".into(), "Authorization".into()]
}

/// `[client]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the remote enrichment server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for `/health` in seconds.
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,

    /// Timeout for `/enrich` in seconds.
    #[serde(default = "default_enrich_timeout")]
    pub enrich_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            health_timeout_secs: default_health_timeout(),
            enrich_timeout_secs: default_enrich_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".into()
}
fn default_health_timeout() -> u64 {
    10
}
fn default_enrich_timeout() -> u64 {
    300
}

impl ServerSettings {
    /// Resolve the port to bind: CLI flag, then `PORT`, then this section.
    ///
    /// `env_port` is the raw value of the environment variable, if set.
    pub fn resolve_port(&self, flag: Option<u16>, env_port: Option<&str>) -> Result<u16> {
        if let Some(port) = flag {
            return Ok(port);
        }
        match env_port.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse().map_err(|e| {
                CraveyError::config(format!("{PORT_ENV_VAR}={raw:?} is not a valid port: {e}"))
            }),
            None => Ok(self.port),
        }
    }

    /// Build the socket address to bind.
    pub fn socket_addr(&self, host: Option<&str>, port: u16) -> Result<SocketAddr> {
        let host = host.unwrap_or(&self.host);
        format!("{host}:{port}")
            .parse()
            .map_err(|e| CraveyError::config(format!("invalid listen address {host}:{port}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.cravey/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| CraveyError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.cravey/cravey.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CraveyError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CraveyError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    write_default_config(&dir)
}

/// Write a default config file into `dir`, creating it if needed.
pub fn write_default_config(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| CraveyError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| CraveyError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CraveyError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
