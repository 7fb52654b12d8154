//! Server configuration, built once at startup and handed to the listener.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, header};

use cravey_core::CsvProcessor;
use cravey_shared::{AppConfig, CorsSettings, Result};

/// Everything the listener needs. There is no process-wide state beyond this.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub addr: SocketAddr,
    /// Cross-origin policy applied to every response.
    pub cors: CorsPolicy,
    /// Version reported by `/health`.
    pub version: String,
    /// Collaborator that turns an input CSV file into an enriched one.
    pub processor: Arc<dyn CsvProcessor>,
}

impl ServerConfig {
    /// Build from the loaded app config plus the resolved bind address.
    pub fn from_app_config(
        app: &AppConfig,
        addr: SocketAddr,
        processor: Arc<dyn CsvProcessor>,
    ) -> Self {
        Self {
            addr,
            cors: CorsPolicy::from(&app.cors),
            version: app.server.version.clone(),
            processor,
        }
    }

    /// Same as [`Self::from_app_config`] but resolving the address from
    /// `[server]`, the CLI overrides, and the `PORT` variable.
    pub fn resolve(
        app: &AppConfig,
        host: Option<&str>,
        port: Option<u16>,
        env_port: Option<&str>,
        processor: Arc<dyn CsvProcessor>,
    ) -> Result<Self> {
        let port = app.server.resolve_port(port, env_port)?;
        let addr = app.server.socket_addr(host, port)?;
        Ok(Self::from_app_config(app, addr, processor))
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("addr", &self.addr)
            .field("cors", &self.cors)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

/// Which cross-origin callers may use the API.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
    allowed_methods: String,
    allowed_headers: String,
}

impl Default for CorsPolicy {
    /// Any origin, `GET, POST, OPTIONS`, `Content-Type, Accept, Authorization`.
    fn default() -> Self {
        Self::from(&CorsSettings::default())
    }
}

impl From<&CorsSettings> for CorsPolicy {
    fn from(settings: &CorsSettings) -> Self {
        Self {
            allowed_origins: settings.allowed_origins.clone(),
            allowed_methods: settings.allowed_methods.join(", "),
            allowed_headers: settings.allowed_headers.join(", "),
        }
    }
}

impl CorsPolicy {
    fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Value for `Access-Control-Allow-Origin`, or `None` if `origin` is not allowed.
    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        if self.allows_any_origin() {
            return Some(HeaderValue::from_static("*"));
        }
        let origin = origin?;
        let requested = origin.to_str().ok()?;
        self.allowed_origins
            .iter()
            .any(|o| o == requested)
            .then(|| origin.clone())
    }

    /// Write the CORS headers for a response to a request from `origin`.
    ///
    /// Preflight responses also carry the allowed methods and headers.
    pub fn apply(&self, origin: Option<&HeaderValue>, preflight: bool, headers: &mut HeaderMap) {
        if !self.allows_any_origin() {
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }

        let Some(allow) = self.allow_origin(origin) else {
            return;
        };
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow);

        if preflight {
            if let Ok(methods) = HeaderValue::from_str(&self.allowed_methods) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, methods);
            }
            if let Ok(allowed) = HeaderValue::from_str(&self.allowed_headers) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allowed);
            }
        }
    }
}
