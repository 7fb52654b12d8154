//! HTTP client for a remote Cravey enrichment server.
//!
//! Mirrors the two calls the import UI makes: a short health probe and a
//! long-running `POST /enrich` carrying the CSV export.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use cravey_shared::{
    ClientSettings, CraveyError, EnrichRequest, EnrichResponse, HealthResponse, Result,
};

/// User-Agent string for requests to the enrichment server.
const USER_AGENT: &str = concat!("Cravey/", env!("CARGO_PKG_VERSION"));

/// Default timeout in seconds for `/health`.
const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 10;

/// Default timeout in seconds for `/enrich`.
const DEFAULT_ENRICH_TIMEOUT_SECS: u64 = 300;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Timeouts for the two endpoints.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub health_timeout: Duration,
    pub enrich_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
            enrich_timeout: Duration::from_secs(DEFAULT_ENRICH_TIMEOUT_SECS),
        }
    }
}

impl From<&ClientSettings> for ClientOptions {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            health_timeout: Duration::from_secs(settings.health_timeout_secs),
            enrich_timeout: Duration::from_secs(settings.enrich_timeout_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Talks to one enrichment server.
#[derive(Debug, Clone)]
pub struct EnrichmentClient {
    http: Client,
    health_url: Url,
    enrich_url: Url,
    options: ClientOptions,
}

impl EnrichmentClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| CraveyError::config(format!("invalid server URL '{base_url}': {e}")))?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CraveyError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            health_url: endpoint(&base, "health")?,
            enrich_url: endpoint(&base, "enrich")?,
            options,
        })
    }

    /// Query `GET /health`.
    #[instrument(skip_all, fields(url = %self.health_url))]
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(self.health_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.options.health_timeout)
            .send()
            .await
            .map_err(|e| CraveyError::Network(format!("{}: {e}", self.health_url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CraveyError::Network(format!(
                "{}: HTTP {status}",
                self.health_url
            )));
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| CraveyError::Serialization(format!("invalid health response: {e}")))?;

        debug!(version = %health.version, "health check ok");
        Ok(health)
    }

    /// `true` if the server answers `/health` with a 2xx.
    pub async fn is_healthy(&self) -> bool {
        match self.health().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "health check failed");
                false
            }
        }
    }

    /// Send CSV text to `POST /enrich` and return the enriched CSV.
    #[instrument(skip_all, fields(url = %self.enrich_url, bytes = csv.len()))]
    pub async fn enrich(&self, csv: &str) -> Result<String> {
        info!("sending CSV for enrichment");

        let body = EnrichRequest {
            csv_data: csv.to_string(),
        };

        let response = self
            .http
            .post(self.enrich_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .timeout(self.options.enrich_timeout)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CraveyError::Network(format!(
                "API returned {}: {text}",
                status.as_u16()
            )));
        }

        let payload: EnrichResponse = response
            .json()
            .await
            .map_err(|e| CraveyError::Serialization(format!("invalid enrich response: {e}")))?;

        info!(bytes = payload.enriched_csv.len(), "received enriched CSV");
        Ok(payload.enriched_csv)
    }

    fn send_error(&self, e: reqwest::Error) -> CraveyError {
        if e.is_timeout() {
            CraveyError::Network(format!(
                "enrichment timed out after {}s; try processing in smaller batches",
                self.options.enrich_timeout.as_secs()
            ))
        } else {
            CraveyError::Network(format!("{}: {e}", self.enrich_url))
        }
    }
}

/// Join `path` onto `base`, treating `base` as a directory.
fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut dir = base.clone();
    if !dir.path().ends_with('/') {
        let with_slash = format!("{}/", dir.path());
        dir.set_path(&with_slash);
    }
    dir.join(path)
        .map_err(|e| CraveyError::config(format!("invalid endpoint {base}{path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn endpoints_respect_base_path() {
        let base = Url::parse("https://api.example.com/v1").unwrap();
        assert_eq!(
            endpoint(&base, "enrich").unwrap().as_str(),
            "https://api.example.com/v1/enrich"
        );

        let root = Url::parse("http://localhost:5000").unwrap();
        assert_eq!(
            endpoint(&root, "health").unwrap().as_str(),
            "http://localhost:5000/health"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = EnrichmentClient::new("not a url", ClientOptions::default()).unwrap_err();
        assert!(matches!(err, CraveyError::Config { .. }));
    }

    #[tokio::test]
    async fn health_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "message": "Secondary Enrichment API is running",
                "version": "1.0.1",
            })))
            .mount(&server)
            .await;

        let client = EnrichmentClient::new(&server.uri(), ClientOptions::default()).unwrap();
        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, "1.0.1");
        assert!(client.is_healthy().await);
    }

    #[tokio::test]
    async fn unhealthy_server_is_false() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = EnrichmentClient::new(&server.uri(), ClientOptions::default()).unwrap();
        assert!(client.health().await.is_err());
        assert!(!client.is_healthy().await);
    }

    #[tokio::test]
    async fn enrich_sends_csv_data_and_returns_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/enrich"))
            .and(body_json(serde_json::json!({ "csv_data": "name\nx\n" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "enriched_csv": "name,phone\nx,+44 20 7123 4567\n",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = EnrichmentClient::new(&server.uri(), ClientOptions::default()).unwrap();
        let csv = client.enrich("name\nx\n").await.unwrap();
        assert_eq!(csv, "name,phone\nx,+44 20 7123 4567\n");
    }

    #[tokio::test]
    async fn enrich_error_includes_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/enrich"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_string(r#"{"error":"processing failed: malformed CSV"}"#),
            )
            .mount(&server)
            .await;

        let client = EnrichmentClient::new(&server.uri(), ClientOptions::default()).unwrap();
        let err = client.enrich("a,b\n1\n").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("API returned 500"));
        assert!(message.contains("malformed CSV"));
    }

    #[tokio::test]
    async fn enrich_timeout_suggests_smaller_batches() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/enrich"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(serde_json::json!({ "enriched_csv": "" })),
            )
            .mount(&server)
            .await;

        let options = ClientOptions {
            enrich_timeout: Duration::from_millis(200),
            ..ClientOptions::default()
        };
        let client = EnrichmentClient::new(&server.uri(), options).unwrap();
        let err = client.enrich("name\nx\n").await.unwrap_err();
        assert!(err.to_string().contains("smaller batches"));
    }
}
