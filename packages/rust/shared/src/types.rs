//! Wire types exchanged between the enrichment server and its clients.

use serde::{Deserialize, Serialize};

/// Version string reported by `/health` when the config does not override it.
pub const API_VERSION: &str = "1.0.1";

/// Name of the JSON field carrying the CSV payload in an enrich request.
pub const CSV_DATA_FIELD: &str = "csv_data";

// ---------------------------------------------------------------------------
// Enrich
// ---------------------------------------------------------------------------

/// Body of `POST /enrich`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichRequest {
    /// Raw CSV text, header row first.
    pub csv_data: String,
}

impl EnrichRequest {
    /// Extract a request from an arbitrary JSON value.
    ///
    /// Returns `None` unless the value is an object with a string `csv_data`
    /// field. Extra fields are ignored.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let csv_data = value.get(CSV_DATA_FIELD)?.as_str()?;
        Some(Self {
            csv_data: csv_data.to_string(),
        })
    }
}

/// Successful response from `POST /enrich`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichResponse {
    /// The enriched CSV text.
    pub enriched_csv: String,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Response from `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers at all.
    pub status: String,
    /// Human-readable banner.
    pub message: String,
    /// Server API version.
    pub version: String,
}

impl HealthResponse {
    /// The static "available" signal.
    pub fn ok(version: impl Into<String>) -> Self {
        Self {
            status: "ok".into(),
            message: "Secondary Enrichment API is running".into(),
            version: version.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enrich_request_from_object() {
        let value = json!({ "csv_data": "name\nJoe's Diner\n", "extra": 1 });
        let req = EnrichRequest::from_value(&value).expect("request");
        assert_eq!(req.csv_data, "name\nJoe's Diner\n");
    }

    #[test]
    fn enrich_request_rejects_missing_or_wrong_type() {
        assert!(EnrichRequest::from_value(&json!({})).is_none());
        assert!(EnrichRequest::from_value(&json!({ "csv": "a" })).is_none());
        assert!(EnrichRequest::from_value(&json!({ "csv_data": 5 })).is_none());
        assert!(EnrichRequest::from_value(&json!(["csv_data"])).is_none());
        assert!(EnrichRequest::from_value(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn empty_csv_data_is_still_a_request() {
        let req = EnrichRequest::from_value(&json!({ "csv_data": "" })).expect("request");
        assert!(req.csv_data.is_empty());
    }

    #[test]
    fn health_serialization() {
        let json = serde_json::to_value(HealthResponse::ok(API_VERSION)).expect("serialize");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], "1.0.1");
        assert_eq!(json["message"], "Secondary Enrichment API is running");
    }
}
