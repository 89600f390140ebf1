use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to VALERA API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("VALERA API answered with status {status}")]
    Status { status: u16 },
    #[error("VALERA API returned an unexpected body: {0}")]
    Decode(String),
    #[error("invalid VALERA API URL: {0}")]
    InvalidUrl(String),
}

/// Query parameters accepted by the filtered list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rig: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
}

/// Where LORA report records come from.
#[async_trait]
pub trait ReportSource {
    async fn fetch_all(&self) -> Result<Vec<Value>, UpstreamError>;
    async fn fetch_by_id(&self, id: u64) -> Result<Value, UpstreamError>;
    async fn fetch_by_user(&self, user_id: &str) -> Result<Vec<Value>, UpstreamError>;
    async fn fetch_filtered(&self, filter: &ReportFilter) -> Result<Vec<Value>, UpstreamError>;
}

/// HTTP client for `GET {base}/lora-report[...]`.
pub struct ValeraClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ValeraClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("valera-export-service/1.0")
            .build()?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL extended by `segments`, each percent-encoded as one path
    /// segment so caller input cannot add segments or a query.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url, filter: Option<&ReportFilter>) -> Result<Value, UpstreamError> {
        log::info!("Fetching {}", url);

        let mut request = self.http.get(url.clone());
        if let Some(filter) = filter {
            request = request.query(filter);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            log::error!("VALERA API {} answered {}", url, status);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    async fn get_list(&self, url: Url, filter: Option<&ReportFilter>) -> Result<Vec<Value>, UpstreamError> {
        match self.get_json(url, filter).await? {
            Value::Array(items) => Ok(items),
            other => Err(UpstreamError::Decode(format!(
                "expected a list of reports, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl ReportSource for ValeraClient {
    async fn fetch_all(&self) -> Result<Vec<Value>, UpstreamError> {
        self.get_list(self.endpoint(&["lora-report"])?, None).await
    }

    async fn fetch_by_id(&self, id: u64) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&["lora-report", &id.to_string()])?;
        match self.get_json(url, None).await? {
            record @ Value::Object(_) => Ok(record),
            other => Err(UpstreamError::Decode(format!(
                "expected a report object, got {}",
                json_kind(&other)
            ))),
        }
    }

    async fn fetch_by_user(&self, user_id: &str) -> Result<Vec<Value>, UpstreamError> {
        let url = self.endpoint(&["lora-report", "user", user_id])?;
        self.get_list(url, None).await
    }

    async fn fetch_filtered(&self, filter: &ReportFilter) -> Result<Vec<Value>, UpstreamError> {
        self.get_list(self.endpoint(&["lora-report"])?, Some(filter)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_trimmed() {
        let client = ValeraClient::new("http://localhost:3000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = ValeraClient::new("not a url", Duration::from_secs(1)).err().unwrap();
        assert!(matches!(err, UpstreamError::InvalidUrl(_)));
    }

    #[test]
    fn test_user_id_stays_one_path_segment() {
        let client = ValeraClient::new("http://localhost:3000/api/", Duration::from_secs(1)).unwrap();
        let url = client
            .endpoint(&["lora-report", "user", "../../admin?drop=1#x"])
            .unwrap();

        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(&segments[..3], &["api", "lora-report", "user"]);
        assert!(!segments[3].contains('/'));
        assert!(url.path().starts_with("/api/lora-report/user/"));
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let client = ValeraClient::new("http://localhost:3000", Duration::from_secs(1)).unwrap();
        let url = client.endpoint(&["lora-report", "42"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/lora-report/42");
    }

    #[test]
    fn test_filter_serializes_only_present_keys() {
        let filter = ReportFilter {
            status: Some("open".into()),
            report_type: Some("hazard".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "open", "reportType": "hazard" }));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        let client = ValeraClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.fetch_all().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)));
    }
}
