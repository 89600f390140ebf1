use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::export::Exporter;
use crate::lora::{ReportSource, UpstreamError, ValeraClient};

/// Shared, read-only application state.
pub struct AppState {
    pub exporter: Arc<Exporter>,
    pub reports: Arc<dyn ReportSource + Send + Sync>,
}

impl AppState {
    pub fn new(exporter: Exporter, reports: Arc<dyn ReportSource + Send + Sync>) -> Self {
        Self {
            exporter: Arc::new(exporter),
            reports,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, UpstreamError> {
        let client = ValeraClient::new(&config.valera_api, config.upstream_timeout)?;
        Ok(Self::new(
            Exporter::new(config.logo_path.clone()),
            Arc::new(client),
        ))
    }
}
