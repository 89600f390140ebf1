#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use serde_json::Value;

use valera_export_service::export::handlers::sample_report;
use valera_export_service::export::Exporter;
use valera_export_service::lora::{ReportFilter, ReportSource, UpstreamError};
use valera_export_service::AppState;

/// In-memory stand-in for the VALERA API.
pub struct MockReportSource {
    reports: Vec<Value>,
    fail_with_status: Option<u16>,
    last_filter: Mutex<Option<ReportFilter>>,
}

impl MockReportSource {
    pub fn new(reports: Vec<Value>) -> Self {
        Self {
            reports,
            fail_with_status: None,
            last_filter: Mutex::new(None),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reports: Vec::new(),
            fail_with_status: Some(status),
            last_filter: Mutex::new(None),
        }
    }

    pub fn last_filter(&self) -> Option<ReportFilter> {
        self.last_filter.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), UpstreamError> {
        match self.fail_with_status {
            Some(status) => Err(UpstreamError::Status { status }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReportSource for MockReportSource {
    async fn fetch_all(&self) -> Result<Vec<Value>, UpstreamError> {
        self.check()?;
        Ok(self.reports.clone())
    }

    async fn fetch_by_id(&self, id: u64) -> Result<Value, UpstreamError> {
        self.check()?;
        self.reports
            .iter()
            .find(|report| report.get("id").and_then(Value::as_u64) == Some(id))
            .cloned()
            .ok_or(UpstreamError::Status { status: 404 })
    }

    async fn fetch_by_user(&self, user_id: &str) -> Result<Vec<Value>, UpstreamError> {
        self.check()?;
        Ok(self
            .reports
            .iter()
            .filter(|report| {
                report
                    .get("userId")
                    .map(|value| match value {
                        Value::String(text) => text == user_id,
                        other => other.to_string() == user_id,
                    })
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn fetch_filtered(&self, filter: &ReportFilter) -> Result<Vec<Value>, UpstreamError> {
        self.check()?;
        *self.last_filter.lock().unwrap() = Some(filter.clone());
        Ok(self
            .reports
            .iter()
            .filter(|report| {
                filter
                    .status
                    .as_deref()
                    .map_or(true, |status| report["reportStatus"] == status)
            })
            .cloned()
            .collect())
    }
}

pub fn sample_reports() -> Vec<Value> {
    let mut second = sample_report();
    second["id"] = Value::from(102);
    second["userId"] = Value::from(8);
    second["reportStatus"] = Value::from("closed");
    second["reportTitle"] = Value::from("Loose handrail on stairs");
    vec![sample_report(), second]
}

pub fn app_state(source: MockReportSource) -> web::Data<AppState> {
    shared_app_state(Arc::new(source))
}

pub fn shared_app_state(source: Arc<MockReportSource>) -> web::Data<AppState> {
    web::Data::new(AppState::new(Exporter::default(), source))
}
