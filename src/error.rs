use actix_web::error::{BlockingError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::lora::UpstreamError;
use crate::render::RenderError;

/// Uniform JSON error body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str, status: StatusCode) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            status_code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message, StatusCode::NOT_FOUND)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message, StatusCode::BAD_REQUEST)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new("BadGateway", message, StatusCode::BAD_GATEWAY)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Everything an export request can fail with.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("renderer produced an empty document")]
    EmptyDocument,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("render task failed: {0}")]
    Blocking(String),
}

impl From<BlockingError> for ExportError {
    fn from(err: BlockingError) -> Self {
        ExportError::Blocking(err.to_string())
    }
}

impl ExportError {
    fn envelope(&self) -> ErrorResponse {
        match self {
            ExportError::UnsupportedFormat(_) | ExportError::Validation(_) => {
                ErrorResponse::bad_request(&self.to_string())
            }
            ExportError::Render(err) if err.is_validation() => {
                ErrorResponse::bad_request(&err.to_string())
            }
            ExportError::Upstream(err) => {
                ErrorResponse::bad_gateway(&format!("Failed to fetch reports: {}", err))
            }
            ExportError::Render(_) | ExportError::EmptyDocument | ExportError::Blocking(_) => {
                ErrorResponse::internal_error("Failed to generate the document")
            }
        }
    }
}

impl ResponseError for ExportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ExportError::UnsupportedFormat(_) | ExportError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ExportError::Render(err) if err.is_validation() => StatusCode::BAD_REQUEST,
            ExportError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ExportError::Render(_) | ExportError::EmptyDocument | ExportError::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Export failed: {}", self);
        } else {
            log::warn!("Export rejected: {}", self);
        }
        HttpResponse::build(status).json(self.envelope())
    }
}

/// Malformed JSON bodies answer with the same envelope as every other error.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::bad_request(&format!("Invalid JSON body: {}", err));
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
        .into()
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}
