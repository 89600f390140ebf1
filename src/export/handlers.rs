use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, ExportError};
use crate::export::RendererKind;
use crate::render::ExportFormat;
use crate::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub status: String,
    pub docs: String,
    pub health: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub supported_formats: Vec<ExportFormat>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct FormatInfo {
    pub format: ExportFormat,
    pub content_type: String,
    pub extension: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct FormatsResponse {
    pub supported_formats: Vec<FormatInfo>,
}

/// Body of `POST /export`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExportRequest {
    #[schema(example = "pdf")]
    pub file_format: String,
    #[schema(value_type = Object)]
    pub data: Value,
    /// Base name without extension.
    pub filename: Option<String>,
    /// Accepted for compatibility, currently unused.
    #[schema(value_type = Option<Object>)]
    pub options: Option<Value>,
}

/// Body of the per-format endpoints. The raw report object is accepted too.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ShorthandExportRequest {
    #[schema(value_type = Object)]
    pub data: Value,
    pub filename: Option<String>,
}

/// Split a per-format body into data and requested filename.
///
/// `{data, filename}` without `file_format` is unwrapped. Any other body is
/// itself the data, with `filename` read from it if present.
pub fn split_shorthand(body: Value) -> (Value, Option<String>) {
    let filename = body
        .get("filename")
        .and_then(Value::as_str)
        .map(String::from);

    match body {
        Value::Object(mut map) if map.contains_key("data") && !map.contains_key("file_format") => {
            let data = map.remove("data").unwrap_or(Value::Null);
            (data, filename)
        }
        other => (other, filename),
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Export Service",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    )
)]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(ServiceInfo {
        message: "VALERA Export Service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        docs: "/swagger-ui/".to_string(),
        health: "/api/v1/health".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Export Service",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Local::now().to_rfc3339(),
        supported_formats: ExportFormat::ALL.to_vec(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/formats",
    tag = "Export Service",
    responses(
        (status = 200, description = "Supported output formats", body = FormatsResponse)
    )
)]
pub async fn formats() -> impl Responder {
    let supported_formats = ExportFormat::ALL
        .iter()
        .map(|format| FormatInfo {
            format: *format,
            content_type: format.content_type().to_string(),
            extension: format.extension().to_string(),
        })
        .collect();
    HttpResponse::Ok().json(FormatsResponse { supported_formats })
}

#[utoipa::path(
    get,
    path = "/api/v1/examples",
    tag = "Export Service",
    responses(
        (status = 200, description = "Sample export request bodies and document shapes")
    )
)]
pub async fn examples() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "simple_table": {
            "title": "Simple table example",
            "headers": ["Product", "Quantity", "Price"],
            "rows": [
                ["Laptop", 10, 1200.0],
                ["Mouse", 50, 25.0],
                ["Keyboard", 30, 45.0]
            ]
        },
        "document_with_content": {
            "title": "Sample document",
            "content": [
                "This is the first paragraph of the document.",
                "Additional information goes in the second paragraph."
            ],
            "tables": [
                {
                    "title": "Sample data",
                    "headers": ["Column 1", "Column 2"],
                    "rows": [["Value 1", "Value 2"], ["Value 3", "Value 4"]]
                }
            ]
        },
        "multiple_tables": {
            "tables": [
                {
                    "title": "Q1 Sales",
                    "headers": ["Month", "Sales"],
                    "rows": [["January", 1000], ["February", 1200], ["March", 1100]]
                },
                {
                    "title": "Q2 Sales",
                    "headers": ["Month", "Sales"],
                    "rows": [["April", 1300], ["May", 1400], ["June", 1250]]
                }
            ]
        },
        "lora_report": {
            "file_format": "pdf",
            "filename": "lora_report_example",
            "data": sample_report(),
        },
        "lora_report_list": {
            "file_format": "xlsx",
            "filename": "lora_reports_example",
            "data": [sample_report()],
        }
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/export",
    tag = "Export Service",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Rendered file as attachment"),
        (status = 400, description = "Unsupported format or invalid data", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn export(
    state: web::Data<AppState>,
    body: web::Json<ExportRequest>,
) -> Result<HttpResponse, ExportError> {
    let request = body.into_inner();
    let format: ExportFormat = request
        .file_format
        .parse()
        .map_err(|_| ExportError::UnsupportedFormat(request.file_format.clone()))?;

    log::info!(
        "Export requested: format={}, records={}",
        format,
        record_count(&request.data)
    );
    let kind = RendererKind::for_format(format, &request.data);
    let file = state
        .exporter
        .export_blocking(kind, request.data, request.filename)
        .await?;
    Ok(file.into_response())
}

async fn export_shorthand(
    state: web::Data<AppState>,
    format: ExportFormat,
    body: Value,
) -> Result<HttpResponse, ExportError> {
    let (data, filename) = split_shorthand(body);
    log::info!(
        "Export requested: format={}, records={}",
        format,
        record_count(&data)
    );
    let kind = RendererKind::for_format(format, &data);
    let file = state.exporter.export_blocking(kind, data, filename).await?;
    Ok(file.into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/export/pdf",
    tag = "Export Service",
    request_body = ShorthandExportRequest,
    responses(
        (status = 200, description = "PDF attachment"),
        (status = 400, description = "Invalid data", body = ErrorResponse)
    )
)]
pub async fn export_pdf(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ExportError> {
    export_shorthand(state, ExportFormat::Pdf, body.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/export/docx",
    tag = "Export Service",
    request_body = ShorthandExportRequest,
    responses(
        (status = 200, description = "DOCX attachment"),
        (status = 400, description = "Invalid data", body = ErrorResponse)
    )
)]
pub async fn export_docx(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ExportError> {
    export_shorthand(state, ExportFormat::Docx, body.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/export/xlsx",
    tag = "Export Service",
    request_body = ShorthandExportRequest,
    responses(
        (status = 200, description = "XLSX attachment"),
        (status = 400, description = "Invalid data", body = ErrorResponse)
    )
)]
pub async fn export_xlsx(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ExportError> {
    export_shorthand(state, ExportFormat::Xlsx, body.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/test/{format}",
    tag = "Export Service",
    params(
        ("format" = String, Path, description = "pdf, docx or xlsx")
    ),
    responses(
        (status = 200, description = "Fixture document as attachment"),
        (status = 400, description = "Unsupported format", body = ErrorResponse)
    )
)]
pub async fn test_export(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ExportError> {
    let requested = path.into_inner();
    let format: ExportFormat = requested
        .parse()
        .map_err(|_| ExportError::UnsupportedFormat(requested.clone()))?;

    log::info!("Fixture export requested: format={}", format);
    let data = fixture_document(format);
    let kind = RendererKind::for_format(format, &data);
    let file = state
        .exporter
        .export_blocking(kind, data, Some(format!("test_{}", format)))
        .await?;
    Ok(file.into_response())
}

/// Small document exercising paragraphs and a typed table.
pub fn fixture_document(format: ExportFormat) -> Value {
    json!({
        "title": format!("Test document - {}", format.as_str().to_uppercase()),
        "content": [
            "This is a test document generated automatically.",
            "It holds sample data to check that rendering works."
        ],
        "tables": [
            {
                "title": "Test data",
                "headers": ["ID", "Product", "Quantity", "Price"],
                "rows": [
                    [1, "Laptop", 5, 1200.0],
                    [2, "Mouse", 10, 25.0],
                    [3, "Keyboard", 8, 45.0],
                    [4, "Monitor", 3, 300.0]
                ]
            }
        ]
    })
}

pub(crate) fn record_count(data: &Value) -> usize {
    match data {
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

/// A complete LORA report as returned by the single-report endpoint.
pub fn sample_report() -> Value {
    json!({
        "id": 101,
        "userId": 7,
        "user": {
            "documentId": "1032456789",
            "userInformation": { "name": "Laura", "lastName": "Gomez" }
        },
        "externalNameUser": null,
        "externalOrganization": null,
        "reportTitle": "Gas leak near pump station 3",
        "conversation": "Operator reported smell of gas during the morning round.",
        "base": "North base",
        "createdAt": "2024-03-01T08:15:00Z",
        "updatedAt": "2024-03-02T10:00:00Z",
        "unity": "Drilling",
        "rig": "RIG-12",
        "project": "Alpha",
        "field": "Castilla",
        "reportType": "Unsafe condition",
        "hazardClassification": "High",
        "hazardType": "Chemical",
        "detailedDescription": "A continuous gas leak was detected at the flange of pump 3.",
        "findingCause": "Worn flange gasket",
        "evidence": ["photo_pump3_flange.jpg", "gas_meter_reading.png"],
        "actions": [
            {
                "description": "Replace the flange gasket",
                "responsible": "Maintenance crew",
                "dueDate": "2024-03-05",
                "status": "close"
            },
            {
                "description": "Schedule a weekly leak inspection",
                "responsible": "HSE supervisor",
                "dueDate": "2024-03-15",
                "status": "open"
            }
        ],
        "reportStatus": "open",
        "loraReportCode": "LORA-2024-0101",
        "createdBy": "lgomez"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand_body_is_unwrapped() {
        let (data, filename) = split_shorthand(json!({ "data": { "id": 1 }, "filename": "report" }));
        assert_eq!(data, json!({ "id": 1 }));
        assert_eq!(filename.as_deref(), Some("report"));
    }

    #[test]
    fn test_raw_body_is_the_data() {
        let body = json!({ "id": 1, "reportTitle": "Spill" });
        let (data, filename) = split_shorthand(body.clone());
        assert_eq!(data, body);
        assert_eq!(filename, None);
    }

    #[test]
    fn test_full_request_shape_is_not_unwrapped() {
        let body = json!({ "file_format": "pdf", "data": { "id": 1 }, "filename": "x" });
        let (data, filename) = split_shorthand(body.clone());
        assert_eq!(data, body);
        assert_eq!(filename.as_deref(), Some("x"));
    }

    #[test]
    fn test_record_count() {
        assert_eq!(record_count(&json!([1, 2, 3])), 3);
        assert_eq!(record_count(&json!({})), 1);
    }
}
