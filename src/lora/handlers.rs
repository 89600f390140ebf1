use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::error::{ErrorResponse, ExportError};
use crate::export::RendererKind;
use crate::lora::ReportFilter;
use crate::AppState;

async fn export_list(
    state: &web::Data<AppState>,
    kind: RendererKind,
    reports: Vec<Value>,
    filename: String,
) -> Result<HttpResponse, ExportError> {
    if reports.is_empty() {
        return Err(ExportError::Validation(
            "no reports available to export".to_string(),
        ));
    }
    log::info!("Exporting {} LORA report(s) as {}", reports.len(), kind.name());
    let file = state
        .exporter
        .export_blocking(kind, Value::Array(reports), Some(filename))
        .await?;
    Ok(file.into_response())
}

/// User ids are forwarded upstream; only `[A-Za-z0-9_-]` is accepted.
fn checked_user_id(user_id: String) -> Result<String, ExportError> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(user_id)
    } else {
        Err(ExportError::Validation(format!("invalid user id: {:?}", user_id)))
    }
}

async fn export_single(
    state: &web::Data<AppState>,
    kind: RendererKind,
    id: u64,
) -> Result<HttpResponse, ExportError> {
    let report = state.reports.fetch_by_id(id).await?;
    log::info!("Exporting LORA report {} as {}", id, kind.name());
    let file = state
        .exporter
        .export_blocking(kind, report, Some(format!("lora_report_{}", id)))
        .await?;
    Ok(file.into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/lora/pdf_all_reports",
    tag = "LORA Reports",
    responses(
        (status = 200, description = "PDF with every report"),
        (status = 400, description = "No reports available", body = ErrorResponse),
        (status = 502, description = "VALERA API unavailable", body = ErrorResponse)
    )
)]
pub async fn pdf_all_reports(state: web::Data<AppState>) -> Result<HttpResponse, ExportError> {
    let reports = state.reports.fetch_all().await?;
    export_list(&state, RendererKind::Pdf, reports, "lora_reports".to_string()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/lora/pdf_all_reports/user/{user_id}",
    tag = "LORA Reports",
    params(
        ("user_id" = String, Path, description = "Owner of the reports")
    ),
    responses(
        (status = 200, description = "PDF with the user's reports"),
        (status = 400, description = "Invalid user id or no reports available", body = ErrorResponse),
        (status = 502, description = "VALERA API unavailable", body = ErrorResponse)
    )
)]
pub async fn pdf_user_reports(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ExportError> {
    let user_id = checked_user_id(user_id.into_inner())?;
    let reports = state.reports.fetch_by_user(&user_id).await?;
    export_list(
        &state,
        RendererKind::Pdf,
        reports,
        format!("lora_reports_user_{}", user_id),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/v1/lora/xlsx_all_reports",
    tag = "LORA Reports",
    responses(
        (status = 200, description = "Workbook with one row per report"),
        (status = 400, description = "No reports available", body = ErrorResponse),
        (status = 502, description = "VALERA API unavailable", body = ErrorResponse)
    )
)]
pub async fn xlsx_all_reports(state: web::Data<AppState>) -> Result<HttpResponse, ExportError> {
    let reports = state.reports.fetch_all().await?;
    export_list(&state, RendererKind::XlsxList, reports, "lora_reports".to_string()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/lora/xlsx_all_reports/user/{user_id}",
    tag = "LORA Reports",
    params(
        ("user_id" = String, Path, description = "Owner of the reports")
    ),
    responses(
        (status = 200, description = "Workbook with the user's reports"),
        (status = 400, description = "Invalid user id or no reports available", body = ErrorResponse),
        (status = 502, description = "VALERA API unavailable", body = ErrorResponse)
    )
)]
pub async fn xlsx_user_reports(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ExportError> {
    let user_id = checked_user_id(user_id.into_inner())?;
    let reports = state.reports.fetch_by_user(&user_id).await?;
    export_list(
        &state,
        RendererKind::XlsxList,
        reports,
        format!("lora_reports_user_{}", user_id),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/v1/lora/xlsx_all_reports/filter",
    tag = "LORA Reports",
    params(ReportFilter),
    responses(
        (status = 200, description = "Workbook with the matching reports"),
        (status = 400, description = "No reports matched", body = ErrorResponse),
        (status = 502, description = "VALERA API unavailable", body = ErrorResponse)
    )
)]
pub async fn xlsx_filtered_reports(
    state: web::Data<AppState>,
    filter: web::Query<ReportFilter>,
) -> Result<HttpResponse, ExportError> {
    let reports = state.reports.fetch_filtered(&filter).await?;
    export_list(
        &state,
        RendererKind::XlsxList,
        reports,
        "lora_reports_filtered".to_string(),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/v1/lora/docx/{id}",
    tag = "LORA Reports",
    params(("id" = u64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "DOCX of the report"),
        (status = 502, description = "VALERA API unavailable", body = ErrorResponse)
    )
)]
pub async fn docx_report(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> Result<HttpResponse, ExportError> {
    export_single(&state, RendererKind::Docx, id.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/lora/xlsx/{id}",
    tag = "LORA Reports",
    params(("id" = u64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Workbook of the report"),
        (status = 502, description = "VALERA API unavailable", body = ErrorResponse)
    )
)]
pub async fn xlsx_report(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> Result<HttpResponse, ExportError> {
    export_single(&state, RendererKind::Xlsx, id.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/lora/pdf_simple/{id}",
    tag = "LORA Reports",
    params(("id" = u64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Plain PDF of the report"),
        (status = 502, description = "VALERA API unavailable", body = ErrorResponse)
    )
)]
pub async fn pdf_simple_report(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> Result<HttpResponse, ExportError> {
    export_single(&state, RendererKind::Pdf, id.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/lora/pdf_styled/{id}",
    tag = "LORA Reports",
    params(("id" = u64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Styled PDF of the report"),
        (status = 502, description = "VALERA API unavailable", body = ErrorResponse)
    )
)]
pub async fn pdf_styled_report(
    state: web::Data<AppState>,
    id: web::Path<u64>,
) -> Result<HttpResponse, ExportError> {
    export_single(&state, RendererKind::PdfStyled, id.into_inner()).await
}

/// Register the `/lora` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lora")
            .route("/pdf_all_reports", web::get().to(pdf_all_reports))
            .route("/pdf_all_reports/user/{user_id}", web::get().to(pdf_user_reports))
            .route("/xlsx_all_reports", web::get().to(xlsx_all_reports))
            .route("/xlsx_all_reports/filter", web::get().to(xlsx_filtered_reports))
            .route("/xlsx_all_reports/user/{user_id}", web::get().to(xlsx_user_reports))
            .route("/docx/{id}", web::get().to(docx_report))
            .route("/xlsx/{id}", web::get().to(xlsx_report))
            .route("/pdf_simple/{id}", web::get().to(pdf_simple_report))
            .route("/pdf_styled/{id}", web::get().to(pdf_styled_report)),
    );
}
