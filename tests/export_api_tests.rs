//! HTTP tests for the generic export endpoints.

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use serde_json::{json, Value};

use common::{app_state, MockReportSource};
use valera_export_service::configure;
use valera_export_service::export::handlers::sample_report;

fn disposition(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_health_reports_formats() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["supported_formats"], json!(["pdf", "docx", "xlsx"]));
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_formats_lists_content_types() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/formats").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let formats = body["supported_formats"].as_array().unwrap();
    assert_eq!(formats.len(), 3);
    assert_eq!(formats[0]["format"], "pdf");
    assert_eq!(formats[0]["content_type"], "application/pdf");
    assert_eq!(formats[2]["extension"], ".xlsx");
}

#[actix_web::test]
async fn test_root_and_examples() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "running");
    assert_eq!(body["health"], "/api/v1/health");

    let req = test::TestRequest::get().uri("/api/v1/examples").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["lora_report"]["data"]["id"], 101);
}

#[actix_web::test]
async fn test_export_pdf_attachment() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export")
        .set_json(json!({ "file_format": "pdf", "data": sample_report(), "filename": "incident" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
    assert_eq!(disposition(&resp), "attachment; filename=incident.pdf");
    assert!(resp.headers().contains_key("x-file-size-mb"));

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF"));
}

#[actix_web::test]
async fn test_export_xlsx_list_uses_list_workbook() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export")
        .set_json(json!({ "file_format": "xlsx", "data": [sample_report(), sample_report()] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(disposition(&resp).ends_with(".xlsx"));
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"PK"));
}

#[actix_web::test]
async fn test_unsupported_format_is_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export")
        .set_json(json!({ "file_format": "csv", "data": { "id": 1 } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
    assert_eq!(body["status_code"], 400);
    assert!(body["message"].as_str().unwrap().contains("csv"));
}

#[actix_web::test]
async fn test_unsafe_filename_is_replaced() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export")
        .set_json(json!({ "file_format": "docx", "data": sample_report(), "filename": "../../etc/passwd" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = disposition(&resp);
    assert!(disposition.starts_with("attachment; filename=export_"));
    assert!(disposition.ends_with(".docx"));
}

#[actix_web::test]
async fn test_shorthand_body_is_unwrapped() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export/docx")
        .set_json(json!({ "data": sample_report(), "filename": "spill" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(disposition(&resp), "attachment; filename=spill.docx");
}

#[actix_web::test]
async fn test_raw_record_body_is_accepted() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export/xlsx")
        .set_json(sample_report())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"PK"));
}

#[actix_web::test]
async fn test_docx_of_list_is_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export/docx")
        .set_json(json!({ "data": [sample_report()] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_json_uses_error_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export/pdf")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 400);
}

#[actix_web::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NotFound");
}

#[actix_web::test]
async fn test_examples_include_document_shapes() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/examples").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["simple_table"]["headers"], json!(["Product", "Quantity", "Price"]));
    assert_eq!(body["document_with_content"]["content"].as_array().unwrap().len(), 2);
    assert_eq!(body["multiple_tables"]["tables"].as_array().unwrap().len(), 2);

    for shape in ["simple_table", "document_with_content", "multiple_tables"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/export")
            .set_json(json!({ "file_format": "xlsx", "data": body[shape].clone() }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "shape {}", shape);
    }
}

#[actix_web::test]
async fn test_document_with_tables_exports_in_every_format() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let document = json!({
        "title": "Quarterly sales",
        "summary": "Sales rose in every month.",
        "tables": [
            { "title": "Q1", "headers": ["Month", "Sales"], "rows": [["Jan", 1000], ["Feb", 1200]] }
        ]
    });

    for (format, magic) in [("pdf", &b"%PDF"[..]), ("docx", &b"PK"[..]), ("xlsx", &b"PK"[..])] {
        let req = test::TestRequest::post()
            .uri("/api/v1/export")
            .set_json(json!({ "file_format": format, "data": document, "filename": "sales" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(disposition(&resp), format!("attachment; filename=sales.{}", format));
        let body = test::read_body(resp).await;
        assert!(body.starts_with(magic));
    }
}

#[actix_web::test]
async fn test_plain_text_data_exports_as_document() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export")
        .set_json(json!({ "file_format": "docx", "data": "Just a note" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_fixture_export_per_format() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/v1/test/pdf").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(disposition(&resp), "attachment; filename=test_pdf.pdf");
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF"));

    let req = test::TestRequest::post().uri("/api/v1/test/xlsx").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(disposition(&resp), "attachment; filename=test_xlsx.xlsx");

    let req = test::TestRequest::post().uri("/api/v1/test/csv").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_oversized_xlsx_cells_are_truncated() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(MockReportSource::new(vec![])))
            .configure(configure),
    )
    .await;

    let mut report = sample_report();
    report["conversation"] = json!("x".repeat(40_000));
    report["detailedDescription"] = json!("y".repeat(40_000));

    let req = test::TestRequest::post()
        .uri("/api/v1/export")
        .set_json(json!({ "file_format": "xlsx", "data": report }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/export")
        .set_json(json!({ "file_format": "xlsx", "data": [report] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
