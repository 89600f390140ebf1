use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod export;
pub mod lora;
pub mod record;
pub mod render;
pub mod state;

pub use crate::config::ServiceConfig;
pub use crate::error::{ErrorResponse, ExportError};
pub use crate::state::AppState;

const JSON_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::export::handlers::root,
        crate::export::handlers::health,
        crate::export::handlers::formats,
        crate::export::handlers::examples,
        crate::export::handlers::export,
        crate::export::handlers::export_pdf,
        crate::export::handlers::export_docx,
        crate::export::handlers::export_xlsx,
        crate::export::handlers::test_export,
        crate::lora::handlers::pdf_all_reports,
        crate::lora::handlers::pdf_user_reports,
        crate::lora::handlers::xlsx_all_reports,
        crate::lora::handlers::xlsx_user_reports,
        crate::lora::handlers::xlsx_filtered_reports,
        crate::lora::handlers::docx_report,
        crate::lora::handlers::xlsx_report,
        crate::lora::handlers::pdf_simple_report,
        crate::lora::handlers::pdf_styled_report
    ),
    components(
        schemas(
            export::handlers::ServiceInfo,
            export::handlers::HealthResponse,
            export::handlers::FormatInfo,
            export::handlers::FormatsResponse,
            export::handlers::ExportRequest,
            export::handlers::ShorthandExportRequest,
            lora::ReportFilter,
            render::ExportFormat,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Export Service", description = "Render caller-supplied data to PDF, DOCX or XLSX."),
        (name = "LORA Reports", description = "Fetch LORA reports from the VALERA API and export them.")
    )
)]
pub struct ApiDoc;

/// Every route of the service except docs and metrics.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(error::json_error_handler),
    )
    .route("/", web::get().to(export::handlers::root))
    .service(
        web::scope("/api/v1")
            .route("/health", web::get().to(export::handlers::health))
            .route("/formats", web::get().to(export::handlers::formats))
            .route("/examples", web::get().to(export::handlers::examples))
            .route("/export", web::post().to(export::handlers::export))
            .route("/export/pdf", web::post().to(export::handlers::export_pdf))
            .route("/export/docx", web::post().to(export::handlers::export_docx))
            .route("/export/xlsx", web::post().to(export::handlers::export_xlsx))
            .route("/test/{format}", web::post().to(export::handlers::test_export))
            .configure(lora::handlers::config),
    )
    .default_service(web::to(error::not_found));
}

fn cors(origins: &[String]) -> Cors {
    let cors = if origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![
            header::CONTENT_DISPOSITION,
            header::HeaderName::from_static("x-file-size-mb"),
        ])
        .max_age(3600)
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let app_state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to build the VALERA API client: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("valera_export_service")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!(
        "Starting export service at http://{}:{} (VALERA API: {})",
        config.host,
        config.port,
        config.valera_api
    );

    let origins = config.cors_allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors(&origins))
            .app_data(app_state.clone())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
