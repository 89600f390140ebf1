#[actix_web::main]
async fn main() -> std::io::Result<()> {
    valera_export_service::run().await
}
