use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{get, App, HttpServer, Responder};
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hrm_portal::auth::{AuthProvider, HostedAuthProvider, MockAuthProvider, SessionStore};
use hrm_portal::docs::ApiDoc;
use hrm_portal::gateway::{MemoryGateway, PostgrestGateway, TableGateway};
use hrm_portal::services::Services;
use hrm_portal::{routes, Config};

#[get("/")]
async fn index() -> impl Responder {
    "Employee Management API"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let (gateway, provider): (Arc<dyn TableGateway>, Arc<dyn AuthProvider>) = if config.demo_mode {
        info!("demo mode: in-memory backend, demo credentials enabled");
        (
            Arc::new(MemoryGateway::new()),
            Arc::new(MockAuthProvider::new()),
        )
    } else {
        let gateway = PostgrestGateway::new(&config.backend_url, &config.backend_api_key, timeout)
            .expect("could not build table gateway");
        let provider = HostedAuthProvider::new(&config.backend_url, &config.backend_api_key, timeout)
            .expect("could not build auth provider");
        (Arc::new(gateway), Arc::new(provider))
    };

    let services = Data::new(Services::new(gateway.clone()));
    let session_store = Data::new(SessionStore::new(
        provider,
        gateway,
        PathBuf::from(&config.session_file),
        config.demo_mode,
    ));

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(services.clone())
            .app_data(session_store.clone())
            .service(index)
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
