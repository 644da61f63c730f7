use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use atlas_ledger::config::{Config, DatabaseConfig};
use atlas_ledger::middleware::{verify_api_key, ApiKeyAuth, RequestId};
use atlas_ledger::modules::assistant::{self, AssistantService, ChatCompletionsClient};
use atlas_ledger::modules::catalogs::{self, CatalogService, MySqlCatalogRepository};
use atlas_ledger::modules::closings::{self, ClosingService, MySqlClosingRepository};
use atlas_ledger::modules::health;
use atlas_ledger::modules::ledger::{self, LedgerService, MySqlLedgerRepository};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config);

    config.validate().context("Configuration validation failed")?;
    verify_api_key("", &config.security.api_key_hash)
        .context("API_KEY_HASH is not a valid Argon2 hash")?;

    tracing::info!(
        env = %config.app.env,
        bind = %config.server.bind_address(),
        "Starting Atlas Ledger"
    );

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;
    DatabaseConfig::run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    let catalog_service = Arc::new(CatalogService::new(Arc::new(MySqlCatalogRepository::new(
        db_pool.clone(),
    ))));
    let closing_service = Arc::new(ClosingService::new(Arc::new(MySqlClosingRepository::new(
        db_pool.clone(),
    ))));
    let ledger_service = Arc::new(LedgerService::new(Arc::new(MySqlLedgerRepository::new(
        db_pool.clone(),
    ))));
    let extraction = Arc::new(ChatCompletionsClient::new(&config.extraction));
    let assistant_service = Arc::new(AssistantService::new(
        extraction,
        catalog_service.clone(),
        closing_service.clone(),
        ledger_service.clone(),
    ));

    let bind_address = config.server.bind_address();
    let api_key_hash = config.security.api_key_hash.clone();
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(ApiKeyAuth::new(api_key_hash.clone()))
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(catalog_service.clone()))
            .app_data(web::Data::new(closing_service.clone()))
            .app_data(web::Data::new(ledger_service.clone()))
            .app_data(web::Data::new(assistant_service.clone()))
            .route("/", web::get().to(index))
            .configure(health::controllers::configure)
            .configure(assistant::controllers::configure)
            .configure(catalogs::controllers::configure)
            .configure(closings::controllers::configure)
            .configure(ledger::controllers::configure)
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("Server error")
}

/// JSON logs in production, human-readable otherwise; `RUST_LOG` wins over
/// `LOG_LEVEL`
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "atlas_ledger={level},actix_web={level}",
            level = config.app.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.app.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "Atlas Ledger",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
