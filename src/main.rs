use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lenta::cache::PageCache;
use lenta::media::MediaStorage;
use lenta::routes;
use lenta::Config;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            anyhow::bail!("failed to load configuration: {}", e);
        }
    };

    tracing::info!("Starting lenta v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    tracing::info!("Connected to database, schema up to date");

    let media = MediaStorage::new(&config.media.root);
    media
        .ensure_layout()
        .await
        .context("failed to prepare media storage")?;

    let page_cache = web::Data::new(PageCache::new(Duration::from_secs(
        config.cache.page_ttl_secs,
    )));
    let pool_data = web::Data::new(pool);
    let config_data = web::Data::new(config.clone());
    let media_data = web::Data::new(media);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .app_data(page_cache.clone())
            .app_data(media_data.clone())
            .app_data(routes::path_config())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure_routes)
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run()
    .await?;

    tracing::info!("lenta shutting down");
    Ok(())
}
