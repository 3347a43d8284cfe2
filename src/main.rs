use actix_web::middleware::{NormalizePath, from_fn};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod report;
mod routes;
mod utils;

use config::Config;
use db::{init_db, seed_admin};

use crate::auth::middleware::session_middleware;
use crate::docs::ApiDoc;
use crate::routes::RateLimits;
use crate::utils::mailer::{LogNotifier, Notifier};
use tracing::{info, warn};
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("failed to open database")?;

    match &config.admin {
        Some(seed) => {
            if seed_admin(&pool, seed).await.context("failed to seed admin")? {
                info!(email = %seed.email, "Admin account bootstrapped");
            }
        }
        None => warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set; no admin bootstrap"),
    }

    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("cannot create {}", config.upload_dir.display()))?;

    let limits = RateLimits::from_config(&config)?;
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier::new(config.mail_sender.clone()));
    let notifier = Data::from(notifier);

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        let limits = limits.clone();
        App::new()
            .wrap(from_fn(session_middleware))
            .wrap(NormalizePath::trim())
            .wrap(actix_web::middleware::Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(notifier.clone())
            .configure(|cfg| routes::configure(cfg, limits))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
