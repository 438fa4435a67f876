use actix_web::{web, App, HttpServer, middleware};
use anyhow::Result;
use showtimes_mailer::api::{ApiState, configure_routes};
use showtimes_mailer::core::AppConfig;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    tracing::info!("Starting showtimes mailer API");

    // Process metrics next to the render counters
    prometheus::default_registry()
        .register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

    let config = AppConfig::from_env()?;
    let host = config.host.clone();
    let port = config.port;

    let state = web::Data::new(ApiState::new(&config)?);

    tracing::info!("Starting server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
