use actix_web::{web, HttpResponse};

use super::handlers;
use super::error::{ApiError, ApiResult};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Malformed bodies answer with the same JSON shape as other errors
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into())
        )

        // Health checks
        .route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics_endpoint))

        // API v1
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/showtimes")
                        .route("/render", web::post().to(handlers::render_report))
                        .route("/email", web::post().to(handlers::compose_email))
                )
        );
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    }))
}

async fn metrics_endpoint() -> ApiResult<HttpResponse> {
    let body = crate::metrics::gather_text()?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}
