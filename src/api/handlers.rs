use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::models::Report;
use super::state::ApiState;
use super::error::ApiResult;

/// Render a report into the showtimes HTML layout
pub async fn render_report(
    data: web::Json<Value>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let report = Report::from_value(&data)?;
    let html = state.renderer.render(&report)?;

    tracing::info!(movies = report.movie_details.len(), "Rendered showtimes preview");

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Compose the notification email for a report, without sending it
pub async fn compose_email(
    data: web::Json<Value>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let report = Report::from_value(&data)?;

    match state.composer.compose_if_any(&report)? {
        Some(email) => {
            tracing::info!(
                recipients = email.to.len(),
                subject = %email.subject,
                "Composed showtimes notification"
            );
            Ok(HttpResponse::Ok().json(email))
        }
        None => Ok(HttpResponse::NoContent().finish()),
    }
}
