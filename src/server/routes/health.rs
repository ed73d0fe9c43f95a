//! Health status and metrics endpoints

use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::debug;

/// Configure the health routes, serving the status at `path`
pub fn configure_routes(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.route(path, web::get().to(health_status))
        .route("/metrics", web::get().to(metrics));
}

/// Aggregate health status
///
/// 200 when healthy, 500 otherwise; the body is the plain-text rendering of
/// the status computed with the configured suppression filter.
pub async fn health_status(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health status requested");

    let status = state.aggregator.check_with(state.filter.as_ref()).await?;
    let mut response = if status.is_healthy() {
        HttpResponse::Ok()
    } else {
        HttpResponse::InternalServerError()
    };

    Ok(response
        .content_type("text/plain; charset=utf-8")
        .body(status.to_string()))
}

/// Metrics endpoint (Prometheus format)
async fn metrics(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Metrics requested");

    let body = state.metrics.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4; charset=utf-8")
        .body(body))
}
