use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::config::SERVICE_NAME;
use crate::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
}

/// Liveness plus a database round trip; 503 when the pool cannot serve a query
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database_ok = match db_pool::acquire_with_metrics(&state.db, SERVICE_NAME).await {
        Ok(mut conn) => sqlx::query("SELECT 1").execute(&mut *conn).await.is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "health check could not acquire a connection");
            false
        }
    };

    let body = HealthResponse {
        status: if database_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if database_ok { "healthy" } else { "unhealthy" },
    };

    if database_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(crate::metrics::serve_metrics));
}
