pub mod admin;
pub mod auth;
pub mod bets;
pub mod health;
pub mod payment_methods;
pub mod results;
pub mod transactions;

use actix_web::{error::InternalError, web, HttpResponse, ResponseError};
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use uuid::Uuid;

use actix_middleware::UserId;

use crate::db::user_repo;
use crate::error::{AppError, Result};

/// Mount `/health`, `/metrics` and every `/api` route plus extractor error handling
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .configure(health::register_routes)
        .service(
            web::scope("/api")
                .configure(auth::register_routes)
                .configure(bets::register_routes)
                .configure(results::register_routes)
                .configure(transactions::register_routes)
                .configure(payment_methods::register_routes)
                .configure(admin::register_routes),
        );
}

fn rejection(message: String) -> actix_web::Error {
    let response = AppError::Validation(message.clone()).error_response();
    InternalError::from_response(message, response).into()
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| rejection(err.to_string()))
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| rejection(err.to_string()))
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| rejection(err.to_string()))
}

/// Resolve the caller to an admin ID or fail with 403
pub(crate) async fn require_admin(pool: &PgPool, user: UserId) -> Result<Uuid> {
    match user_repo::is_admin(pool, user.0).await? {
        Some(true) => Ok(user.0),
        Some(false) => {
            tracing::warn!(user_id = %user.0, "admin route denied");
            Err(AppError::Authorization("Admin access required".to_string()))
        }
        None => Err(AppError::Authentication("User not found".to_string())),
    }
}

/// Decode a JSON body read as raw bytes. Admin handlers take `web::Bytes` so
/// the admin check runs before the payload is looked at.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Json deserialize error: {e}")))
}

pub(crate) fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_parse_json_ok() {
        let sample: Sample = parse_json(br#"{"name":"kbz"}"#).unwrap();
        assert_eq!(sample.name, "kbz");
    }

    #[test]
    fn test_parse_json_maps_to_validation_error() {
        let err = parse_json::<Sample>(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.status_code(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
