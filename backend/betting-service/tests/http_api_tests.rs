//! HTTP surface tests that never reach PostgreSQL: authentication, request
//! validation and error body shape.

mod common;

use actix_middleware::CorrelationIdMiddleware;
use actix_web::{http::StatusCode, test, web, App};
use betting_service::handlers;
use serde_json::{json, Value};
use uuid::Uuid;

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(common::unreachable_state()))
                .wrap(CorrelationIdMiddleware)
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_register_rejects_mismatched_passwords() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "alice",
            "password": "secret1",
            "confirmPassword": "secret2"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Passwords don't match");
}

#[actix_web::test]
async fn test_register_rejects_short_password() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "alice",
            "password": "12345",
            "confirmPassword": "12345"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_json_uses_error_body() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_bets_require_token() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/bets").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "AUTHENTICATION_ERROR");
}

#[actix_web::test]
async fn test_garbage_token_rejected() {
    common::init_jwt();
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_admin_scope_requires_token() {
    let app = test_app!();

    for (method, uri) in [
        ("POST", "/api/admin/results"),
        ("GET", "/api/admin/transactions/pending"),
        ("GET", "/api/admin/stats"),
        ("GET", "/api/admin/payment-methods"),
    ] {
        let req = match method {
            "POST" => test::TestRequest::post()
                .uri(uri)
                .set_json(json!({ "result2d": "42" })),
            _ => test::TestRequest::get().uri(uri),
        }
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[actix_web::test]
async fn test_invalid_bet_number_rejected_before_storage() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/bets")
        .insert_header(("Authorization", common::bearer(Uuid::new_v4())))
        .set_json(json!({ "type": "2D", "number": "123", "amount": "10.00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid 2D number format");
}

#[actix_web::test]
async fn test_unknown_bet_type_rejected() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/bets")
        .insert_header(("Authorization", common::bearer(Uuid::new_v4())))
        .set_json(json!({ "type": "4D", "number": "1234", "amount": 10 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_non_positive_amount_rejected() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/bets")
        .insert_header(("Authorization", common::bearer(Uuid::new_v4())))
        .set_json(json!({ "type": "3D", "number": "123", "amount": "0" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_result_date_must_parse() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/results/not-a-date")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_health_reports_unavailable_database() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "unhealthy");
}

#[actix_web::test]
async fn test_correlation_id_echoed() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/bets")
        .insert_header(("x-correlation-id", "trace-abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(
        resp.headers().get("x-correlation-id").unwrap(),
        "trace-abc-123"
    );
}
