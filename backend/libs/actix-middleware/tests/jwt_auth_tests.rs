use actix_middleware::{CorrelationId, CorrelationIdMiddleware, JwtAuthMiddleware, UserId};
use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use std::sync::Once;
use uuid::Uuid;

static INIT: Once = Once::new();

fn init_jwt() {
    INIT.call_once(|| {
        crypto_core::jwt::initialize_jwt_secret("middleware-test-secret-0123456789", 900)
            .expect("JWT secret should initialize once");
    });
}

async fn whoami(user_id: UserId) -> HttpResponse {
    HttpResponse::Ok().body(user_id.0.to_string())
}

async fn correlation(id: CorrelationId) -> HttpResponse {
    HttpResponse::Ok().body(id.0)
}

#[actix_web::test]
async fn test_valid_token_reaches_handler() {
    init_jwt();
    let user_id = Uuid::new_v4();
    let token = crypto_core::jwt::generate_access_token(user_id, "alice").unwrap();

    let app = test::init_service(
        App::new().service(
            web::resource("/me")
                .wrap(JwtAuthMiddleware)
                .route(web::get().to(whoami)),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, user_id.to_string().as_bytes());
}

#[actix_web::test]
async fn test_missing_token_is_401_json() {
    init_jwt();
    let app = test::init_service(
        App::new().service(
            web::resource("/me")
                .wrap(JwtAuthMiddleware)
                .route(web::get().to(whoami)),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "AUTHENTICATION_ERROR");
    assert_eq!(body["message"], "Missing Authorization header");
}

#[actix_web::test]
async fn test_extractor_without_middleware_is_401() {
    let app = test::init_service(App::new().route("/me", web::get().to(whoami))).await;

    let req = test::TestRequest::get().uri("/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_rejection_still_gets_correlation_header() {
    init_jwt();
    let app = test::init_service(
        App::new().wrap(CorrelationIdMiddleware).service(
            web::resource("/me")
                .wrap(JwtAuthMiddleware)
                .route(web::get().to(whoami)),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("x-correlation-id"));
}

#[actix_web::test]
async fn test_correlation_id_available_to_handler() {
    let app = test::init_service(
        App::new()
            .wrap(CorrelationIdMiddleware)
            .route("/cid", web::get().to(correlation)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/cid")
        .insert_header(("x-correlation-id", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-correlation-id").unwrap(), "abc-123");
    let body = test::read_body(resp).await;
    assert_eq!(body, "abc-123".as_bytes());
}
