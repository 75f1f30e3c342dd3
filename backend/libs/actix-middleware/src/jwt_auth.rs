use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde_json::json;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// User ID extracted from a validated JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// 401 response produced when a request carries no usable bearer token
#[derive(Debug)]
pub struct AuthRejection {
    message: &'static str,
}

impl AuthRejection {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl ResponseError for AuthRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized().json(json!({
            "error": "AUTHENTICATION_ERROR",
            "message": self.message,
        }))
    }
}

/// JWT Authentication Middleware
///
/// Validates `Authorization: Bearer <token>` with `crypto_core::jwt` and
/// stores the subject as [`UserId`] in the request extensions. Rejections are
/// returned as regular 401 responses so outer middleware still sees them.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Headers are read into an owned value before extensions_mut() borrows the request
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            match authenticate(auth_header) {
                Ok(user_id) => {
                    req.extensions_mut().insert(user_id);
                    service.call(req).await.map(|res| res.map_into_left_body())
                }
                Err(rejection) => {
                    let response = rejection.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

fn authenticate(auth_header: Option<String>) -> Result<UserId, AuthRejection> {
    let auth_header =
        auth_header.ok_or_else(|| AuthRejection::new("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthRejection::new("Invalid Authorization scheme, expected Bearer"))?;

    let token_data = crypto_core::jwt::validate_token(token).map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        AuthRejection::new("Invalid or expired token")
    })?;

    Uuid::parse_str(&token_data.claims.sub)
        .map(UserId)
        .map_err(|_| AuthRejection::new("Invalid user ID in token"))
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<UserId>().copied() {
            Some(user_id) => ready(Ok(user_id)),
            None => ready(Err(AuthRejection::new("User not authenticated").into())),
        }
    }
}
