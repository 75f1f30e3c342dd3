use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use actix_middleware::{JwtAuthMiddleware, UserId};

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::auth::{self as auth_service, Registration};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub confirm_password: String,

    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 16))]
    pub used_ref_code: Option<String>,
}

impl RegisterRequest {
    fn check(&self) -> Result<()> {
        self.validate()?;
        if self.password != self.confirm_password {
            return Err(AppError::Validation("Passwords don't match".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub balance: Decimal,
    pub referral_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl UserSummary {
    fn basic(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            balance: user.balance,
            referral_code: user.referral_code.clone(),
            commission: None,
            is_admin: None,
        }
    }

    fn with_role(user: &User) -> Self {
        Self {
            is_admin: Some(user.is_admin),
            ..Self::basic(user)
        }
    }

    fn full(user: &User) -> Self {
        Self {
            commission: Some(user.commission),
            ..Self::with_role(user)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserSummary,
}

pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let request = payload.into_inner();
    request.check()?;

    let registration = Registration {
        username: request.username.trim().to_string(),
        password: request.password,
        phone: request
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        used_ref_code: request
            .used_ref_code
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty()),
    };
    if registration.username.is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }

    let user = auth_service::register(&state.db, registration, state.betting.referral_bonus).await?;
    let token = auth_service::issue_token(&user)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User created successfully",
        token,
        user: UserSummary::basic(&user),
    }))
}

pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;

    let user = auth_service::login(&state.db, &payload.username, &payload.password).await?;
    let token = auth_service::issue_token(&user)?;

    tracing::info!(user_id = %user.id, "login succeeded");

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful",
        token,
        user: UserSummary::with_role(&user),
    }))
}

pub async fn me(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = user_repo::find_by_id(&state.db, user_id.0)
        .await?
        .ok_or_else(|| AppError::Authentication("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "user": UserSummary::full(&user) })))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .service(
                web::resource("/me")
                    .wrap(JwtAuthMiddleware)
                    .route(web::get().to(me)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            phone: None,
            used_ref_code: None,
        }
    }

    #[test]
    fn test_register_request_checks() {
        assert!(request("secret1", "secret1").check().is_ok());
        assert!(request("short", "short").check().is_err());

        let err = request("secret1", "secret2").check().unwrap_err();
        assert_eq!(err.to_string(), "Passwords don't match");
    }

    #[test]
    fn test_username_length() {
        let mut req = request("secret1", "secret1");
        req.username = "a".repeat(51);
        assert!(req.check().is_err());
        req.username = String::new();
        assert!(req.check().is_err());
    }

    #[test]
    fn test_summary_shapes() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            phone: None,
            balance: Decimal::new(1000, 2),
            referral_code: "SMABC123".to_string(),
            used_ref_code: None,
            commission: Decimal::ZERO,
            is_admin: false,
            created_at: chrono::Utc::now(),
        };

        let basic = serde_json::to_value(UserSummary::basic(&user)).unwrap();
        assert_eq!(basic["referralCode"], "SMABC123");
        assert_eq!(basic["balance"], "10.00");
        assert!(basic.get("isAdmin").is_none());

        let full = serde_json::to_value(UserSummary::full(&user)).unwrap();
        assert_eq!(full["isAdmin"], false);
        assert_eq!(full["commission"], "0");
        assert!(full.get("passwordHash").is_none());
    }
}
