use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use actix_middleware::UserId;

use crate::db::{
    audit_repo,
    payment_method_repo::{self, PaymentMethodFields},
};
use crate::error::{AppError, Result};
use crate::handlers::{message, parse_json, require_admin};
use crate::models::AuditAction;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentMethodRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 32))]
    pub method_type: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 64))]
    pub account_number: Option<String>,

    #[validate(length(max = 100))]
    pub bank_name: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentMethodRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 32))]
    pub method_type: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 64))]
    pub account_number: Option<String>,

    #[validate(length(max = 100))]
    pub bank_name: Option<String>,

    pub is_active: Option<bool>,
}

impl From<UpdatePaymentMethodRequest> for PaymentMethodFields {
    fn from(req: UpdatePaymentMethodRequest) -> Self {
        Self {
            method_type: req.method_type,
            name: req.name,
            phone: req.phone,
            account_number: req.account_number,
            bank_name: req.bank_name,
            is_active: req.is_active,
        }
    }
}

/// Public: active methods shown on the deposit page
pub async fn list_active(state: web::Data<AppState>) -> Result<HttpResponse> {
    let methods = payment_method_repo::list_active(&state.db).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "paymentMethods": methods })))
}

pub async fn list_all(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    require_admin(&state.db, user_id).await?;

    let methods = payment_method_repo::list_all(&state.db).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "paymentMethods": methods })))
}

pub async fn create(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let admin_id = require_admin(&state.db, user_id).await?;
    let request: CreatePaymentMethodRequest = parse_json(&body)?;
    request.validate()?;

    let fields = PaymentMethodFields {
        phone: request.phone,
        account_number: request.account_number,
        bank_name: request.bank_name,
        is_active: request.is_active,
        ..PaymentMethodFields::default()
    };

    let mut tx = state.db.begin().await?;
    let method =
        payment_method_repo::create(&mut *tx, &request.method_type, &request.name, &fields).await?;
    audit_repo::record(
        &mut *tx,
        admin_id,
        AuditAction::PaymentMethodCreated,
        &format!("Created payment method {} ({})", method.id, method.name),
    )
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Payment method created successfully",
        "paymentMethod": method,
    })))
}

pub async fn update(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let admin_id = require_admin(&state.db, user_id).await?;
    let request: UpdatePaymentMethodRequest = parse_json(&body)?;
    request.validate()?;
    let id = path.into_inner();

    let mut tx = state.db.begin().await?;
    let method = payment_method_repo::update(&mut *tx, id, &request.into())
        .await?
        .ok_or_else(|| AppError::NotFound("Payment method not found".to_string()))?;
    audit_repo::record(
        &mut *tx,
        admin_id,
        AuditAction::PaymentMethodUpdated,
        &format!("Updated payment method {}", id),
    )
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Payment method updated successfully",
        "paymentMethod": method,
    })))
}

pub async fn delete(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let admin_id = require_admin(&state.db, user_id).await?;
    let id = path.into_inner();

    let mut tx = state.db.begin().await?;
    if !payment_method_repo::delete(&mut *tx, id).await? {
        return Err(AppError::NotFound("Payment method not found".to_string()));
    }
    audit_repo::record(
        &mut *tx,
        admin_id,
        AuditAction::PaymentMethodDeleted,
        &format!("Deleted payment method {}", id),
    )
    .await?;
    tx.commit().await?;

    Ok(message("Payment method deleted successfully"))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/payment-methods", web::get().to(list_active));
}

/// Mounted inside the authenticated `/admin` scope
pub fn register_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/payment-methods")
            .route(web::post().to(create))
            .route(web::get().to(list_all)),
    )
    .service(
        web::resource("/payment-methods/{id}")
            .route(web::patch().to(update))
            .route(web::delete().to(delete)),
    );
}
