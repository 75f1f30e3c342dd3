use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use actix_middleware::{JwtAuthMiddleware, UserId};

use crate::db::transaction_repo;
use crate::error::Result;
use crate::models::TransactionKind;
use crate::services::wallet::{self, WalletRequest};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    pub amount: Decimal,

    pub payment_method_id: Option<Uuid>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    /// Location of an already uploaded receipt image
    #[validate(length(max = 1024))]
    pub receipt_url: Option<String>,
}

pub async fn create_transaction(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: web::Json<CreateTransactionRequest>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let request = payload.into_inner();

    let transaction = wallet::request_transaction(
        &state.db,
        WalletRequest {
            user_id: user_id.0,
            kind: request.kind,
            amount: request.amount,
            payment_method_id: request.payment_method_id,
            description: request.description,
            receipt_url: request.receipt_url,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Transaction request created",
        "transaction": transaction,
    })))
}

pub async fn list_my_transactions(
    state: web::Data<AppState>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let transactions = transaction_repo::list_by_user(&state.db, user_id.0).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "transactions": transactions })))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/transactions")
            .wrap(JwtAuthMiddleware)
            .route(web::post().to(create_transaction))
            .route(web::get().to(list_my_transactions)),
    );
}
