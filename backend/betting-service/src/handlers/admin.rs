use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use actix_middleware::{JwtAuthMiddleware, UserId};

use crate::db::{audit_repo, bet_repo, transaction_repo, user_repo};
use crate::error::Result;
use crate::handlers::{parse_json, payment_methods, require_admin};
use crate::services::{
    draw_calendar::DrawCalendar,
    settlement::{self, PublishResult},
    stats,
    wallet::{self, Review},
};
use crate::AppState;

const DEFAULT_AUDIT_LIMIT: i64 = 50;
const MAX_AUDIT_LIMIT: i64 = 500;

/// Draw date as `YYYY-MM-DD`, or a full timestamp as produced by a browser `Date`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DrawDateInput {
    Date(NaiveDate),
    Instant(DateTime<Utc>),
}

impl DrawDateInput {
    pub fn resolve(self, calendar: &DrawCalendar) -> NaiveDate {
        match self {
            DrawDateInput::Date(date) => date,
            DrawDateInput::Instant(instant) => calendar.draw_date_at(instant),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PublishResultRequest {
    /// Defaults to today's draw
    pub date: Option<DrawDateInput>,
    pub result2d: Option<String>,
    pub result3d: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub status: String,

    #[validate(length(max = 500))]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

pub async fn publish_result(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let admin_id = require_admin(&state.db, user_id).await?;
    let request: PublishResultRequest = parse_json(&body)?;

    let draw_date = match request.date {
        Some(input) => input.resolve(&state.calendar),
        None => state.calendar.today(),
    };

    let (result, summary) = settlement::publish_result(
        &state.db,
        PublishResult {
            admin_id,
            draw_date,
            result_2d: request.result2d,
            result_3d: request.result3d,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Result created and bets processed",
        "result": result,
        "settlement": summary,
    })))
}

pub async fn pending_transactions(
    state: web::Data<AppState>,
    user_id: UserId,
) -> Result<HttpResponse> {
    require_admin(&state.db, user_id).await?;

    let transactions = transaction_repo::list_pending(&state.db).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "transactions": transactions })))
}

pub async fn review_transaction(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let admin_id = require_admin(&state.db, user_id).await?;
    let request: ReviewRequest = parse_json(&body)?;
    request.validate()?;
    let status = wallet::parse_review_status(&request.status)?;

    let transaction = wallet::review_transaction(
        &state.db,
        Review {
            admin_id,
            transaction_id: path.into_inner(),
            status,
            admin_notes: request.admin_notes,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Transaction updated successfully",
        "transaction": transaction,
    })))
}

pub async fn dashboard_stats(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    require_admin(&state.db, user_id).await?;

    let stats = stats::dashboard_stats(&state.db, state.calendar.today()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "stats": stats })))
}

pub async fn bets_by_date(
    state: web::Data<AppState>,
    user_id: UserId,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse> {
    require_admin(&state.db, user_id).await?;

    let date = query.date.unwrap_or_else(|| state.calendar.today());
    let bets = bet_repo::list_by_draw_date(&state.db, date).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "bets": bets })))
}

pub async fn list_users(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    require_admin(&state.db, user_id).await?;

    let users = user_repo::list_users(&state.db).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "users": users })))
}

pub async fn audit_logs(
    state: web::Data<AppState>,
    user_id: UserId,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    require_admin(&state.db, user_id).await?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .clamp(1, MAX_AUDIT_LIMIT);
    let logs = audit_repo::list_recent(&state.db, limit).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "auditLogs": logs })))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(JwtAuthMiddleware)
            .route("/results", web::post().to(publish_result))
            .route(
                "/transactions/pending",
                web::get().to(pending_transactions),
            )
            .route("/transactions/{id}", web::patch().to(review_transaction))
            .route("/stats", web::get().to(dashboard_stats))
            .route("/bets", web::get().to(bets_by_date))
            .route("/users", web::get().to(list_users))
            .route("/audit-logs", web::get().to(audit_logs))
            .configure(payment_methods::register_admin_routes),
    );
}
