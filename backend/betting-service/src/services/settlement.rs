//! Result publication and settlement of a draw's pending bets.
//!
//! The result insert, every bet status change, every winner credit and the
//! audit entry commit together or not at all. A per-date advisory lock keeps
//! new bets out while settlement runs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{
    self, audit_repo, bet_repo, result_repo,
    transaction_repo::{self, NewTransaction},
    user_repo,
};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{AuditAction, Bet, BetStatus, BetType, DrawResult, TransactionKind};
use crate::services::betting::validate_number;

pub struct PublishResult {
    pub admin_id: Uuid,
    pub draw_date: NaiveDate,
    pub result_2d: Option<String>,
    pub result_3d: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    pub settled: u64,
    pub won: u64,
    pub lost: u64,
    pub total_payout: Decimal,
}

/// Outcome of one bet against a published result
pub fn evaluate(bet: &Bet, result: &DrawResult) -> BetStatus {
    match result.winning_number(bet.bet_type) {
        Some(winning) if winning == bet.number => BetStatus::Won,
        _ => BetStatus::Lost,
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate the submitted numbers, returning them trimmed
pub fn validate_result(
    result_2d: Option<String>,
    result_3d: Option<String>,
) -> Result<(Option<String>, Option<String>)> {
    let result_2d = normalize(result_2d);
    let result_3d = normalize(result_3d);

    if result_2d.is_none() && result_3d.is_none() {
        return Err(AppError::Validation(
            "At least one of result2d or result3d is required".to_string(),
        ));
    }
    if let Some(n) = &result_2d {
        validate_number(BetType::TwoD, n)?;
    }
    if let Some(n) = &result_3d {
        validate_number(BetType::ThreeD, n)?;
    }
    Ok((result_2d, result_3d))
}

fn audit_details(result: &DrawResult) -> String {
    format!(
        "Created result for {}: 2D={}, 3D={}",
        result.draw_date,
        result.result_2d.as_deref().unwrap_or("none"),
        result.result_3d.as_deref().unwrap_or("none"),
    )
}

/// Publish the result for a date and settle that date's pending bets
pub async fn publish_result(
    pool: &PgPool,
    request: PublishResult,
) -> Result<(DrawResult, SettlementSummary)> {
    let (result_2d, result_3d) = validate_result(request.result_2d, request.result_3d)?;

    let mut tx = pool.begin().await?;

    result_repo::lock_draw_exclusive(&mut *tx, request.draw_date).await?;

    let result = result_repo::insert_result(
        &mut *tx,
        request.draw_date,
        result_2d.as_deref(),
        result_3d.as_deref(),
        request.admin_id,
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e, result_repo::DRAW_DATE_UNIQUE) {
            AppError::Conflict(format!(
                "Result for {} is already published",
                request.draw_date
            ))
        } else {
            AppError::Database(e)
        }
    })?;

    let pending = bet_repo::lock_pending_for_draw(&mut *tx, request.draw_date).await?;
    let mut summary = SettlementSummary::default();

    for bet in &pending {
        let status = evaluate(bet, &result);

        if status == BetStatus::Won {
            if !user_repo::credit_balance(&mut *tx, bet.user_id, bet.potential_payout).await? {
                return Err(AppError::Internal(format!(
                    "user {} of winning bet {} no longer exists",
                    bet.user_id, bet.id
                )));
            }

            let description = format!("Winning payout for {} bet on {}", bet.bet_type, bet.number);
            transaction_repo::insert_transaction(
                &mut *tx,
                &NewTransaction::completed(
                    bet.user_id,
                    TransactionKind::Payout,
                    bet.potential_payout,
                    &description,
                ),
            )
            .await?;

            summary.won += 1;
            summary.total_payout += bet.potential_payout;
        } else {
            summary.lost += 1;
        }

        bet_repo::update_status(&mut *tx, bet.id, status).await?;
        summary.settled += 1;
    }

    audit_repo::record(
        &mut *tx,
        request.admin_id,
        AuditAction::ResultCreated,
        &audit_details(&result),
    )
    .await?;

    tx.commit().await?;

    metrics::record_settlement(summary.won, summary.lost);
    tracing::info!(
        draw_date = %result.draw_date,
        admin_id = %request.admin_id,
        settled = summary.settled,
        won = summary.won,
        lost = summary.lost,
        total_payout = %summary.total_payout,
        "draw result published and settled"
    );

    Ok((result, summary))
}
