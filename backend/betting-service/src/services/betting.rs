use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{
    bet_repo::{self, NewBet},
    result_repo,
    transaction_repo::{self, NewTransaction},
    user_repo,
};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{Bet, BetType, TransactionKind};

/// Largest stake accepted for a single bet
const MAX_STAKE: i64 = 1_000_000;

/// Check that `number` is exactly the digit count of `bet_type`
pub fn validate_number(bet_type: BetType, number: &str) -> Result<()> {
    if number.len() == bet_type.digits() && number.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid {} number format",
            bet_type
        )))
    }
}

/// Positive, at most two decimal places, within the stake ceiling
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation("Amount must be positive".to_string()));
    }
    if amount.normalize().scale() > 2 {
        return Err(AppError::Validation(
            "Amount must have at most 2 decimal places".to_string(),
        ));
    }
    if amount > Decimal::from(MAX_STAKE) {
        return Err(AppError::Validation(format!(
            "Amount must not exceed {}",
            MAX_STAKE
        )));
    }
    Ok(())
}

pub fn potential_payout(bet_type: BetType, amount: Decimal) -> Decimal {
    (amount * bet_type.odds()).round_dp(2)
}

pub struct PlaceBet {
    pub user_id: Uuid,
    pub bet_type: BetType,
    pub number: String,
    pub amount: Decimal,
    pub draw_date: NaiveDate,
}

/// Debit the stake, record the bet and its ledger entry in one transaction
pub async fn place_bet(pool: &PgPool, request: PlaceBet) -> Result<Bet> {
    validate_number(request.bet_type, &request.number)?;
    validate_amount(request.amount)?;

    let payout = potential_payout(request.bet_type, request.amount);

    let mut tx = pool.begin().await?;

    result_repo::lock_draw_shared(&mut *tx, request.draw_date).await?;
    if result_repo::exists_for_date(&mut *tx, request.draw_date).await? {
        return Err(AppError::Conflict(format!(
            "Betting is closed: result for {} is already published",
            request.draw_date
        )));
    }

    if !user_repo::debit_balance(&mut *tx, request.user_id, request.amount).await? {
        return Err(AppError::InsufficientBalance);
    }

    let bet = bet_repo::insert_bet(
        &mut *tx,
        &NewBet {
            user_id: request.user_id,
            bet_type: request.bet_type,
            number: &request.number,
            amount: request.amount,
            potential_payout: payout,
            draw_date: request.draw_date,
        },
    )
    .await?;

    let description = format!("{} bet on {}", bet.bet_type, bet.number);
    transaction_repo::insert_transaction(
        &mut *tx,
        &NewTransaction::completed(
            request.user_id,
            TransactionKind::Bet,
            -request.amount,
            &description,
        ),
    )
    .await?;

    tx.commit().await?;

    metrics::record_bet_placed(bet.bet_type.as_str());
    tracing::info!(
        bet_id = %bet.id,
        user_id = %bet.user_id,
        bet_type = %bet.bet_type,
        amount = %bet.amount,
        draw_date = %bet.draw_date,
        "bet placed"
    );

    Ok(bet)
}
