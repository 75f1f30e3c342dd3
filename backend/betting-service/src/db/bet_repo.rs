/// Bet repository - placement, listing and settlement updates
use crate::models::{Bet, BetStatus, BetType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

const BET_COLUMNS: &str =
    "id, user_id, bet_type, number, amount, potential_payout, status, draw_date, created_at";

pub struct NewBet<'a> {
    pub user_id: Uuid,
    pub bet_type: BetType,
    pub number: &'a str,
    pub amount: Decimal,
    pub potential_payout: Decimal,
    pub draw_date: NaiveDate,
}

pub async fn insert_bet<'e>(
    executor: impl PgExecutor<'e>,
    bet: &NewBet<'_>,
) -> Result<Bet, sqlx::Error> {
    sqlx::query_as::<_, Bet>(&format!(
        r#"
        INSERT INTO bets (id, user_id, bet_type, number, amount, potential_payout, status, draw_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {BET_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(bet.user_id)
    .bind(bet.bet_type)
    .bind(bet.number)
    .bind(bet.amount)
    .bind(bet.potential_payout)
    .bind(BetStatus::Pending)
    .bind(bet.draw_date)
    .fetch_one(executor)
    .await
}

/// Most recent bets of one user
pub async fn list_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<Bet>, sqlx::Error> {
    sqlx::query_as::<_, Bet>(&format!(
        "SELECT {BET_COLUMNS} FROM bets WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn list_by_draw_date(pool: &PgPool, draw_date: NaiveDate) -> Result<Vec<Bet>, sqlx::Error> {
    sqlx::query_as::<_, Bet>(&format!(
        "SELECT {BET_COLUMNS} FROM bets WHERE draw_date = $1 ORDER BY created_at DESC"
    ))
    .bind(draw_date)
    .fetch_all(pool)
    .await
}

/// Pending bets of a draw, row-locked for settlement
pub async fn lock_pending_for_draw<'e>(
    executor: impl PgExecutor<'e>,
    draw_date: NaiveDate,
) -> Result<Vec<Bet>, sqlx::Error> {
    sqlx::query_as::<_, Bet>(&format!(
        r#"
        SELECT {BET_COLUMNS} FROM bets
        WHERE draw_date = $1 AND status = $2
        ORDER BY created_at
        FOR UPDATE
        "#
    ))
    .bind(draw_date)
    .bind(BetStatus::Pending)
    .fetch_all(executor)
    .await
}

pub async fn update_status<'e>(
    executor: impl PgExecutor<'e>,
    bet_id: Uuid,
    status: BetStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE bets SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(bet_id)
        .execute(executor)
        .await?;
    Ok(())
}

#[derive(Debug, FromRow)]
pub struct DrawTotals {
    pub total_bets: i64,
    pub total_amount: Decimal,
    pub total_winnings: Decimal,
}

/// Aggregate stake and winnings over one draw date
pub async fn totals_for_draw(pool: &PgPool, draw_date: NaiveDate) -> Result<DrawTotals, sqlx::Error> {
    sqlx::query_as::<_, DrawTotals>(
        r#"
        SELECT
            COUNT(*) AS total_bets,
            COALESCE(SUM(amount), 0) AS total_amount,
            COALESCE(SUM(potential_payout) FILTER (WHERE status = 'won'), 0) AS total_winnings
        FROM bets
        WHERE draw_date = $1
        "#,
    )
    .bind(draw_date)
    .fetch_one(pool)
    .await
}
