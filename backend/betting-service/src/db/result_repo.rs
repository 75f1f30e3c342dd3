/// Draw result repository
use crate::models::DrawResult;
use chrono::{Datelike, NaiveDate};
use sqlx::PgExecutor;
use uuid::Uuid;

const RESULT_COLUMNS: &str = "id, draw_date, result_2d, result_3d, created_by, created_at";

pub const DRAW_DATE_UNIQUE: &str = "results_draw_date_key";

/// Advisory lock namespace for per-date draw locks
const DRAW_LOCK_NAMESPACE: i64 = 0x4452_4157 << 32;

fn draw_lock_key(draw_date: NaiveDate) -> i64 {
    DRAW_LOCK_NAMESPACE | i64::from(draw_date.num_days_from_ce())
}

/// Taken by bet placement. Many bets may hold it at once.
pub async fn lock_draw_shared<'e>(
    executor: impl PgExecutor<'e>,
    draw_date: NaiveDate,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock_shared($1)")
        .bind(draw_lock_key(draw_date))
        .execute(executor)
        .await?;
    Ok(())
}

/// Taken by result publication. Waits for in-flight bets on the same date.
pub async fn lock_draw_exclusive<'e>(
    executor: impl PgExecutor<'e>,
    draw_date: NaiveDate,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(draw_lock_key(draw_date))
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn insert_result<'e>(
    executor: impl PgExecutor<'e>,
    draw_date: NaiveDate,
    result_2d: Option<&str>,
    result_3d: Option<&str>,
    created_by: Uuid,
) -> Result<DrawResult, sqlx::Error> {
    sqlx::query_as::<_, DrawResult>(&format!(
        r#"
        INSERT INTO results (id, draw_date, result_2d, result_3d, created_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {RESULT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(draw_date)
    .bind(result_2d)
    .bind(result_3d)
    .bind(created_by)
    .fetch_one(executor)
    .await
}

pub async fn find_by_date<'e>(
    executor: impl PgExecutor<'e>,
    draw_date: NaiveDate,
) -> Result<Option<DrawResult>, sqlx::Error> {
    sqlx::query_as::<_, DrawResult>(&format!(
        "SELECT {RESULT_COLUMNS} FROM results WHERE draw_date = $1"
    ))
    .bind(draw_date)
    .fetch_optional(executor)
    .await
}

pub async fn exists_for_date<'e>(
    executor: impl PgExecutor<'e>,
    draw_date: NaiveDate,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM results WHERE draw_date = $1)")
        .bind(draw_date)
        .fetch_one(executor)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_keys_distinct_per_day() {
        let a = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let b = a.succ_opt().unwrap();
        assert_ne!(draw_lock_key(a), draw_lock_key(b));
        assert_eq!(draw_lock_key(a) & !0xFFFF_FFFF, DRAW_LOCK_NAMESPACE);
    }
}
