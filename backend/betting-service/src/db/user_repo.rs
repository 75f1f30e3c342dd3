/// User repository - accounts, balances and referral commission
use crate::models::User;
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, password_hash, phone, balance, referral_code, \
                            used_ref_code, commission, is_admin, created_at";

pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub phone: Option<&'a str>,
    pub referral_code: &'a str,
    pub used_ref_code: Option<&'a str>,
}

/// Create a new user with a zero balance
pub async fn create_user<'e>(
    executor: impl PgExecutor<'e>,
    new_user: &NewUser<'_>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, password_hash, phone, referral_code, used_ref_code)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new_user.username)
    .bind(new_user.password_hash)
    .bind(new_user.phone)
    .bind(new_user.referral_code)
    .bind(new_user.used_ref_code)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_referral_code<'e>(
    executor: impl PgExecutor<'e>,
    code: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE referral_code = $1"
    ))
    .bind(code)
    .fetch_optional(executor)
    .await
}

pub async fn referral_code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE referral_code = $1)")
        .bind(code)
        .fetch_one(pool)
        .await
}

pub async fn is_admin(pool: &PgPool, id: Uuid) -> Result<Option<bool>, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Add `amount` to the user's balance. Returns false when the user does not exist.
pub async fn credit_balance<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    amount: Decimal,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET balance = balance + $1 WHERE id = $2")
        .bind(amount)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Subtract `amount` from the user's balance only if it stays non-negative.
/// Returns false when the balance is insufficient or the user does not exist.
pub async fn debit_balance<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    amount: Decimal,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE users SET balance = balance - $1 WHERE id = $2 AND balance >= $1")
            .bind(amount)
            .bind(user_id)
            .execute(executor)
            .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn credit_commission<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    amount: Decimal,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET commission = commission + $1 WHERE id = $2")
        .bind(amount)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// All users, newest first
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}
