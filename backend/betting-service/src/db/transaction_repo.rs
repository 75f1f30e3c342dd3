/// Wallet ledger repository
use crate::models::{Transaction, TransactionKind, TransactionStatus};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const TRANSACTION_COLUMNS: &str = "id, user_id, kind, amount, status, description, \
                                   payment_method_id, receipt_url, admin_notes, reviewed_by, \
                                   reviewed_at, created_at";

pub struct NewTransaction<'a> {
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub description: Option<&'a str>,
    pub payment_method_id: Option<Uuid>,
    pub receipt_url: Option<&'a str>,
}

impl<'a> NewTransaction<'a> {
    /// System-written ledger entry that is final on insert
    pub fn completed(
        user_id: Uuid,
        kind: TransactionKind,
        amount: Decimal,
        description: &'a str,
    ) -> Self {
        Self {
            user_id,
            kind,
            amount,
            status: TransactionStatus::Completed,
            description: Some(description),
            payment_method_id: None,
            receipt_url: None,
        }
    }
}

pub async fn insert_transaction<'e>(
    executor: impl PgExecutor<'e>,
    tx: &NewTransaction<'_>,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        r#"
        INSERT INTO transactions
            (id, user_id, kind, amount, status, description, payment_method_id, receipt_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {TRANSACTION_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(tx.user_id)
    .bind(tx.kind)
    .bind(tx.amount)
    .bind(tx.status)
    .bind(tx.description)
    .bind(tx.payment_method_id)
    .bind(tx.receipt_url)
    .fetch_one(executor)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_pending(pool: &PgPool) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE status = $1 ORDER BY created_at DESC"
    ))
    .bind(TransactionStatus::Pending)
    .fetch_all(pool)
    .await
}

/// Load a transaction and hold its row lock until the surrounding transaction ends
pub async fn lock_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn mark_reviewed<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: TransactionStatus,
    admin_notes: Option<&str>,
    reviewed_by: Uuid,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        r#"
        UPDATE transactions
        SET status = $1,
            admin_notes = COALESCE($2, admin_notes),
            reviewed_by = $3,
            reviewed_at = NOW()
        WHERE id = $4
        RETURNING {TRANSACTION_COLUMNS}
        "#
    ))
    .bind(status)
    .bind(admin_notes)
    .bind(reviewed_by)
    .bind(id)
    .fetch_one(executor)
    .await
}
