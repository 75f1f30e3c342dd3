/// Payment method repository
use crate::models::PaymentMethod;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const PAYMENT_METHOD_COLUMNS: &str =
    "id, method_type, name, phone, account_number, bank_name, is_active, created_at";

#[derive(Debug, Default)]
pub struct PaymentMethodFields {
    pub method_type: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    method_type: &str,
    name: &str,
    fields: &PaymentMethodFields,
) -> Result<PaymentMethod, sqlx::Error> {
    sqlx::query_as::<_, PaymentMethod>(&format!(
        r#"
        INSERT INTO payment_methods (id, method_type, name, phone, account_number, bank_name, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PAYMENT_METHOD_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(method_type)
    .bind(name)
    .bind(fields.phone.as_deref())
    .bind(fields.account_number.as_deref())
    .bind(fields.bank_name.as_deref())
    .bind(fields.is_active.unwrap_or(true))
    .fetch_one(executor)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<PaymentMethod>, sqlx::Error> {
    sqlx::query_as::<_, PaymentMethod>(&format!(
        "SELECT {PAYMENT_METHOD_COLUMNS} FROM payment_methods ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn list_active(pool: &PgPool) -> Result<Vec<PaymentMethod>, sqlx::Error> {
    sqlx::query_as::<_, PaymentMethod>(&format!(
        "SELECT {PAYMENT_METHOD_COLUMNS} FROM payment_methods WHERE is_active ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn is_active<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM payment_methods WHERE id = $1 AND is_active)",
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Partial update; `None` fields keep their stored value
pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    fields: &PaymentMethodFields,
) -> Result<Option<PaymentMethod>, sqlx::Error> {
    sqlx::query_as::<_, PaymentMethod>(&format!(
        r#"
        UPDATE payment_methods
        SET method_type = COALESCE($2, method_type),
            name = COALESCE($3, name),
            phone = COALESCE($4, phone),
            account_number = COALESCE($5, account_number),
            bank_name = COALESCE($6, bank_name),
            is_active = COALESCE($7, is_active)
        WHERE id = $1
        RETURNING {PAYMENT_METHOD_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(fields.method_type.as_deref())
    .bind(fields.name.as_deref())
    .bind(fields.phone.as_deref())
    .bind(fields.account_number.as_deref())
    .bind(fields.bank_name.as_deref())
    .bind(fields.is_active)
    .fetch_optional(executor)
    .await
}

/// Returns false when nothing was deleted
pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM payment_methods WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
