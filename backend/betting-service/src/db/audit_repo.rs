/// Admin audit trail
use crate::models::{AuditAction, AuditLog};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

pub async fn record<'e>(
    executor: impl PgExecutor<'e>,
    admin_id: Uuid,
    action: AuditAction,
    details: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_logs (id, admin_id, action, details) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(admin_id)
    .bind(action.as_str())
    .bind(details)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditLog>, sqlx::Error> {
    sqlx::query_as::<_, AuditLog>(
        r#"
        SELECT id, admin_id, action, details, created_at
        FROM audit_logs
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
