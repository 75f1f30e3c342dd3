use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Admin actions written to the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    ResultCreated,
    TransactionUpdate,
    PaymentMethodCreated,
    PaymentMethodUpdated,
    PaymentMethodDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResultCreated => "RESULT_CREATED",
            Self::TransactionUpdate => "TRANSACTION_UPDATE",
            Self::PaymentMethodCreated => "PAYMENT_METHOD_CREATED",
            Self::PaymentMethodUpdated => "PAYMENT_METHOD_UPDATED",
            Self::PaymentMethodDeleted => "PAYMENT_METHOD_DELETED",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}
