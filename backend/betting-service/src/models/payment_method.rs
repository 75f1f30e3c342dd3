use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Where players send deposits (mobile wallet, bank account)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub method_type: String,
    pub name: String,
    pub phone: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
