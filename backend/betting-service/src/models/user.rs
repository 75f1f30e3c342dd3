use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub balance: Decimal,
    pub referral_code: String,
    pub used_ref_code: Option<String>,
    pub commission: Decimal,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
