use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::BetType;

/// Published draw outcome for one calendar day
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    pub id: Uuid,
    pub draw_date: NaiveDate,
    pub result_2d: Option<String>,
    pub result_3d: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl DrawResult {
    pub fn winning_number(&self, bet_type: BetType) -> Option<&str> {
        match bet_type {
            BetType::TwoD => self.result_2d.as_deref(),
            BetType::ThreeD => self.result_3d.as_deref(),
        }
    }
}
