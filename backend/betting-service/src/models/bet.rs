use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Which draw a bet is played against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum BetType {
    #[serde(rename = "2D")]
    #[sqlx(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    #[sqlx(rename = "3D")]
    ThreeD,
}

impl BetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoD => "2D",
            Self::ThreeD => "3D",
        }
    }

    /// Number of digits a bet number (and the winning number) must have
    pub fn digits(&self) -> usize {
        match self {
            Self::TwoD => 2,
            Self::ThreeD => 3,
        }
    }

    /// Payout multiplier applied to the stake
    pub fn odds(&self) -> Decimal {
        match self {
            Self::TwoD => Decimal::from(85),
            Self::ThreeD => Decimal::from(500),
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub bet_type: BetType,
    pub number: String,
    pub amount: Decimal,
    pub potential_payout: Decimal,
    pub status: BetStatus,
    pub draw_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
