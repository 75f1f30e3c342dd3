use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::db::bet_repo::{self, DrawTotals};
use crate::error::Result;

/// Admin dashboard figures for one draw day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub date: NaiveDate,
    pub total_bets: i64,
    pub total_amount: Decimal,
    pub total_winnings: Decimal,
    pub net_profit: Decimal,
}

impl DashboardStats {
    fn from_totals(date: NaiveDate, totals: DrawTotals) -> Self {
        Self {
            date,
            total_bets: totals.total_bets,
            total_amount: totals.total_amount,
            total_winnings: totals.total_winnings,
            net_profit: totals.total_amount - totals.total_winnings,
        }
    }
}

pub async fn dashboard_stats(pool: &PgPool, date: NaiveDate) -> Result<DashboardStats> {
    let totals = bet_repo::totals_for_draw(pool, date).await?;
    Ok(DashboardStats::from_totals(date, totals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_profit_can_go_negative() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let stats = DashboardStats::from_totals(
            date,
            DrawTotals {
                total_bets: 4,
                total_amount: Decimal::from(40),
                total_winnings: Decimal::from(850),
            },
        );
        assert_eq!(stats.net_profit, Decimal::from(-810));

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalBets"], 4);
        assert_eq!(json["netProfit"], "-810");
        assert_eq!(json["date"], "2026-10-18");
    }
}
