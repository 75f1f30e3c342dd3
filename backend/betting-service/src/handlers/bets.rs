use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use actix_middleware::{JwtAuthMiddleware, UserId};

use crate::db::bet_repo;
use crate::error::Result;
use crate::models::BetType;
use crate::services::betting::{self, PlaceBet};
use crate::AppState;

const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct PlaceBetRequest {
    #[serde(rename = "type")]
    pub bet_type: BetType,
    pub number: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ListBetsQuery {
    pub limit: Option<i64>,
}

pub async fn place_bet(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: web::Json<PlaceBetRequest>,
) -> Result<HttpResponse> {
    let request = payload.into_inner();

    let bet = betting::place_bet(
        &state.db,
        PlaceBet {
            user_id: user_id.0,
            bet_type: request.bet_type,
            number: request.number.trim().to_string(),
            amount: request.amount,
            draw_date: state.calendar.today(),
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Bet placed successfully",
        "bet": bet,
    })))
}

pub async fn list_my_bets(
    state: web::Data<AppState>,
    user_id: UserId,
    query: web::Query<ListBetsQuery>,
) -> Result<HttpResponse> {
    let limit = query
        .limit
        .unwrap_or(state.betting.recent_bets_limit)
        .clamp(1, MAX_LIST_LIMIT);

    let bets = bet_repo::list_by_user(&state.db, user_id.0, limit).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "bets": bets })))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/bets")
            .wrap(JwtAuthMiddleware)
            .route(web::post().to(place_bet))
            .route(web::get().to(list_my_bets)),
    );
}
