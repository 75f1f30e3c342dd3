use actix_web::{web, HttpResponse};
use chrono::NaiveDate;

use crate::db::result_repo;
use crate::error::{AppError, Result};
use crate::AppState;

pub async fn today_result(state: web::Data<AppState>) -> Result<HttpResponse> {
    let result = result_repo::find_by_date(&state.db, state.calendar.today()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": result })))
}

pub async fn result_by_date(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let date = NaiveDate::parse_from_str(&path, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Date must be formatted YYYY-MM-DD".to_string()))?;

    let result = result_repo::find_by_date(&state.db, date).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": result })))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/results")
            .route("/today", web::get().to(today_result))
            .route("/{date}", web::get().to(result_by_date)),
    );
}
