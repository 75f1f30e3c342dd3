pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use config::BettingConfig;
use services::draw_calendar::DrawCalendar;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub betting: BettingConfig,
    pub calendar: DrawCalendar,
}

impl AppState {
    pub fn new(db: PgPool, betting: BettingConfig) -> Self {
        let calendar = DrawCalendar::new(betting.utc_offset_minutes);
        Self {
            db,
            betting,
            calendar,
        }
    }
}
