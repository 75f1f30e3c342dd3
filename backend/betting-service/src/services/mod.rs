pub mod auth;
pub mod betting;
pub mod draw_calendar;
pub mod settlement;
pub mod stats;
pub mod wallet;
