//! Maps wall-clock instants onto draw dates.
//!
//! A bet placed at 23:50 local time belongs to that local day's draw even
//! though it is already the next day in UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

#[derive(Debug, Clone, Copy)]
pub struct DrawCalendar {
    offset: FixedOffset,
}

impl DrawCalendar {
    /// Offsets of a day or more fall back to UTC
    pub fn new(utc_offset_minutes: i32) -> Self {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn draw_date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.draw_date_at(Utc::now())
    }
}
