//! Calendar-date helpers. Every timestamp that enters the engine is truncated
//! to a UTC date here; nothing downstream compares datetimes.

use time::{Date, Duration, OffsetDateTime, UtcOffset};

// Serde adapter for `YYYY-MM-DD` dates.
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

pub fn day_of(ts: OffsetDateTime) -> Date {
    ts.to_offset(UtcOffset::UTC).date()
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// The requested date, or today when none was given.
pub fn day_or_today(ts: Option<OffsetDateTime>) -> Date {
    ts.map(day_of).unwrap_or_else(today)
}

/// First day of the inclusive window `[today - (days - 1), today]`.
pub fn window_start(today: Date, days: u32) -> Date {
    today - Duration::days(i64::from(days.max(1)) - 1)
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: Date,
    pub end: Date,
}

impl Window {
    /// The last `days` days, today included.
    pub fn ending(today: Date, days: u32) -> Self {
        Self {
            start: window_start(today, days),
            end: today,
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}
