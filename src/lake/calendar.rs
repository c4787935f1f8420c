use chrono::{DateTime, Datelike, Timelike, Utc};

/// Calendar attributes of an event timestamp, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeParts {
    pub start_time: DateTime<Utc>,
    pub hour: i32,
    pub day: i32,
    /// ISO 8601 week of the year.
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// 1 = Monday through 7 = Sunday.
    pub weekday: i32,
}

impl TimeParts {
    /// Derive the parts from an epoch-millisecond value, truncated to the
    /// whole second.
    pub fn from_epoch_millis(ts: i64) -> Option<Self> {
        let start_time = DateTime::from_timestamp(ts.div_euclid(1000), 0)?;
        Some(Self {
            start_time,
            hour: start_time.hour() as i32,
            day: start_time.day() as i32,
            week: start_time.iso_week().week() as i32,
            month: start_time.month() as i32,
            year: start_time.year(),
            weekday: start_time.weekday().number_from_monday() as i32,
        })
    }
}
