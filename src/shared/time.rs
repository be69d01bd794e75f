use chrono::{DateTime, Utc};

/// Conversions for the epoch-millisecond timestamps carried in result pages.
pub struct TimeConverter;

impl TimeConverter {
    /// Epoch milliseconds to a UTC instant; `None` past chrono's representable range.
    pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(millis)
    }
}
