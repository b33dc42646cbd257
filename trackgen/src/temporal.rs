//! Instant comparison for timestamp-like fields.

use std::time::SystemTime;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Types compared by the instant they denote rather than by representation.
pub trait Temporal {
    fn same_instant(&self, other: &Self) -> bool;
}

impl<Tz: TimeZone> Temporal for DateTime<Tz> {
    fn same_instant(&self, other: &Self) -> bool {
        self.timestamp() == other.timestamp() && self.timestamp_subsec_nanos() == other.timestamp_subsec_nanos()
    }
}

impl Temporal for NaiveDateTime {
    fn same_instant(&self, other: &Self) -> bool {
        self == other
    }
}

impl Temporal for NaiveDate {
    fn same_instant(&self, other: &Self) -> bool {
        self == other
    }
}

impl Temporal for NaiveTime {
    fn same_instant(&self, other: &Self) -> bool {
        self == other
    }
}

impl Temporal for SystemTime {
    fn same_instant(&self, other: &Self) -> bool {
        self == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_same_instant_across_offsets() {
        let utc = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = utc.with_timezone(&offset);
        assert!(local.same_instant(&utc.with_timezone(&offset)));
        assert!(Temporal::same_instant(&utc, &(utc + chrono::Duration::zero())));
        assert!(!utc.same_instant(&(utc + chrono::Duration::milliseconds(1))));
    }

    #[test]
    fn test_naive_and_system_time() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(date.same_instant(&date));
        assert!(!date.same_instant(&date.succ_opt().unwrap()));
        let now = SystemTime::now();
        assert!(now.same_instant(&now));
    }
}
