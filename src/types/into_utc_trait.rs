use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Anything that can name the instant a week lookup is anchored on.
///
/// Unix seconds (`i64`) are accepted as-is; values outside chrono's range yield `None`.
pub trait IntoUtcDateTime {
    fn into_utc(self) -> Option<DateTime<Utc>>;
}

impl IntoUtcDateTime for i64 {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self, 0)
    }
}

impl IntoUtcDateTime for NaiveDateTime {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        Some(Utc.from_utc_datetime(&self))
    }
}

impl IntoUtcDateTime for DateTime<Local> {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

impl IntoUtcDateTime for DateTime<Utc> {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        Some(self)
    }
}

impl IntoUtcDateTime for DateTime<FixedOffset> {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

impl IntoUtcDateTime for DateTime<Tz> {
    fn into_utc(self) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_seconds() {
        let utc = 1_606_154_400_i64.into_utc().unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2020, 11, 23, 18, 0, 0).unwrap());
        assert!(i64::MAX.into_utc().is_none());
    }

    #[test]
    fn test_zoned_datetime() {
        let chicago = chrono_tz::America::Chicago
            .with_ymd_and_hms(2020, 11, 23, 12, 0, 0)
            .unwrap();
        assert_eq!(
            chicago.into_utc().unwrap(),
            Utc.with_ymd_and_hms(2020, 11, 23, 18, 0, 0).unwrap()
        );
    }
}
