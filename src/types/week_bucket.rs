//! Per-week output of the proxy: spot records grouped by site-local calendar date.

use crate::types::spot_record::SpotRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Spot records for one week, keyed by the site-local date each class runs on.
///
/// Dates iterate in calendar order. Within a date, records keep the order in
/// which the provider listed the classes. Serializes as a plain JSON object:
///
/// ```
/// use chrono::NaiveDate;
/// use gxp_spots::{SpotRecord, WeekBucket};
///
/// let mut bucket = WeekBucket::default();
/// let day = NaiveDate::from_ymd_opt(2020, 11, 23).unwrap();
/// bucket.push(day, SpotRecord::new("10 SPOTS LEFT", "11938371"));
///
/// assert_eq!(
///     serde_json::to_string(&bucket).unwrap(),
///     r#"{"2020-11-23":[{"textmsg":"10 SPOTS LEFT","productid":"11938371"}]}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekBucket {
    days: BTreeMap<NaiveDate, Vec<SpotRecord>>,
}

impl WeekBucket {
    /// Appends a record to the given date, creating the date entry if needed.
    pub fn push(&mut self, date: NaiveDate, record: SpotRecord) {
        self.days.entry(date).or_default().push(record);
    }

    /// Records for a single date, in provider order.
    pub fn get(&self, date: NaiveDate) -> Option<&[SpotRecord]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, Vec<SpotRecord>> {
        self.days.iter()
    }

    /// Number of distinct dates holding at least one class.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Total number of classes across all dates.
    pub fn class_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl<'a> IntoIterator for &'a WeekBucket {
    type Item = (&'a NaiveDate, &'a Vec<SpotRecord>);
    type IntoIter = btree_map::Iter<'a, NaiveDate, Vec<SpotRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 11, day).unwrap()
    }

    #[test]
    fn test_push_keeps_insertion_order_within_a_day() {
        let mut bucket = WeekBucket::default();
        bucket.push(date(24), SpotRecord::new("3 SPOTS LEFT", "b"));
        bucket.push(date(23), SpotRecord::new("1 SPOT LEFT", "a"));
        bucket.push(date(24), SpotRecord::new("FULL", "c"));

        assert_eq!(bucket.day_count(), 2);
        assert_eq!(bucket.class_count(), 3);
        let ids: Vec<_> = bucket
            .get(date(24))
            .unwrap()
            .iter()
            .map(|r| r.class_instance_id.as_str())
            .collect();
        assert_eq!(ids, ["b", "c"]);
        // Dates come back in calendar order regardless of insertion order.
        let days: Vec<_> = bucket.iter().map(|(d, _)| *d).collect();
        assert_eq!(days, [date(23), date(24)]);
    }

    #[test]
    fn test_json_round_trip_uses_date_keys() -> Result<(), serde_json::Error> {
        let mut bucket = WeekBucket::default();
        bucket.push(date(25), SpotRecord::new("WAITLIST", "42"));

        let json = serde_json::to_value(&bucket)?;
        assert_eq!(
            json,
            serde_json::json!({"2020-11-25": [{"textmsg": "WAITLIST", "productid": "42"}]})
        );
        let back: WeekBucket = serde_json::from_value(json)?;
        assert_eq!(back, bucket);
        Ok(())
    }

    #[test]
    fn test_empty_bucket_serializes_as_empty_object() {
        let bucket = WeekBucket::default();
        assert!(bucket.is_empty());
        assert_eq!(serde_json::to_string(&bucket).unwrap(), "{}");
    }
}
