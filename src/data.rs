use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// A decoded field value. Absence (empty raw string) is `None` at the row level.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    String(String),
    List(Vec<String>),
    Date(NaiveDate),
    Time(NaiveTime),
    ZonedTime(ZonedTime),
    DateTime(NaiveDateTime),
    ZonedDateTime(DateTime<FixedOffset>),
}

/// Time of day carrying the offset it was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedTime {
    pub time: NaiveTime,
    pub offset: FixedOffset,
}

impl ZonedTime {
    pub fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }
}

impl fmt::Display for ZonedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time.format("%H:%M:%S%.f"), self.offset)
    }
}

impl Serialize for ZonedTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::String(s) => s.clone(),
            Value::List(items) => items.join(","),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Time(t) => t.format("%H:%M:%S%.f").to_string(),
            Value::ZonedTime(t) => t.to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            Value::ZonedDateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string(),
        }
    }

    /// Calendar dates widen to midnight.
    pub fn as_naive_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            Value::DateTime(dt) => Some(*dt),
            Value::ZonedDateTime(dt) => Some(dt.naive_local()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Renders an optional cell the way CSV and table output expect (absent is empty).
pub fn display_cell(value: Option<&Value>) -> String {
    value.map(Value::as_display).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn as_display_formats_each_variant() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let time = NaiveTime::from_hms_milli_opt(8, 30, 0, 500).unwrap();
        let offset = FixedOffset::east_opt(-5 * 3600).unwrap();

        assert_eq!(Value::Boolean(true).as_display(), "true");
        assert_eq!(
            Value::Decimal(Decimal::from_str("12.50").unwrap()).as_display(),
            "12.50"
        );
        assert_eq!(
            Value::List(vec!["A".into(), "B".into()]).as_display(),
            "A,B"
        );
        assert_eq!(Value::Date(date).as_display(), "2024-05-06");
        assert_eq!(Value::Time(time).as_display(), "08:30:00.500");
        assert_eq!(
            Value::ZonedTime(ZonedTime::new(time, offset)).as_display(),
            "08:30:00.500-05:00"
        );
        assert_eq!(
            Value::DateTime(date.and_time(time)).as_display(),
            "2024-05-06 08:30:00.500"
        );
    }

    #[test]
    fn serializes_untagged_json() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let zoned = date
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_local_timezone(utc)
            .unwrap();

        assert_eq!(serde_json::to_string(&Value::Integer(42)).unwrap(), "42");
        assert_eq!(
            serde_json::to_string(&Value::Decimal(Decimal::from_str("12.50").unwrap())).unwrap(),
            "\"12.50\""
        );
        assert_eq!(
            serde_json::to_string(&Value::List(vec!["A".into()])).unwrap(),
            "[\"A\"]"
        );
        assert_eq!(
            serde_json::to_string(&Value::Date(date)).unwrap(),
            "\"2020-05-01\""
        );
        assert_eq!(
            serde_json::to_string(&Value::ZonedDateTime(zoned)).unwrap(),
            "\"2020-05-01T12:00:00+00:00\""
        );
    }

    #[test]
    fn date_widens_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        assert_eq!(
            Value::Date(date).as_naive_datetime(),
            Some(date.and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(Value::Integer(1).as_naive_datetime(), None);
    }

    #[test]
    fn display_cell_renders_absent_as_empty() {
        assert_eq!(display_cell(None), "");
        assert_eq!(display_cell(Some(&Value::Integer(7))), "7");
    }
}
