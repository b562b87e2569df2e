//! Auto-populated columns
//!
//! `id`, `created_at` and `updated_at` are ordinary columns. They are only
//! filled in when the header declares them and the caller left them empty.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::storage::Record;

pub const ID_COLUMN: &str = "id";
pub const CREATED_AT_COLUMN: &str = "created_at";
pub const UPDATED_AT_COLUMN: &str = "updated_at";

/// Values derived from a single clock reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    /// Unix time in nanoseconds, as decimal text
    pub id: String,
    /// RFC 3339 UTC timestamp with nanoseconds
    pub timestamp: String,
}

impl Stamp {
    /// Reads the clock once
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        // out of range only after the year 2262
        let nanos = time
            .timestamp_nanos_opt()
            .unwrap_or_else(|| time.timestamp().saturating_mul(1_000_000_000));
        Self {
            id: nanos.to_string(),
            timestamp: time.to_rfc3339_opts(SecondsFormat::Nanos, true),
        }
    }
}

fn is_blank(record: &Record, column: &str) -> bool {
    record.get(column).map_or(true, |v| v.is_empty())
}

/// Fills `id`, `created_at` and `updated_at` where declared and blank.
///
/// Both timestamps come from the same stamp, so a fresh record has
/// `created_at == updated_at` unless the caller supplied one of them.
pub fn fill_insert_defaults(header: &[String], record: &mut Record, stamp: &Stamp) {
    let declares = |column: &str| header.iter().any(|c| c == column);

    if declares(ID_COLUMN) && is_blank(record, ID_COLUMN) {
        record.insert(ID_COLUMN.to_string(), stamp.id.clone());
    }
    for column in [CREATED_AT_COLUMN, UPDATED_AT_COLUMN] {
        if declares(column) && is_blank(record, column) {
            record.insert(column.to_string(), stamp.timestamp.clone());
        }
    }
}

/// Overwrites `updated_at` if the header declares it.
pub fn touch_updated_at(header: &[String], record: &mut Record, stamp: &Stamp) {
    if header.iter().any(|c| c == UPDATED_AT_COLUMN) {
        record.insert(UPDATED_AT_COLUMN.to_string(), stamp.timestamp.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn header(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    fn fixed_stamp() -> Stamp {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        Stamp::at(time)
    }

    #[test]
    fn test_stamp_format() {
        let stamp = fixed_stamp();
        assert_eq!(stamp.timestamp, "2024-05-01T12:30:00.123456789Z");
        assert_eq!(stamp.id, "1714566600123456789");
    }

    #[test]
    fn test_fills_blank_declared_columns() {
        let mut record = Record::new();
        record.insert("id".into(), "".into());
        record.insert("name".into(), "Ann".into());

        fill_insert_defaults(
            &header(&["id", "name", "created_at", "updated_at"]),
            &mut record,
            &fixed_stamp(),
        );

        assert_eq!(record["id"], "1714566600123456789");
        assert_eq!(record["created_at"], record["updated_at"]);
        assert_eq!(record["name"], "Ann");
    }

    #[test]
    fn test_keeps_supplied_values() {
        let mut record = Record::new();
        record.insert("id".into(), "custom".into());
        record.insert("created_at".into(), "2020-01-01T00:00:00Z".into());

        fill_insert_defaults(
            &header(&["id", "created_at", "updated_at"]),
            &mut record,
            &fixed_stamp(),
        );

        assert_eq!(record["id"], "custom");
        assert_eq!(record["created_at"], "2020-01-01T00:00:00Z");
        assert_eq!(record["updated_at"], "2024-05-01T12:30:00.123456789Z");
    }

    #[test]
    fn test_undeclared_columns_untouched() {
        let mut record = Record::new();
        fill_insert_defaults(&header(&["name"]), &mut record, &fixed_stamp());
        assert!(record.is_empty());

        touch_updated_at(&header(&["name"]), &mut record, &fixed_stamp());
        assert!(record.is_empty());
    }

    #[test]
    fn test_touch_overwrites() {
        let mut record = Record::new();
        record.insert("updated_at".into(), "old".into());
        touch_updated_at(&header(&["updated_at"]), &mut record, &fixed_stamp());
        assert_eq!(record["updated_at"], "2024-05-01T12:30:00.123456789Z");
    }
}
