//! Record normalization.
//!
//! Converts raw point-summary JSON from the backend into [`PointRecord`]s.
//! The backend nests the nation and base event:
//!
//! ```json
//! { "id": 17, "nation": { "id": 2, "nation": "Impact" },
//!   "baseEvent": { "id": 1, "name": "Sunday Service" },
//!   "weekNumber": 23, "month": 6, "year": 2025, "dateCaptured": "2025-06-08",
//!   "points": 10, "numberOfPeople": 12, "totalPointsEarnedPerWeek": 120 }
//! ```
//!
//! Flat aliases (`nationId`, `nationName`, `eventName`, `pointsPerPerson`,
//! `totalPointsEarned`) are accepted too. Unknown fields are ignored.
//! A record with a missing or non-numeric required field is rejected and the
//! rest of the batch continues.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{NationId, PointRecord};

/// Why a single raw record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum MalformedRecord {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' is not an integer: {value}")]
    NonNumeric { field: &'static str, value: String },

    #[error("field '{field}' out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

/// A rejected record and its position in the fetched batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejected {
    pub index: usize,
    pub reason: MalformedRecord,
}

/// Result of normalizing a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeOutcome {
    /// Valid records in fetch order
    pub records: Vec<PointRecord>,

    pub rejected: Vec<Rejected>,
}

impl NormalizeOutcome {
    pub fn skipped(&self) -> usize {
        self.rejected.len()
    }
}

const ID: &[&[&str]] = &[&["id"]];
const NATION_ID: &[&[&str]] = &[&["nation", "id"], &["nationId"]];
const NATION_NAME: &[&[&str]] = &[&["nation", "nation"], &["nation", "name"], &["nationName"]];
const EVENT_NAME: &[&[&str]] = &[&["baseEvent", "name"], &["eventName"]];
const WEEK: &[&[&str]] = &[&["weekNumber"]];
const MONTH: &[&[&str]] = &[&["month"]];
const YEAR: &[&[&str]] = &[&["year"]];
const DATE: &[&[&str]] = &[&["dateCaptured"]];
const POINTS_PER_PERSON: &[&[&str]] = &[&["points"], &["pointsPerPerson"]];
const PEOPLE: &[&[&str]] = &[&["numberOfPeople"]];
const TOTAL_POINTS: &[&[&str]] = &[&["totalPointsEarnedPerWeek"], &["totalPointsEarned"]];

/// Normalize a fetched batch, dropping malformed records.
pub fn normalize(raw: &[Value]) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    for (index, value) in raw.iter().enumerate() {
        match normalize_record(value) {
            Ok(record) => outcome.records.push(record),
            Err(reason) => {
                warn!("Skipping point record #{}: {}", index, reason);
                outcome.rejected.push(Rejected { index, reason });
            }
        }
    }

    debug!(
        "Normalized {} point records ({} skipped)",
        outcome.records.len(),
        outcome.skipped()
    );
    outcome
}

/// Normalize one raw record.
pub fn normalize_record(raw: &Value) -> Result<PointRecord, MalformedRecord> {
    let obj = raw.as_object().ok_or(MalformedRecord::NotAnObject)?;

    let nation_id = required_unsigned(obj, NATION_ID, "nationId")?;
    let week_number = required_u32(obj, WEEK, "weekNumber")?;
    let month = required_u32(obj, MONTH, "month")?;
    if !(1..=12).contains(&month) {
        return Err(MalformedRecord::OutOfRange {
            field: "month",
            value: i64::from(month),
        });
    }
    let year = required_u32(obj, YEAR, "year")?;
    let number_of_people = required_u32(obj, PEOPLE, "numberOfPeople")?;
    let total_points_earned = required_integer(obj, TOTAL_POINTS, "totalPointsEarned")?;

    Ok(PointRecord {
        id: optional_integer(obj, ID, "id").and_then(|id| u64::try_from(id).ok()),
        nation_id: NationId::new(nation_id),
        nation_name: optional_string(obj, NATION_NAME),
        event_name: optional_string(obj, EVENT_NAME),
        week_number,
        month,
        year,
        date_captured: optional_date(obj),
        points_per_person: optional_integer(obj, POINTS_PER_PERSON, "pointsPerPerson"),
        number_of_people,
        total_points_earned,
    })
}

/// First non-null value found along any of the paths.
fn lookup<'a>(obj: &'a Map<String, Value>, paths: &[&[&str]]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        let (first, rest) = path.split_first()?;
        let mut current = obj.get(*first)?;
        for segment in rest {
            current = current.as_object()?.get(*segment)?;
        }
        (!current.is_null()).then_some(current)
    })
}

/// Integer value of a JSON number; floats are accepted only when whole.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn required_integer(
    obj: &Map<String, Value>,
    paths: &[&[&str]],
    field: &'static str,
) -> Result<i64, MalformedRecord> {
    let value = lookup(obj, paths).ok_or(MalformedRecord::MissingField(field))?;
    as_integer(value).ok_or_else(|| MalformedRecord::NonNumeric {
        field,
        value: value.to_string(),
    })
}

fn required_unsigned(
    obj: &Map<String, Value>,
    paths: &[&[&str]],
    field: &'static str,
) -> Result<u64, MalformedRecord> {
    let value = required_integer(obj, paths, field)?;
    u64::try_from(value).map_err(|_| MalformedRecord::OutOfRange { field, value })
}

fn required_u32(
    obj: &Map<String, Value>,
    paths: &[&[&str]],
    field: &'static str,
) -> Result<u32, MalformedRecord> {
    let value = required_integer(obj, paths, field)?;
    u32::try_from(value).map_err(|_| MalformedRecord::OutOfRange { field, value })
}

fn optional_integer(obj: &Map<String, Value>, paths: &[&[&str]], field: &str) -> Option<i64> {
    let value = lookup(obj, paths)?;
    let parsed = as_integer(value);
    if parsed.is_none() {
        debug!("Ignoring non-integer optional field '{}': {}", field, value);
    }
    parsed
}

fn optional_string(obj: &Map<String, Value>, paths: &[&[&str]]) -> Option<String> {
    lookup(obj, paths)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn optional_date(obj: &Map<String, Value>) -> Option<NaiveDate> {
    let raw = lookup(obj, DATE)?.as_str()?;
    // Timestamps such as "2025-06-08T10:00:00" carry the date in the first 10 chars.
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Ignoring unparsable dateCaptured '{}': {}", raw, e);
            None
        }
    }
}
