//! Listing availability calendars.
//!
//! A calendar is a JSON object of `YYYY-MM-DD` keys to booleans. Dates not in
//! the calendar are open.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use voyage_common::{AppError, AppResult};

/// Fail with a state conflict if the calendar closes any date a booking
/// occupies: every night in `[start, end)` of a stay, or `start` alone.
///
/// Walks the closed calendar entries rather than the nights of the stay.
pub fn ensure_available(
    calendar: &Value,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> AppResult<()> {
    let Some(map) = calendar.as_object() else {
        return Ok(());
    };

    let closed = map
        .iter()
        .filter(|(_, open)| open.as_bool() == Some(false))
        .filter_map(|(key, _)| NaiveDate::parse_from_str(key, "%Y-%m-%d").ok())
        .filter(|date| match end {
            Some(end) if end > start => (start..end).contains(date),
            _ => *date == start,
        })
        .min();

    match closed {
        Some(date) => Err(AppError::StateConflict(format!(
            "Not available on {}",
            date.format("%Y-%m-%d")
        ))),
        None => Ok(()),
    }
}

/// Validate a calendar submitted by an owner and normalize it to an object.
pub fn normalize_calendar(calendar: Option<Value>) -> AppResult<Value> {
    let Some(calendar) = calendar else {
        return Ok(Value::Object(Map::new()));
    };

    let Value::Object(map) = calendar else {
        return Err(AppError::invalid_field(
            "availability",
            "must be an object of dates to booleans",
        ));
    };

    for (key, value) in &map {
        if NaiveDate::parse_from_str(key, "%Y-%m-%d").is_err() {
            return Err(AppError::invalid_field(
                "availability",
                format!("'{key}' is not a YYYY-MM-DD date"),
            ));
        }
        if !value.is_boolean() {
            return Err(AppError::invalid_field(
                "availability",
                format!("value for {key} must be true or false"),
            ));
        }
    }

    Ok(Value::Object(map))
}
