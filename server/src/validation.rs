//! Input checks applied before any write reaches storage.
//!
//! All functions here are pure: the caller passes "now" in, so the
//! minute-truncation rule can be tested against fixed instants.

use chrono::{DateTime, DurationRound, NaiveDateTime, TimeDelta, Utc};

use crate::error::AppError;

pub const MAX_DESCRIPTION_CHARS: usize = 100;

pub const DESCRIPTION_TOO_LONG: &str = "タスクの内容は100文字以内にしてください";
pub const DUE_DATE_IN_PAST: &str = "期日に過去の日付が設定されています";

/// Parse an RFC 3339 timestamp and convert it to UTC. A timestamp without an
/// offset is taken to be UTC already.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(err) => raw
            .parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc())
            .map_err(|_| err),
    }
}

/// `now` with seconds and sub-seconds dropped.
pub fn truncate_to_minute(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(TimeDelta::minutes(1)).unwrap_or(now)
}

/// A due date is in the past when it falls before the start of the current
/// minute.
pub fn is_past_due(due: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    due < truncate_to_minute(now)
}

/// Length limit counts characters, not bytes.
pub fn description_within_limit(description: Option<&str>) -> bool {
    description.map_or(true, |text| text.chars().count() <= MAX_DESCRIPTION_CHARS)
}

/// Run both write-time checks in order: description first, then due date.
pub fn validate_item(
    description: Option<&str>,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if !description_within_limit(description) {
        return Err(AppError::Validation(DESCRIPTION_TOO_LONG.to_string()));
    }
    if is_past_due(due, now) {
        return Err(AppError::Validation(DUE_DATE_IN_PAST.to_string()));
    }
    Ok(())
}
