//! Date filter normalization
//!
//! The transactions endpoint filters on `valueDate` in `YYYY-MM-DD` form.
//! Callers may pass:
//! - ISO dates: `2024-01-15`
//! - RFC 3339 timestamps: `2024-01-15T10:30:00Z` (date in the given offset)
//! - Relative days: `-7d` (seven days before today)

use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::errors::DateError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize `input` relative to the current local date.
pub fn parse_date(input: &str) -> Result<String, DateError> {
    normalize_date(input, Local::now().date_naive())
}

/// Normalize `input` relative to `today`.
pub fn normalize_date(input: &str, today: NaiveDate) -> Result<String, DateError> {
    let input = input.trim();

    if let Some(days) = input.strip_prefix('-').and_then(|rest| rest.strip_suffix('d')) {
        if days.is_empty() || !days.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError::InvalidRelative(input.to_string()));
        }
        let days: i64 =
            days.parse().map_err(|_| DateError::InvalidRelative(input.to_string()))?;
        let date = Duration::try_days(days)
            .and_then(|delta| today.checked_sub_signed(delta))
            .ok_or_else(|| DateError::InvalidRelative(input.to_string()))?;
        return Ok(date.format(DATE_FORMAT).to_string());
    }

    if NaiveDate::parse_from_str(input, DATE_FORMAT).is_ok() {
        return Ok(input.to_string());
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.date_naive().format(DATE_FORMAT).to_string());
    }

    Err(DateError::Unsupported(input.to_string()))
}
