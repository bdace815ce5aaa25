//! Amount, category, and date normalization
//!
//! Everything here is total: malformed input degrades to a default instead of
//! failing. The insight engine, the store, and the entry forms all share these
//! helpers so a value is interpreted the same way everywhere.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use crate::models::{EntryType, RawAmount, RawTransaction, Transaction, DEFAULT_CATEGORY};

/// Default display offset: IST, UTC+05:30
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Build a display offset from minutes east of UTC, falling back to UTC when out of range
pub fn display_offset(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Coerce a stored amount to a number
///
/// Text is trimmed and parsed. Missing, blank, unparseable, and non-finite values
/// all become `0.0`.
pub fn coerce_amount(raw: Option<&RawAmount>) -> f64 {
    let value = match raw {
        Some(RawAmount::Number(n)) => *n,
        Some(RawAmount::Text(s)) => parse_amount_text(s),
        None => 0.0,
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse user-entered amount text, `0.0` on failure
pub fn parse_amount_text(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Missing or empty categories become [`DEFAULT_CATEGORY`]
pub fn normalize_category(raw: Option<&str>) -> String {
    match raw {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

/// Calendar month key (`YYYY-MM`) of a timestamp in the display timezone
pub fn month_key(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%Y-%m").to_string()
}

/// Human-readable timestamp in the display timezone
pub fn format_timestamp(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Parse a date submitted with an entry form
///
/// Accepts `YYYY-MM-DD` (midnight in the display timezone), RFC 3339, or a naive
/// `YYYY-MM-DDTHH:MM[:SS]` read in the display timezone. Returns `None` for blank
/// or unparseable input.
pub fn parse_entry_date(input: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if !input.contains('T') {
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
        return local_to_utc(date.and_hms_opt(0, 0, 0)?, offset);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .and_then(|naive| local_to_utc(naive, offset))
}

/// Parse a timestamp as stored in the database
///
/// Stored values are RFC 3339; SQLite's own `YYYY-MM-DD HH:MM:SS` is read as UTC.
pub fn parse_stored_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn local_to_utc(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

impl Transaction {
    /// Build a normalized working copy of a raw record
    ///
    /// `now` stands in for a missing date so that one analysis pass uses a single
    /// consistent clock reading.
    pub fn normalize(raw: &RawTransaction, now: DateTime<Utc>) -> Self {
        Self {
            entry_type: raw
                .entry_type
                .as_deref()
                .map(EntryType::from_label)
                .unwrap_or_else(|| EntryType::Other(String::new())),
            amount: coerce_amount(raw.amount.as_ref()),
            category: normalize_category(raw.category.as_deref()),
            description: raw.description.clone().unwrap_or_default(),
            date: raw.date.unwrap_or(now),
        }
    }
}

/// Normalize a whole list, leaving the input untouched
pub fn normalize_all(raw: &[RawTransaction], now: DateTime<Utc>) -> Vec<Transaction> {
    raw.iter().map(|t| Transaction::normalize(t, now)).collect()
}
