// Date/field validators - raw scalars in, typed values or None out.
// These are total functions: no input, however malformed, raises an error.

use chrono::NaiveDate;

/// Parse a compact 8-digit calendar date (YYYYMMDD).
/// Anything else - wrong length, non-numeric text, zero, impossible
/// calendar dates like 20210230 - yields None.
pub fn compact_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Numeric form of [`compact_date`]. Source systems often store these
/// dates as integers with 0 standing in for "unknown".
pub fn compact_date_i64(raw: Option<i64>) -> Option<NaiveDate> {
    let value = raw?;
    if value <= 0 {
        return None;
    }
    compact_date(&value.to_string())
}

/// Parse an ISO `YYYY-MM-DD` date string.
pub fn iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Bounds-check a birth date: must lie in [1925-01-01, today].
/// Out-of-range values (future dates, implausibly old ones) become None.
pub fn birthdate(raw: Option<NaiveDate>, today: NaiveDate) -> Option<NaiveDate> {
    let date = raw?;
    let earliest = NaiveDate::from_ymd_opt(1925, 1, 1)?;
    if date < earliest || date > today {
        return None;
    }
    Some(date)
}
