use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::domain::ValidationWarning;

fn parse_naive_datetime(raw: &str) -> Option<Date> {
    for fmt in [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    ] {
        if let Ok(pdt) = PrimitiveDateTime::parse(raw, fmt) {
            return Some(pdt.date());
        }
    }
    None
}

/// Normalize a record's `publishedAt` into a calendar date.
///
/// Contract:
/// - `YYYY-MM-DD` parses silently.
/// - RFC3339 timestamps are converted to UTC and truncated to the date.
/// - Timestamps without an offset are accepted as UTC with an explicit warning.
/// - Anything else yields `None` plus a warning; the caller decides whether to skip the record.
pub fn normalize_published_at(
    field: &str,
    raw_input: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<Date> {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        warnings.push(ValidationWarning::new(
            "CORPUS_RECORD_BAD_DATE",
            format!("Empty date for {field}"),
        ));
        return None;
    }

    if let Ok(d) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Some(d);
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(dt.to_offset(UtcOffset::UTC).date());
    }

    if let Some(d) = parse_naive_datetime(trimmed) {
        warnings.push(
            ValidationWarning::new(
                "CORPUS_DATE_TZ_ASSUMED_UTC",
                format!("Assumed UTC timezone for {field}"),
            )
            .with_details(format!("value={trimmed}")),
        );
        return Some(d);
    }

    warnings.push(
        ValidationWarning::new(
            "CORPUS_RECORD_BAD_DATE",
            format!("Unparseable date for {field}"),
        )
        .with_details(format!("raw={trimmed}")),
    );
    None
}
