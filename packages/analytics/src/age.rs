//! Age derived from the extracted birth date.

use chrono::{Datelike as _, NaiveDate};
use transcript_metrics_transcript_models::{Cell, FieldValue};

/// Birth date layout printed on transcripts.
pub const BIRTH_DATE_FORMAT: &str = "%d/%m/%Y";

/// Whole years between `birth_date` (`DD/MM/YYYY`) and `today`.
///
/// Returns `None` if the date does not parse.
#[must_use]
pub fn age_on(birth_date: &str, today: NaiveDate) -> Option<i32> {
    let birth = NaiveDate::parse_from_str(birth_date, BIRTH_DATE_FORMAT).ok()?;
    let before_birthday = (today.month(), today.day()) < (birth.month(), birth.day());
    Some(today.year() - birth.year() - i32::from(before_birthday))
}

/// Report cell for the age, or [`Cell::NotFound`] when the birth date is
/// missing or malformed.
#[must_use]
pub fn age_cell(birth_date: &FieldValue, today: NaiveDate) -> Cell {
    birth_date
        .found()
        .and_then(|date| age_on(date, today))
        .map_or(Cell::NotFound, |age| Cell::Integer(i64::from(age)))
}
