use time::format_description::BorrowedFormatItem;
use time::Date;

use crate::ValidationError;

const ISO_DATE_FORMAT: &str = "[year]-[month]-[day]";

/// Parse a `YYYY-MM-DD` calendar date, the wire and storage form used
/// throughout.
pub fn parse_iso_date(value: &str) -> Result<Date, ValidationError> {
    let format: Vec<BorrowedFormatItem<'_>> =
        time::format_description::parse(ISO_DATE_FORMAT).expect("static date format is valid");
    Date::parse(value.trim(), &format).map_err(|_| ValidationError::InvalidDate {
        value: value.to_owned(),
    })
}
