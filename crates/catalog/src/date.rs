//! Release date normalization.

use std::sync::LazyLock;

use chrono::{Datelike, Month, NaiveDate};
use regex_lite::Regex;

static ORDINAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(st|nd|rd|th)").expect("ordinal suffix pattern is valid")
});

const RELEASE_DATE_FORMAT: &str = "%B %d, %Y";

/// Parse a catalog date such as `"March 3rd, 1986"`.
///
/// Ordinal suffixes after a digit run are dropped, then the text must match
/// `<Month name> <day>, <year>` with the month spelled out in full
/// (chrono's `%B` alone also accepts "Mar"). Anything else is `None`.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = ORDINAL_SUFFIX.replace_all(raw, "${1}");
    let cleaned = cleaned.trim();
    let date = NaiveDate::parse_from_str(cleaned, RELEASE_DATE_FORMAT).ok()?;
    let month = Month::try_from(u8::try_from(date.month()).ok()?).ok()?;
    let written = cleaned.split_whitespace().next()?;
    written.eq_ignore_ascii_case(month.name()).then_some(date)
}
