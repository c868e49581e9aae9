//! Display formatting for prices and dates.

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// `$` plus two decimals.
#[must_use]
pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Calendar date (`YYYY-MM-DD`) of an RFC 3339 timestamp. Anything that does
/// not parse is shown as sent.
#[must_use]
pub fn display_date(raw: &str) -> String {
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|at| at.format(format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or_else(|| raw.to_owned())
}
