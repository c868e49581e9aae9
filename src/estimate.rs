//! Booking cost estimate shown next to the booking form.
//!
//! The figure is advisory. The server prices the booking itself and its
//! answer wins; this only gives the renter a number while they pick dates.

#[cfg(test)]
#[path = "estimate_test.rs"]
mod tests;

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::PrimitiveDateTime;

const DAY_MS: i128 = 24 * 60 * 60 * 1000;

/// Format of a `datetime-local` input value, seconds optional.
const LOCAL_INPUT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute][optional [:[second]]]");

/// Why an estimate does not allow submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// Dates unset, or return not after pickup.
    NoDuration,
    /// A real duration priced at nothing.
    NoCharge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub days: u64,
    pub total: f64,
}

impl Estimate {
    pub const ZERO: Self = Self { days: 0, total: 0.0 };

    /// Submission is allowed only for a positive total.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.total > 0.0
    }

    #[must_use]
    pub fn blocked(&self) -> Option<Blocked> {
        if self.days == 0 {
            Some(Blocked::NoDuration)
        } else if !self.can_submit() {
            Some(Blocked::NoCharge)
        } else {
            None
        }
    }
}

/// Whole rental days between `start` and `end`, any partial day counted as
/// a full one, priced at `daily_rate`.
///
/// Unset inputs, or an `end` not strictly after `start`, give
/// [`Estimate::ZERO`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimate(start: Option<PrimitiveDateTime>, end: Option<PrimitiveDateTime>, daily_rate: f64) -> Estimate {
    let (Some(start), Some(end)) = (start, end) else {
        return Estimate::ZERO;
    };
    if !daily_rate.is_finite() || daily_rate < 0.0 {
        return Estimate::ZERO;
    }

    let elapsed_ms = (end - start).whole_milliseconds();
    if elapsed_ms <= 0 {
        return Estimate::ZERO;
    }

    let days = u64::try_from((elapsed_ms + DAY_MS - 1) / DAY_MS).unwrap_or(u64::MAX);
    Estimate { days, total: days as f64 * daily_rate }
}

/// Parse a `YYYY-MM-DDTHH:MM[:SS]` form value. Blank or malformed input is
/// treated as unset.
#[must_use]
pub fn parse_local(input: &str) -> Option<PrimitiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    PrimitiveDateTime::parse(input, LOCAL_INPUT).ok()
}

/// RFC 3339 timestamp for the booking request. Form values carry no zone and
/// are sent as UTC.
///
/// # Errors
///
/// Returns an error if the date cannot be represented in RFC 3339 (years
/// outside 0000–9999).
pub fn to_rfc3339(at: PrimitiveDateTime) -> Result<String, time::error::Format> {
    at.assume_utc().format(&Rfc3339)
}
