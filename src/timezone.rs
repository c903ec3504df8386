//! Resolves canonical timezone names to UTC offsets for "today" computations.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset for `canonical_timezone`, e.g. "Europe/Berlin".
///
/// Returns `None` if the timezone name is not recognised.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current date in `canonical_timezone`, falling back to UTC if the
/// timezone name is not recognised.
pub fn today_in(canonical_timezone: &str) -> Date {
    let offset = get_local_offset(canonical_timezone).unwrap_or(UtcOffset::UTC);

    OffsetDateTime::now_utc().to_offset(offset).date()
}

#[cfg(test)]
mod timezone_tests {
    use super::get_local_offset;

    #[test]
    fn resolves_canonical_timezone() {
        assert!(get_local_offset("Europe/Berlin").is_some());
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert!(get_local_offset("Mars/OlympusMons").is_none());
    }
}
