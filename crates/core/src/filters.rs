//! Date-range filtering for submission listings.
//!
//! Query parameters arrive in the locale date format `MM/DD/YYYY`. Malformed
//! input is never an error: the affected bound degrades to "no filter"
//! (fail-open), matching the listing contract.

use chrono::{NaiveDate, NaiveTime, TimeDelta};

use crate::types::Timestamp;

/// Inclusive timestamp bounds for a submission query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Parse a `MM/DD/YYYY` query value. Empty, absent, or malformed input
/// yields `None` rather than an error.
pub fn parse_date_param(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()
}

/// Resolve `date_from`/`date_to` query values into timestamp bounds.
///
/// Submissions carry a time of day, so a same-day `date_to` must still
/// include that entire day: the upper bound is advanced one full day past
/// the given date's midnight.
pub fn submission_range(date_from: Option<&str>, date_to: Option<&str>) -> DateRange {
    let from = parse_date_param(date_from).map(|d| d.and_time(NaiveTime::MIN).and_utc());
    let to = parse_date_param(date_to)
        .map(|d| (d.and_time(NaiveTime::MIN) + TimeDelta::days(1)).and_utc());
    DateRange { from, to }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_locale_dates() {
        assert_eq!(
            parse_date_param(Some("12/31/2013")),
            NaiveDate::from_ymd_opt(2013, 12, 31)
        );
    }

    #[test]
    fn malformed_input_fails_open() {
        assert_eq!(parse_date_param(Some("2013-12-31")), None);
        assert_eq!(parse_date_param(Some("31/12/2013")), None);
        assert_eq!(parse_date_param(Some("yesterday")), None);
        assert_eq!(parse_date_param(Some("")), None);
        assert_eq!(parse_date_param(None), None);
    }

    #[test]
    fn date_to_includes_the_whole_day() {
        let range = submission_range(None, Some("12/31/2013"));
        // A submission at 2013-12-31T23:59 must survive the filter.
        let late = Utc.with_ymd_and_hms(2013, 12, 31, 23, 59, 0).unwrap();
        assert!(late <= range.to.unwrap());
        // One at 2014-01-01T12:00 must not.
        let next_year = Utc.with_ymd_and_hms(2014, 1, 1, 12, 0, 0).unwrap();
        assert!(next_year > range.to.unwrap());
    }

    #[test]
    fn one_sided_and_unbounded_ranges() {
        let range = submission_range(Some("01/01/2014"), None);
        assert_eq!(
            range.from,
            Some(Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(range.to, None);

        assert!(submission_range(None, None).is_unbounded());
        // A malformed bound degrades that bound only.
        let range = submission_range(Some("bogus"), Some("01/02/2014"));
        assert_eq!(range.from, None);
        assert!(range.to.is_some());
    }
}
