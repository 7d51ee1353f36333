//! Error types for the patro core.

use chrono::NaiveDate;

/// Error type for every fallible operation in the crate.
///
/// Lookup and conversion failures are ordinary values: callers decide how to
/// present them (an "N/A" label, an error state) and retry with another
/// candidate where that makes sense.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// The record source holds no record for the year.
    #[error("no calendar data for year {year}")]
    DataNotFound {
        /// The Nepali year that was requested.
        year: i32,
    },

    /// A record exists for the year but could not be parsed or failed validation.
    #[error("calendar data for year {year} is malformed: {reason}")]
    DataMalformed {
        /// The Nepali year of the broken record.
        year: i32,
        /// What was wrong with it.
        reason: String,
    },

    /// The Gregorian date precedes the reference epoch.
    #[error("date {date} is before the reference epoch {epoch}")]
    DateBeforeEpoch {
        /// The date that was asked for.
        date: NaiveDate,
        /// Gregorian side of the epoch.
        epoch: NaiveDate,
    },

    /// The epoch walk entered a Nepali year with no month-length table.
    #[error("nepali year {year} is not covered by the month-length tables")]
    UnsupportedYear {
        /// The year without a table.
        year: i32,
    },

    /// A rich-table search ran out of candidates.
    #[error("no day with gregorian day-of-month {target:?} in the searched months")]
    NoMatchInRichTable {
        /// The Gregorian day-of-month that was searched for.
        target: String,
    },

    /// The string contains a character that is neither a Devanagari nor an ASCII digit.
    #[error("invalid numeral {input:?}")]
    InvalidNumeral {
        /// The rejected input.
        input: String,
    },

    /// A month number outside 1..=12, or an unknown month name.
    #[error("invalid month: {month}")]
    InvalidMonth {
        /// The offending month as given.
        month: String,
    },

    /// A day outside the month it was paired with.
    #[error("invalid day: {day} for month {month} (max {max_day})")]
    InvalidDay {
        /// The invalid day number.
        day: u16,
        /// Month number 1..=12.
        month: u8,
        /// Length of that month.
        max_day: u16,
    },

    /// Filesystem failure in a record source or while installing a dataset.
    #[error("i/o error: {0}")]
    Io(String),

    /// A snapshot bundle could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl CalendarError {
    /// True for failures that mean "this year has no usable data".
    ///
    /// Malformed records count as absent for lookups; only diagnostics
    /// tell the two apart.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            CalendarError::DataNotFound { .. } | CalendarError::DataMalformed { .. }
        )
    }
}

impl From<std::io::Error> for CalendarError {
    fn from(e: std::io::Error) -> Self {
        CalendarError::Io(e.to_string())
    }
}

impl From<bincode::Error> for CalendarError {
    fn from(e: bincode::Error) -> Self {
        CalendarError::Snapshot(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_data_not_found() {
        let e = CalendarError::DataNotFound { year: 2090 };
        assert_eq!(e.to_string(), "no calendar data for year 2090");
    }

    #[test]
    fn error_data_malformed() {
        let e = CalendarError::DataMalformed {
            year: 2075,
            reason: "expected 12 months, got 11".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "calendar data for year 2075 is malformed: expected 12 months, got 11"
        );
    }

    #[test]
    fn error_date_before_epoch() {
        let e = CalendarError::DateBeforeEpoch {
            date: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
            epoch: NaiveDate::from_ymd_opt(2017, 4, 14).unwrap(),
        };
        assert_eq!(
            e.to_string(),
            "date 2016-01-01 is before the reference epoch 2017-04-14"
        );
    }

    #[test]
    fn error_invalid_numeral() {
        let e = CalendarError::InvalidNumeral {
            input: "१x".to_string(),
        };
        assert_eq!(e.to_string(), "invalid numeral \"१x\"");
    }

    #[test]
    fn error_invalid_day() {
        let e = CalendarError::InvalidDay {
            day: 33,
            month: 2,
            max_day: 32,
        };
        assert_eq!(e.to_string(), "invalid day: 33 for month 2 (max 32)");
    }

    #[test]
    fn absent_covers_missing_and_malformed() {
        assert!(CalendarError::DataNotFound { year: 1 }.is_absent());
        assert!(CalendarError::DataMalformed {
            year: 1,
            reason: String::new()
        }
        .is_absent());
        assert!(!CalendarError::UnsupportedYear { year: 1 }.is_absent());
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<CalendarError>();
    }
}
