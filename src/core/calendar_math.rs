//! Day counting from the reference epoch and day-by-day table search.

use crate::core::converter::numeral_to_arabic;
use crate::core::types::{CoarseYear, DayCell, Month, NepaliDate, RichYear};
use crate::error::CalendarError;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A known pair of equal dates anchoring the forward walk.
///
/// Changing it invalidates every coarse conversion made from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceEpoch {
    pub nepali_year: i32,
    pub nepali_month: Month,
    pub nepali_day: u16,
    pub gregorian: NaiveDate,
}

impl ReferenceEpoch {
    /// Baishakh 1, 2074 = 14 April 2017.
    pub fn standard() -> Self {
        Self {
            nepali_year: 2074,
            nepali_month: Month::Baishakh,
            nepali_day: 1,
            gregorian: NaiveDate::from_ymd_opt(2017, 4, 14).expect("2017-04-14 is a valid date"),
        }
    }

    pub fn nepali(&self) -> NepaliDate {
        NepaliDate::from_parts(self.nepali_year, self.nepali_month, self.nepali_day)
    }
}

impl Default for ReferenceEpoch {
    fn default() -> Self {
        Self::standard()
    }
}

/// Month lengths for 2074 through 2089.
#[rustfmt::skip]
const BUILTIN_MONTH_LENGTHS: [(i32, [u16; 12]); 16] = [
    (2074, [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30]),
    (2075, [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30]),
    (2076, [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30]),
    (2077, [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31]),
    (2078, [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30]),
    (2079, [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30]),
    (2080, [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30]),
    (2081, [31, 31, 32, 32, 31, 30, 30, 30, 29, 30, 30, 30]),
    (2082, [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30]),
    (2083, [31, 31, 32, 31, 31, 30, 30, 30, 29, 30, 30, 30]),
    (2084, [31, 31, 32, 31, 31, 30, 30, 30, 29, 30, 30, 30]),
    (2085, [31, 32, 31, 32, 30, 31, 30, 30, 29, 30, 30, 30]),
    (2086, [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30]),
    (2087, [31, 31, 32, 31, 31, 31, 30, 30, 29, 30, 30, 30]),
    (2088, [30, 31, 32, 32, 30, 31, 30, 30, 29, 30, 30, 30]),
    (2089, [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30]),
];

/// Month-length tables keyed by Nepali year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoarseTables {
    years: BTreeMap<i32, CoarseYear>,
}

impl CoarseTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tables compiled into the crate.
    pub fn builtin() -> Self {
        let years = BUILTIN_MONTH_LENGTHS
            .iter()
            .map(|&(year, months)| (year, CoarseYear::new(months)))
            .collect();
        Self { years }
    }

    /// Adds or replaces the table for `year`.
    pub fn insert(&mut self, year: i32, table: CoarseYear) {
        self.years.insert(year, table);
    }

    pub fn get(&self, year: i32) -> Option<&CoarseYear> {
        self.years.get(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }
}

/// Converts a Gregorian date by walking month lengths forward from the epoch.
///
/// Dates before the epoch are refused rather than walked backwards. Every
/// Nepali year the walk enters must have a table in `tables`.
pub fn epoch_forward_convert(
    date: NaiveDate,
    epoch: &ReferenceEpoch,
    tables: &CoarseTables,
) -> Result<NepaliDate, CalendarError> {
    let offset = (date - epoch.gregorian).num_days();
    if offset < 0 {
        return Err(CalendarError::DateBeforeEpoch {
            date,
            epoch: epoch.gregorian,
        });
    }
    if offset == 0 {
        return Ok(epoch.nepali());
    }

    let table_for = |year: i32| {
        tables
            .get(year)
            .ok_or(CalendarError::UnsupportedYear { year })
    };

    let mut year = epoch.nepali_year;
    let mut month = epoch.nepali_month;
    let mut day = i64::from(epoch.nepali_day);
    let mut remaining = offset;

    // One step per month, so the loop is bounded by months spanned, not days.
    while remaining > 0 {
        let days_in_month = i64::from(table_for(year)?.days_in(month));
        let left_in_month = days_in_month - day + 1;
        if remaining < left_in_month {
            day += remaining;
            remaining = 0;
        } else {
            remaining -= left_in_month;
            day = 1;
            month = month.succ();
            if month == Month::Baishakh {
                year += 1;
            }
        }
    }
    // The year landed on must be known too, not only the ones walked through.
    table_for(year)?;

    Ok(NepaliDate::from_parts(year, month, day as u16))
}

/// Which part of a Nepali month to scan.
///
/// A Nepali month straddles two Gregorian months. Cells before the point
/// where the Gregorian day wraps back to a smaller number belong to the
/// first of them, cells from that point on to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthSpan {
    Whole,
    BeforeRollover,
    AfterRollover,
}

/// One month to scan in [`search_rich_table`].
#[derive(Debug, Clone, Copy)]
pub struct SearchCandidate<'a> {
    pub year: i32,
    pub month: Month,
    pub span: MonthSpan,
    pub table: &'a RichYear,
}

/// Finds the first non-padding cell whose Gregorian day equals `target_en_day`.
///
/// Candidates are scanned in the order given and the first hit wins, so the
/// caller narrows them to the months that can plausibly hold the date.
pub fn search_rich_table(
    target_en_day: &str,
    candidates: &[SearchCandidate<'_>],
) -> Result<NepaliDate, CalendarError> {
    let target = numeral_to_arabic(target_en_day)?;
    for candidate in candidates {
        let cells = candidate.table.month(candidate.month);
        let (start, end) = span_bounds(cells, candidate.span);
        let hit = cells[start..end]
            .iter()
            .filter(|cell| !cell.is_padding())
            .find(|cell| numeral_to_arabic(&cell.en).is_ok_and(|en| en == target));
        if let Some(cell) = hit {
            return NepaliDate::from_cell(candidate.year, candidate.month, cell);
        }
    }
    Err(CalendarError::NoMatchInRichTable {
        target: target_en_day.to_string(),
    })
}

fn span_bounds(cells: &[DayCell], span: MonthSpan) -> (usize, usize) {
    let rollover = rollover_index(cells).unwrap_or(cells.len());
    match span {
        MonthSpan::Whole => (0, cells.len()),
        MonthSpan::BeforeRollover => (0, rollover),
        MonthSpan::AfterRollover => (rollover, cells.len()),
    }
}

/// Index of the first cell whose Gregorian day is smaller than the one
/// before it.
fn rollover_index(cells: &[DayCell]) -> Option<usize> {
    let mut previous: Option<u32> = None;
    for (i, cell) in cells.iter().enumerate() {
        if cell.is_padding() {
            continue;
        }
        let Ok(en) = numeral_to_arabic(&cell.en) else {
            continue;
        };
        if previous.is_some_and(|p| en < p) {
            return Some(i);
        }
        previous = Some(en);
    }
    None
}
