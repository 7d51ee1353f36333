// src/core/types.rs
use crate::core::converter::{arabic_to_numeral, numeral_to_arabic};
use crate::error::CalendarError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The twelve Bikram Sambat months in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Baishakh,
    Jestha,
    Ashadh,
    Shrawan,
    Bhadra,
    Ashwin,
    Kartik,
    Mangsir,
    Poush,
    Magh,
    Falgun,
    Chaitra,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Baishakh,
        Month::Jestha,
        Month::Ashadh,
        Month::Shrawan,
        Month::Bhadra,
        Month::Ashwin,
        Month::Kartik,
        Month::Mangsir,
        Month::Poush,
        Month::Magh,
        Month::Falgun,
        Month::Chaitra,
    ];

    /// Month number, 1 for Baishakh through 12 for Chaitra.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Zero-based position, for indexing the per-month arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_number(n: u8) -> Result<Self, CalendarError> {
        match n {
            1..=12 => Ok(Self::ALL[n as usize - 1]),
            _ => Err(CalendarError::InvalidMonth {
                month: n.to_string(),
            }),
        }
    }

    /// Canonical name as used for the keys of the rich year records.
    pub fn name(self) -> &'static str {
        match self {
            Month::Baishakh => "Baishakh",
            Month::Jestha => "Jestha",
            Month::Ashadh => "Ashadh",
            Month::Shrawan => "Shrawan",
            Month::Bhadra => "Bhadra",
            Month::Ashwin => "Ashwin",
            Month::Kartik => "Kartik",
            Month::Mangsir => "Mangsir",
            Month::Poush => "Poush",
            Month::Magh => "Magh",
            Month::Falgun => "Falgun",
            Month::Chaitra => "Chaitra",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CalendarError> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == name)
            .ok_or_else(|| CalendarError::InvalidMonth {
                month: name.to_string(),
            })
    }

    /// The following month; Chaitra wraps to Baishakh.
    pub fn succ(self) -> Self {
        Self::ALL[(self.index() + 1) % 12]
    }

    /// The preceding month; Baishakh wraps to Chaitra.
    pub fn pred(self) -> Self {
        Self::ALL[(self.index() + 11) % 12]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weekday tag of a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// Column in a Sunday-first week, 0..=6.
    pub fn column(self) -> u8 {
        self as u8
    }

    pub fn succ(self) -> Self {
        const ORDER: [Weekday; 7] = [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ];
        ORDER[(self.column() as usize + 1) % 7]
    }
}

/// One slot of a month grid in a rich year record.
///
/// Padding slots align the first and last week to seven columns; they have
/// empty `np` and `en`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    /// Day of the Nepali month in Devanagari digits, empty for padding.
    pub np: String,
    /// Gregorian day of month, empty for padding.
    pub en: String,
    #[serde(default)]
    pub tithi: String,
    #[serde(default)]
    pub event: String,
    pub day: Weekday,
    #[serde(default)]
    pub holiday: bool,
    #[serde(default)]
    pub specialday: bool,
}

impl DayCell {
    pub fn is_padding(&self) -> bool {
        self.np.is_empty()
    }
}

/// Month lengths of one Nepali year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoarseYear {
    months: [u16; 12],
}

impl CoarseYear {
    pub fn new(months: [u16; 12]) -> Self {
        Self { months }
    }

    pub fn days_in(&self, month: Month) -> u16 {
        self.months[month.index()]
    }

    pub fn month_lengths(&self) -> &[u16; 12] {
        &self.months
    }

    pub fn total_days(&self) -> u32 {
        self.months.iter().map(|&d| u32::from(d)).sum()
    }
}

/// Day-by-day grid of one Nepali year, indexed by [`Month`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichYear {
    months: [Vec<DayCell>; 12],
}

impl RichYear {
    /// Wraps already validated month grids. See [`crate::core::record`] for
    /// the checked path from raw records.
    pub(crate) fn new(months: [Vec<DayCell>; 12]) -> Self {
        Self { months }
    }

    pub fn month(&self, month: Month) -> &[DayCell] {
        &self.months[month.index()]
    }

    /// The cell holding day `day` of `month`, if present.
    pub fn day_cell(&self, month: Month, day: u16) -> Option<&DayCell> {
        self.month(month)
            .iter()
            .filter(|cell| !cell.is_padding())
            .nth(usize::from(day).checked_sub(1)?)
    }

    /// False when some month has no days, as happens when the scrape of
    /// that month failed.
    pub fn is_complete(&self) -> bool {
        self.months.iter().all(|cells| cells.iter().any(|c| !c.is_padding()))
    }

    /// Month lengths derived from the non-padding cells.
    pub fn coarse(&self) -> CoarseYear {
        let mut months = [0u16; 12];
        for (len, cells) in months.iter_mut().zip(self.months.iter()) {
            *len = cells.iter().filter(|c| !c.is_padding()).count() as u16;
        }
        CoarseYear::new(months)
    }
}

/// A validated year record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearTable {
    Coarse(CoarseYear),
    Rich(RichYear),
}

impl YearTable {
    /// Month lengths, whichever shape the record has. `None` for a rich
    /// year with an empty month.
    pub fn month_lengths(&self) -> Option<CoarseYear> {
        match self {
            YearTable::Coarse(c) => Some(*c),
            YearTable::Rich(r) => r.is_complete().then(|| r.coarse()),
        }
    }

    pub fn as_rich(&self) -> Option<&RichYear> {
        match self {
            YearTable::Rich(r) => Some(r),
            YearTable::Coarse(_) => None,
        }
    }
}

/// Annotations only available when a date was found in a rich table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAnnotations {
    pub weekday: Weekday,
    pub holiday: bool,
    pub event: Option<String>,
    pub tithi: Option<String>,
}

impl From<&DayCell> for DayAnnotations {
    fn from(cell: &DayCell) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            weekday: cell.day,
            holiday: cell.holiday,
            event: non_empty(&cell.event),
            tithi: non_empty(&cell.tithi),
        }
    }
}

/// A date in the Bikram Sambat calendar.
///
/// Equality, ordering and hashing only look at year, month and day.
#[derive(Debug, Clone)]
pub struct NepaliDate {
    year: i32,
    month: Month,
    day: u16,
    day_numeral: Option<String>,
    annotations: Option<DayAnnotations>,
}

impl NepaliDate {
    /// Creates a date from a month number 1..=12 and a day >= 1.
    ///
    /// The upper bound of `day` is only known against a year table; see
    /// [`NepaliDate::new_in`].
    pub fn new(year: i32, month: u8, day: u16) -> Result<Self, CalendarError> {
        let month = Month::from_number(month)?;
        if day == 0 {
            return Err(CalendarError::InvalidDay {
                day,
                month: month.number(),
                max_day: 0,
            });
        }
        Ok(Self::from_parts(year, month, day))
    }

    /// Like [`NepaliDate::new`], also checking `day` against the month length.
    pub fn new_in(year: i32, month: u8, day: u16, table: &CoarseYear) -> Result<Self, CalendarError> {
        let date = Self::new(year, month, day)?;
        let max_day = table.days_in(date.month);
        if day > max_day {
            return Err(CalendarError::InvalidDay { day, month, max_day });
        }
        Ok(date)
    }

    pub(crate) fn from_parts(year: i32, month: Month, day: u16) -> Self {
        Self {
            year,
            month,
            day,
            day_numeral: None,
            annotations: None,
        }
    }

    /// Builds a date from a rich-table cell that passed validation.
    pub(crate) fn from_cell(year: i32, month: Month, cell: &DayCell) -> Result<Self, CalendarError> {
        let day = numeral_to_arabic(&cell.np)?;
        let day = u16::try_from(day).map_err(|_| CalendarError::InvalidNumeral {
            input: cell.np.clone(),
        })?;
        Ok(Self {
            year,
            month,
            day,
            day_numeral: Some(cell.np.clone()),
            annotations: Some(DayAnnotations::from(cell)),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    /// Month number 1..=12.
    pub fn month_number(&self) -> u8 {
        self.month.number()
    }

    pub fn day(&self) -> u16 {
        self.day
    }

    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }

    /// The day as written in the source table, when it came from one.
    pub fn day_numeral(&self) -> Option<&str> {
        self.day_numeral.as_deref()
    }

    /// The day in Devanagari digits, from the table or transliterated.
    pub fn day_in_numerals(&self) -> String {
        match &self.day_numeral {
            Some(np) => np.clone(),
            None => arabic_to_numeral(&self.day.to_string()),
        }
    }

    /// Weekday, holiday, event and tithi. `None` for coarse conversions.
    pub fn annotations(&self) -> Option<&DayAnnotations> {
        self.annotations.as_ref()
    }

    pub fn is_holiday(&self) -> bool {
        self.annotations.as_ref().is_some_and(|a| a.holiday)
    }

    /// `"Mangsir 17, 2082"`.
    pub fn formatted(&self) -> String {
        format!("{} {}, {}", self.month.name(), self.day, self.year)
    }

    fn key(&self) -> (i32, Month, u16) {
        (self.year, self.month, self.day)
    }
}

impl fmt::Display for NepaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl PartialEq for NepaliDate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NepaliDate {}

impl PartialOrd for NepaliDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NepaliDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for NepaliDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(np: &str, en: &str, day: Weekday) -> DayCell {
        DayCell {
            np: np.to_string(),
            en: en.to_string(),
            tithi: String::new(),
            event: String::new(),
            day,
            holiday: false,
            specialday: false,
        }
    }

    #[test]
    fn month_numbers_and_names() {
        assert_eq!(Month::Baishakh.number(), 1);
        assert_eq!(Month::Chaitra.number(), 12);
        assert_eq!(Month::from_number(8).unwrap(), Month::Mangsir);
        assert_eq!(Month::from_name("Poush").unwrap(), Month::Poush);
        assert!(Month::from_number(0).is_err());
        assert!(Month::from_number(13).is_err());
        assert!(Month::from_name("Mansir").is_err());
    }

    #[test]
    fn month_wraps() {
        assert_eq!(Month::Chaitra.succ(), Month::Baishakh);
        assert_eq!(Month::Baishakh.pred(), Month::Chaitra);
        assert_eq!(Month::Magh.pred(), Month::Poush);
    }

    #[test]
    fn weekday_cycles() {
        assert_eq!(Weekday::Sat.succ(), Weekday::Sun);
        assert_eq!(Weekday::Wed.column(), 3);
    }

    #[test]
    fn nepali_date_equality_ignores_numerals() {
        let plain = NepaliDate::new(2082, 8, 17).unwrap();
        let from_table =
            NepaliDate::from_cell(2082, Month::Mangsir, &cell("१७", "3", Weekday::Wed)).unwrap();
        assert_eq!(plain, from_table);
        assert_eq!(from_table.day_numeral(), Some("१७"));
        assert_eq!(plain.day_numeral(), None);
        assert_eq!(plain.day_in_numerals(), "१७");
    }

    #[test]
    fn nepali_date_rejects_bad_parts() {
        assert!(NepaliDate::new(2082, 13, 1).is_err());
        assert!(NepaliDate::new(2082, 1, 0).is_err());
        let year = CoarseYear::new([30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30]);
        assert!(NepaliDate::new_in(2082, 2, 32, &year).is_ok());
        assert_eq!(
            NepaliDate::new_in(2082, 1, 31, &year).unwrap_err(),
            CalendarError::InvalidDay {
                day: 31,
                month: 1,
                max_day: 30
            }
        );
    }

    #[test]
    fn formatted_and_ordering() {
        let a = NepaliDate::new(2082, 8, 17).unwrap();
        let b = NepaliDate::new(2082, 9, 1).unwrap();
        assert_eq!(a.formatted(), "Mangsir 17, 2082");
        assert_eq!(a.month_name(), "Mangsir");
        assert!(a < b);
    }

    #[test]
    fn rich_year_derives_lengths() {
        let mut months: [Vec<DayCell>; 12] = Default::default();
        months[0] = vec![
            cell("", "", Weekday::Sun),
            cell("१", "14", Weekday::Mon),
            cell("२", "15", Weekday::Tue),
        ];
        let rich = RichYear::new(months);
        assert_eq!(rich.coarse().days_in(Month::Baishakh), 2);
        assert_eq!(rich.day_cell(Month::Baishakh, 2).unwrap().en, "15");
        assert!(rich.day_cell(Month::Baishakh, 0).is_none());
        assert!(rich.day_cell(Month::Baishakh, 3).is_none());
    }
}
