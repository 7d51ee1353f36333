use crate::config::CalendarConfig;
use crate::core::calendar_math::{
    epoch_forward_convert, search_rich_table, CoarseTables, MonthSpan, ReferenceEpoch,
    SearchCandidate,
};
use crate::core::types::{Month, NepaliDate, YearTable};
use crate::error::CalendarError;
use crate::persistence::DirectorySource;
use crate::store::YearTableStore;
use chrono::{Datelike, NaiveDate};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A Nepali month to try first, with the year the seed heuristic puts it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seed {
    year: i32,
    month: Month,
    span: MonthSpan,
}

/// Converts Gregorian dates to Bikram Sambat using the rich day-by-day
/// tables when the store has them and the month-length walk otherwise.
pub struct DateConverter {
    store: Arc<YearTableStore>,
    coarse: CoarseTables,
    epoch: ReferenceEpoch,
    widen_search: bool,
    coarse_fallback: bool,
}

impl DateConverter {
    /// A converter over `store` with the built-in month tables and default options.
    pub fn new(store: Arc<YearTableStore>) -> Self {
        Self::with_config(store, &CalendarConfig::default())
    }

    pub fn with_config(store: Arc<YearTableStore>, config: &CalendarConfig) -> Self {
        Self {
            store,
            coarse: CoarseTables::builtin(),
            epoch: ReferenceEpoch::standard(),
            widen_search: config.widen_search,
            coarse_fallback: config.coarse_fallback,
        }
    }

    /// A converter reading records from `config.data_dir`.
    pub fn from_config(config: &CalendarConfig) -> Self {
        let store = YearTableStore::new(DirectorySource::new(config.data_dir.clone()));
        Self::with_config(Arc::new(store), config)
    }

    /// Replaces the built-in month-length tables.
    pub fn with_coarse_tables(mut self, coarse: CoarseTables) -> Self {
        self.coarse = coarse;
        self
    }

    pub fn store(&self) -> &Arc<YearTableStore> {
        &self.store
    }

    pub fn epoch(&self) -> &ReferenceEpoch {
        &self.epoch
    }

    /// Today's date in the local time zone.
    pub fn current_nepali_date(&self) -> Result<NepaliDate, CalendarError> {
        self.convert(chrono::Local::now().date_naive())
    }

    /// Converts `date`, or today when `None`.
    pub fn convert_or_today(&self, date: Option<NaiveDate>) -> Result<NepaliDate, CalendarError> {
        match date {
            Some(date) => self.convert(date),
            None => self.current_nepali_date(),
        }
    }

    /// Converts a Gregorian date.
    ///
    /// Rich tables are searched first, in the months the seed heuristic
    /// picks. When a seeded year has no rich table the month-length walk is
    /// used instead, which yields no weekday, holiday, event or tithi.
    pub fn convert(&self, date: NaiveDate) -> Result<NepaliDate, CalendarError> {
        if date < self.epoch.gregorian {
            return Err(CalendarError::DateBeforeEpoch {
                date,
                epoch: self.epoch.gregorian,
            });
        }

        let seeds = seed_candidates(date);
        let target = date.day().to_string();

        let mut tables: BTreeMap<i32, Option<Arc<YearTable>>> = BTreeMap::new();
        for seed in &seeds {
            if let Entry::Vacant(slot) = tables.entry(seed.year) {
                slot.insert(self.rich_table(seed.year));
            }
        }

        // A seed is covered when its year has a rich table with days in
        // the seeded month.
        let mut missing: Option<i32> = None;
        let mut candidates: Vec<SearchCandidate<'_>> = Vec::with_capacity(seeds.len());
        for seed in &seeds {
            let table = tables
                .get(&seed.year)
                .and_then(|t| t.as_deref())
                .and_then(YearTable::as_rich)
                .filter(|rich| rich.month(seed.month).iter().any(|c| !c.is_padding()));
            match table {
                Some(table) => candidates.push(SearchCandidate {
                    year: seed.year,
                    month: seed.month,
                    span: seed.span,
                    table,
                }),
                None => {
                    missing.get_or_insert(seed.year);
                }
            }
        }

        if !candidates.is_empty() {
            match search_rich_table(&target, &candidates) {
                Err(CalendarError::NoMatchInRichTable { .. }) => {}
                found => return found,
            }
            if self.widen_search {
                tracing::debug!(%date, "seeded months missed, widening search");
                match self.widened_search(&target, seeds[0].year) {
                    Err(CalendarError::NoMatchInRichTable { .. }) => {}
                    found => return found,
                }
            }
            if missing.is_none() {
                return Err(CalendarError::NoMatchInRichTable { target });
            }
        }

        if !self.coarse_fallback {
            return Err(CalendarError::DataNotFound {
                year: missing.unwrap_or(seeds[0].year),
            });
        }
        tracing::debug!(%date, "no rich table match, walking month lengths");
        epoch_forward_convert(date, &self.epoch, &self.coarse_tables_through(date))
    }

    /// Years in the store, ascending.
    pub fn list_available_years(&self) -> Vec<i32> {
        self.store.list_available_years()
    }

    pub fn year_table(&self, year: i32) -> Result<Arc<YearTable>, CalendarError> {
        self.store.get_year_table(year)
    }

    /// True when both dates are present and fall on the same day.
    pub fn is_same_nepali_date(a: Option<&NepaliDate>, b: Option<&NepaliDate>) -> bool {
        matches!((a, b), (Some(a), Some(b)) if a == b)
    }

    fn rich_table(&self, year: i32) -> Option<Arc<YearTable>> {
        match self.store.get_year_table(year) {
            Ok(table) if table.as_rich().is_some() => Some(table),
            Ok(_) => None,
            Err(e) if e.is_absent() => None,
            Err(e) => {
                tracing::warn!(year, error = %e, "could not read year table");
                None
            }
        }
    }

    fn widened_search(&self, target: &str, center: i32) -> Result<NepaliDate, CalendarError> {
        let tables: Vec<(i32, Arc<YearTable>)> = [center, center - 1, center + 1]
            .into_iter()
            .filter_map(|year| Some((year, self.rich_table(year)?)))
            .collect();
        let candidates: Vec<SearchCandidate<'_>> = tables
            .iter()
            .filter_map(|(year, table)| Some((*year, table.as_rich()?)))
            .flat_map(|(year, table)| {
                Month::ALL.into_iter().map(move |month| SearchCandidate {
                    year,
                    month,
                    span: MonthSpan::Whole,
                    table,
                })
            })
            .collect();
        search_rich_table(target, &candidates)
    }

    /// Built-in month lengths overlaid with whatever the store holds for
    /// the years between the epoch and `date`. Only catalogued years are
    /// read.
    fn coarse_tables_through(&self, date: NaiveDate) -> CoarseTables {
        let mut tables = self.coarse.clone();
        let range = self.epoch.nepali_year..=date.year().saturating_add(57);
        for year in self.store.list_available_years() {
            if !range.contains(&year) {
                continue;
            }
            match self.store.get_year_table(year).map(|t| t.month_lengths()) {
                Ok(Some(lengths)) => {
                    tables.insert(year, lengths);
                }
                Ok(None) => {
                    tracing::debug!(year, "year table has empty months, keeping built-in lengths");
                }
                Err(_) => {}
            }
        }
        tables
    }
}

/// The two Nepali months a Gregorian date can fall in, most likely first.
///
/// Every Nepali month begins in a fixed Gregorian month (Baishakh in April,
/// Magh in January and so on), so a date is either early in the month that
/// begins in its Gregorian month or late in the one before. The year offset
/// is +57 from mid-April and +56 before it; the real new-year day varies and
/// is only known from the tables themselves, so this is a seed, not an answer.
fn seed_candidates(date: NaiveDate) -> [Seed; 2] {
    let (year, month, day) = (date.year(), date.month(), date.day());
    let beginning = Month::ALL[((month + 8) % 12) as usize];
    let previous = beginning.pred();
    let nepali_year = |m: Month| {
        if m >= Month::Magh || month < 4 {
            year + 56
        } else {
            year + 57
        }
    };

    let early = Seed {
        year: nepali_year(beginning),
        month: beginning,
        span: MonthSpan::BeforeRollover,
    };
    let late = Seed {
        year: nepali_year(previous),
        month: previous,
        span: MonthSpan::AfterRollover,
    };
    if day >= 15 {
        [early, late]
    } else {
        [late, early]
    }
}
