//! Lazily loaded, process-lifetime cache of year tables.

use crate::core::record::YearRecord;
use crate::core::types::YearTable;
use crate::error::CalendarError;
use crate::persistence::YearSource;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct StoreState {
    source: Box<dyn YearSource>,
    cache: HashMap<i32, Arc<YearTable>>,
}

/// Year tables keyed by Nepali year, over an injectable [`YearSource`].
///
/// Successful loads are kept until [`YearTableStore::invalidate_all`];
/// failures are never cached so a retry after a data refresh can succeed.
/// One lock covers the source, the cache and invalidation.
pub struct YearTableStore {
    state: Mutex<StoreState>,
}

impl YearTableStore {
    pub fn new(source: impl YearSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn YearSource>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                source,
                cache: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // The cache is only ever replaced wholesale, so a poisoned guard
        // still holds a consistent map.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Years in the catalog, ascending. Entries that are not a
    /// non-negative integer are skipped.
    pub fn list_available_years(&self) -> Vec<i32> {
        let names = match self.lock().source.record_names() {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, "could not list year records");
                return Vec::new();
            }
        };
        let mut years: Vec<i32> = names
            .iter()
            .filter(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|name| name.parse().ok())
            .collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// The table for `year`, loading it on first use.
    pub fn get_year_table(&self, year: i32) -> Result<Arc<YearTable>, CalendarError> {
        let mut state = self.lock();
        if let Some(table) = state.cache.get(&year) {
            tracing::trace!(year, "year table cache hit");
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load(state.source.as_ref(), year)?);
        state.cache.insert(year, Arc::clone(&table));
        tracing::debug!(year, "year table loaded");
        Ok(table)
    }

    /// Drops every cached table at once.
    pub fn invalidate_all(&self) {
        let dropped = std::mem::take(&mut self.lock().cache).len();
        tracing::debug!(dropped, "year table cache invalidated");
    }

    /// Swaps the backing source and empties the cache in one step.
    pub fn replace_source(&self, source: impl YearSource + 'static) {
        let mut state = self.lock();
        state.source = Box::new(source);
        state.cache = HashMap::new();
        tracing::debug!("year table source replaced");
    }

    /// Number of years currently cached.
    pub fn cached_years(&self) -> usize {
        self.lock().cache.len()
    }
}

fn load(source: &dyn YearSource, year: i32) -> Result<YearTable, CalendarError> {
    let Some(text) = source.read_record(year)? else {
        tracing::debug!(year, "no year record");
        return Err(CalendarError::DataNotFound { year });
    };
    YearRecord::from_json(&text)
        .and_then(YearRecord::validate)
        .map_err(|reason| {
            tracing::warn!(year, %reason, "malformed year record");
            CalendarError::DataMalformed { year, reason }
        })
}
