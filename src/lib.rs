// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod store;

pub use crate::config::CalendarConfig;
pub use crate::core::calendar_math::{
    epoch_forward_convert, search_rich_table, CoarseTables, MonthSpan, ReferenceEpoch,
    SearchCandidate,
};
pub use crate::core::converter::{arabic_to_numeral, numeral_to_arabic};
pub use crate::core::engine::DateConverter;
pub use crate::core::types::{
    CoarseYear, DayAnnotations, DayCell, Month, NepaliDate, RichYear, Weekday, YearTable,
};
pub use crate::error::CalendarError;
pub use crate::store::YearTableStore;
