//! Raw year records as stored on disk, and their validation into [`YearTable`].

use crate::core::converter::numeral_to_arabic;
use crate::core::types::{CoarseYear, DayCell, Month, RichYear, YearTable};
use serde::{Deserialize, Serialize};

/// A year record in either of the two stored shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearRecord {
    Coarse(CoarseRecord),
    Rich(RichRecord),
}

/// `{"months": [31, 31, ...], "totalDays": 365}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoarseRecord {
    pub months: Vec<u16>,
    #[serde(rename = "totalDays")]
    pub total_days: u32,
}

/// Month name -> day cells. Field order is calendar order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RichRecord {
    #[serde(rename = "Baishakh")]
    pub baishakh: Vec<DayCell>,
    #[serde(rename = "Jestha")]
    pub jestha: Vec<DayCell>,
    #[serde(rename = "Ashadh")]
    pub ashadh: Vec<DayCell>,
    #[serde(rename = "Shrawan")]
    pub shrawan: Vec<DayCell>,
    #[serde(rename = "Bhadra")]
    pub bhadra: Vec<DayCell>,
    #[serde(rename = "Ashwin")]
    pub ashwin: Vec<DayCell>,
    #[serde(rename = "Kartik")]
    pub kartik: Vec<DayCell>,
    #[serde(rename = "Mangsir")]
    pub mangsir: Vec<DayCell>,
    #[serde(rename = "Poush")]
    pub poush: Vec<DayCell>,
    #[serde(rename = "Magh")]
    pub magh: Vec<DayCell>,
    #[serde(rename = "Falgun")]
    pub falgun: Vec<DayCell>,
    #[serde(rename = "Chaitra")]
    pub chaitra: Vec<DayCell>,
}

impl RichRecord {
    fn into_months(self) -> [Vec<DayCell>; 12] {
        [
            self.baishakh,
            self.jestha,
            self.ashadh,
            self.shrawan,
            self.bhadra,
            self.ashwin,
            self.kartik,
            self.mangsir,
            self.poush,
            self.magh,
            self.falgun,
            self.chaitra,
        ]
    }
}

impl YearRecord {
    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    /// Checks the structural invariants and produces the table.
    pub fn validate(self) -> Result<YearTable, String> {
        match self {
            YearRecord::Coarse(c) => validate_coarse(c).map(YearTable::Coarse),
            YearRecord::Rich(r) => validate_rich(r).map(YearTable::Rich),
        }
    }
}

fn validate_coarse(record: CoarseRecord) -> Result<CoarseYear, String> {
    let months: [u16; 12] = record
        .months
        .as_slice()
        .try_into()
        .map_err(|_| format!("expected 12 months, got {}", record.months.len()))?;
    if let Some(pos) = months.iter().position(|&d| d == 0) {
        return Err(format!("{} has no days", Month::ALL[pos]));
    }
    let coarse = CoarseYear::new(months);
    if coarse.total_days() != record.total_days {
        return Err(format!(
            "totalDays is {} but the months sum to {}",
            record.total_days,
            coarse.total_days()
        ));
    }
    Ok(coarse)
}

fn validate_rich(record: RichRecord) -> Result<RichYear, String> {
    let months = record.into_months();
    for (month, cells) in Month::ALL.iter().zip(months.iter()) {
        validate_month(cells).map_err(|e| format!("{month}: {e}"))?;
    }
    Ok(RichYear::new(months))
}

fn validate_month(cells: &[DayCell]) -> Result<(), String> {
    let mut expected = 1u32;
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 && cells[i - 1].day.succ() != cell.day {
            return Err(format!("weekday {:?} out of sequence at slot {i}", cell.day));
        }
        // Some scraped grids keep the neighbouring month's date in padding
        // slots; those are never read.
        if cell.is_padding() {
            continue;
        }
        if cell.en.is_empty() {
            return Err(format!("day {} has no gregorian day", cell.np));
        }
        let day = numeral_to_arabic(&cell.np).map_err(|e| e.to_string())?;
        if day != expected {
            return Err(format!("expected day {expected}, found {day}"));
        }
        numeral_to_arabic(&cell.en).map_err(|e| e.to_string())?;
        expected += 1;
    }
    Ok(())
}
