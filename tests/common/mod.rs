//! Shared fixtures: year records generated from a start date and month lengths.

#![allow(dead_code)]

use chrono::{Datelike, NaiveDate};
use patro_core::{arabic_to_numeral, Month};
use serde_json::{json, Map, Value};

const WEEKDAYS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Month lengths used for the 2082 fixture. Baishakh 1 is 2025-04-14 and
/// Mangsir 17 falls on 2025-12-03.
pub const LENGTHS_2082: [u16; 12] = [31, 31, 32, 31, 31, 31, 30, 30, 29, 30, 30, 30];

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn padding(column: usize) -> Value {
    json!({
        "np": "", "en": "", "tithi": "", "event": "",
        "day": WEEKDAYS[column % 7], "holiday": false, "specialday": false
    })
}

/// A rich year whose Baishakh 1 is `start`, laid out on Sunday-first week
/// grids the way the scraped records are.
pub fn rich_year_json(start: NaiveDate, lengths: [u16; 12]) -> String {
    let mut doc = Map::new();
    let mut date = start;
    for (month, &len) in Month::ALL.iter().zip(lengths.iter()) {
        let mut cells = Vec::new();
        let lead = date.weekday().num_days_from_sunday() as usize;
        for column in 0..lead {
            cells.push(padding(column));
        }
        for day in 1..=len {
            let column = cells.len() % 7;
            let event = if *month == Month::Mangsir && day == 17 {
                "Test festival"
            } else {
                ""
            };
            let tithi = if day == 1 { "प्रतिपदा" } else { "" };
            let special = !event.is_empty();
            cells.push(json!({
                "np": arabic_to_numeral(&day.to_string()),
                "en": date.day().to_string(),
                "tithi": tithi,
                "event": event,
                "day": WEEKDAYS[column],
                "holiday": column == 6,
                "specialday": special
            }));
            date = date.succ_opt().unwrap();
        }
        while cells.len() % 7 != 0 {
            cells.push(padding(cells.len()));
        }
        doc.insert(month.name().to_string(), Value::Array(cells));
    }
    Value::Object(doc).to_string()
}

/// The 2082 fixture.
pub fn rich_2082() -> String {
    rich_year_json(ymd(2025, 4, 14), LENGTHS_2082)
}

/// A degenerate but valid rich year: each month holds a single day whose
/// Gregorian day-of-month is taken from `en_days`.
pub fn tiny_year_json(en_days: [&str; 12]) -> String {
    let mut doc = Map::new();
    for (month, en) in Month::ALL.iter().zip(en_days) {
        let cell = json!({"np": "१", "en": en, "day": "sun"});
        doc.insert(month.name().to_string(), json!([cell]));
    }
    Value::Object(doc).to_string()
}

pub fn coarse_json(lengths: [u16; 12]) -> String {
    let total: u32 = lengths.iter().map(|&d| u32::from(d)).sum();
    json!({"months": lengths, "totalDays": total}).to_string()
}
