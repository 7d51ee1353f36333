//! Year table store over directory and snapshot sources, including a full
//! dataset refresh.

mod common;

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use common::{coarse_json, rich_2082, tiny_year_json, ymd};
use patro_core::persistence::{
    install_dataset, save_snapshot, DirectorySource, MemorySource, SnapshotSource,
};
use patro_core::{
    arabic_to_numeral, numeral_to_arabic, CalendarConfig, DateConverter, Month, NepaliDate,
    YearTableStore,
};
use tempfile::tempdir;

const COARSE_2074: [u16; 12] = [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30];

#[test]
fn lists_years_and_skips_other_entries() {
    let dir = tempdir().unwrap();
    for name in ["2078", "2079", "guidelines", "2077"] {
        fs::write(dir.path().join(format!("{name}.json")), coarse_json(COARSE_2074)).unwrap();
    }
    fs::create_dir(dir.path().join("2080")).unwrap();

    let store = YearTableStore::new(DirectorySource::new(dir.path()));
    assert_eq!(store.list_available_years(), vec![2077, 2078, 2079]);
}

#[test]
fn empty_or_missing_catalog_lists_nothing() {
    let dir = tempdir().unwrap();
    let store = YearTableStore::new(DirectorySource::new(dir.path().join("nope")));
    assert!(store.list_available_years().is_empty());
}

#[test]
fn second_lookup_does_not_touch_the_source() {
    let source = Arc::new(MemorySource::new().with_record("2082", rich_2082()));
    let store = YearTableStore::new(Arc::clone(&source));

    let first = store.get_year_table(2082).unwrap();
    let second = store.get_year_table(2082).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.reads(), 1);

    store.invalidate_all();
    store.get_year_table(2082).unwrap();
    assert_eq!(source.reads(), 2);
}

#[test]
fn rich_numerals_round_trip_and_increase() {
    let store = YearTableStore::new(MemorySource::new().with_record("2082", rich_2082()));
    let table = store.get_year_table(2082).unwrap();
    let rich = table.as_rich().unwrap();

    for month in Month::ALL {
        let days: Vec<u32> = rich
            .month(month)
            .iter()
            .filter(|cell| !cell.is_padding())
            .map(|cell| numeral_to_arabic(&cell.np).unwrap())
            .collect();
        let expected: Vec<u32> = (1..=days.len() as u32).collect();
        assert_eq!(days, expected, "{month}");

        for day in days {
            assert_eq!(numeral_to_arabic(&arabic_to_numeral(&day.to_string())).unwrap(), day);
        }
    }
    assert_eq!(
        rich.coarse().month_lengths(),
        &common::LENGTHS_2082,
        "lengths derived from the grid"
    );
}

#[test]
fn refresh_is_invisible_until_invalidated() {
    let root = tempdir().unwrap();
    let api = root.path().join("api");
    install_dataset(&api, &BTreeMap::from([(2082, tiny_year_json(["1"; 12]))])).unwrap();

    let store = Arc::new(YearTableStore::new(DirectorySource::new(&api)));
    let config = CalendarConfig {
        data_dir: api.clone(),
        ..CalendarConfig::default()
    };
    let converter = DateConverter::with_config(Arc::clone(&store), &config);
    assert!(converter.convert(ymd(2025, 12, 3)).is_err());

    install_dataset(
        &api,
        &BTreeMap::from([(2081, coarse_json(COARSE_2074)), (2082, rich_2082())]),
    )
    .unwrap();
    // Still the cached tiny table.
    assert!(converter.convert(ymd(2025, 12, 3)).is_err());

    store.invalidate_all();
    let date = converter.convert(ymd(2025, 12, 3)).unwrap();
    assert_eq!(date, NepaliDate::new(2082, 8, 17).unwrap());
    assert!(date.annotations().is_some());
    assert_eq!(converter.list_available_years(), vec![2081, 2082]);
}

#[test]
fn snapshot_can_back_the_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("years.bin");
    save_snapshot(&BTreeMap::from([(2082, rich_2082())]), &path).unwrap();

    let store = Arc::new(YearTableStore::new(SnapshotSource::load(&path).unwrap()));
    assert_eq!(store.list_available_years(), vec![2082]);

    let converter = DateConverter::new(Arc::clone(&store));
    let date = converter.convert(ymd(2025, 12, 3)).unwrap();
    assert_eq!(date.day_numeral(), Some("१७"));
}

#[test]
fn replacing_the_source_swaps_the_data() {
    let store = Arc::new(YearTableStore::new(MemorySource::new()));
    let converter = DateConverter::new(Arc::clone(&store));
    assert!(converter.convert(ymd(2025, 12, 3)).unwrap().annotations().is_none());

    store.replace_source(MemorySource::new().with_record("2082", rich_2082()));
    assert!(converter.convert(ymd(2025, 12, 3)).unwrap().annotations().is_some());
}
