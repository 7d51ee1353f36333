// File: src/persistence.rs
//! Backing stores for year records.
//!
//! A source hands out raw JSON documents by name; parsing and validation
//! happen in [`crate::store::YearTableStore`] so every source reports
//! broken data the same way.

use crate::error::CalendarError;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::{NamedTempFile, TempDir};

/// A record store keyed by year.
pub trait YearSource: Send + Sync {
    /// Names of every record in the catalog, year-like or not.
    fn record_names(&self) -> Result<Vec<String>, CalendarError>;

    /// The raw document for `year`, or `None` if there is none.
    fn read_record(&self, year: i32) -> Result<Option<String>, CalendarError>;
}

/// `<year>.json` files in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, year: i32) -> PathBuf {
        self.dir.join(format!("{year}.json"))
    }
}

impl YearSource for DirectorySource {
    fn record_names(&self) -> Result<Vec<String>, CalendarError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        Ok(names)
    }

    fn read_record(&self, year: i32) -> Result<Option<String>, CalendarError> {
        match fs::read_to_string(self.record_path(year)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Records held in memory, for fixtures and embedded data.
#[derive(Debug, Default)]
pub struct MemorySource {
    records: BTreeMap<String, String>,
    reads: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record under an arbitrary catalog name.
    pub fn with_record(mut self, name: impl Into<String>, json: impl Into<String>) -> Self {
        self.records.insert(name.into(), json.into());
        self
    }

    /// How many times [`YearSource::read_record`] has been called.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl YearSource for MemorySource {
    fn record_names(&self) -> Result<Vec<String>, CalendarError> {
        Ok(self.records.keys().cloned().collect())
    }

    fn read_record(&self, year: i32) -> Result<Option<String>, CalendarError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.get(&year.to_string()).cloned())
    }
}

impl<S: YearSource + ?Sized> YearSource for std::sync::Arc<S> {
    fn record_names(&self) -> Result<Vec<String>, CalendarError> {
        (**self).record_names()
    }

    fn read_record(&self, year: i32) -> Result<Option<String>, CalendarError> {
        (**self).read_record(year)
    }
}

/// A bincode bundle of year records, loaded whole.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    records: BTreeMap<i32, String>,
}

impl SnapshotSource {
    pub fn load(path: &Path) -> Result<Self, CalendarError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let records: BTreeMap<i32, String> = bincode::deserialize_from(reader)?;
        Ok(Self { records })
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.keys().copied()
    }
}

impl YearSource for SnapshotSource {
    fn record_names(&self) -> Result<Vec<String>, CalendarError> {
        Ok(self.records.keys().map(|y| y.to_string()).collect())
    }

    fn read_record(&self, year: i32) -> Result<Option<String>, CalendarError> {
        Ok(self.records.get(&year).cloned())
    }
}

/// Writes `records` as a snapshot bundle, replacing `path` atomically.
pub fn save_snapshot(records: &BTreeMap<i32, String>, path: &Path) -> Result<(), CalendarError> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let writer = BufWriter::new(&temp_file);
        bincode::serialize_into(writer, records)?;
    }
    temp_file.persist(path).map_err(|e| CalendarError::Io(e.to_string()))?;
    Ok(())
}

/// Replaces the record directory `dir` with exactly `records`.
///
/// Everything is written into a staging directory next to `dir` first; the
/// live directory only changes once every file is on disk, so readers see
/// either the old dataset or the new one. Call
/// [`crate::store::YearTableStore::invalidate_all`] afterwards.
pub fn install_dataset(dir: &Path, records: &BTreeMap<i32, String>) -> Result<(), CalendarError> {
    let parent_dir = match dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let staging = TempDir::new_in(parent_dir)?;
    for (year, json) in records {
        let mut file = File::create(staging.path().join(format!("{year}.json")))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }

    let retired = parent_dir.join(format!(
        ".{}.old",
        dir.file_name().and_then(|n| n.to_str()).unwrap_or("api")
    ));
    if retired.exists() {
        fs::remove_dir_all(&retired)?;
    }
    let had_previous = dir.exists();
    if had_previous {
        fs::rename(dir, &retired)?;
    }
    let staged = staging.keep();
    if let Err(e) = fs::rename(&staged, dir) {
        // Put the old data back before reporting.
        if had_previous {
            let _ = fs::rename(&retired, dir);
        }
        let _ = fs::remove_dir_all(&staged);
        return Err(e.into());
    }
    if had_previous {
        fs::remove_dir_all(&retired)?;
    }
    tracing::info!(dir = %dir.display(), records = records.len(), "installed year dataset");
    Ok(())
}
