use crate::error::CalendarError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Runtime settings for the converter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    /// Directory holding the `<year>.json` records.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// After a miss in the seeded months, scan every month of the
    /// neighbouring years too. Off by default: a bare day-of-month matches
    /// in almost any month.
    #[serde(default)]
    pub widen_search: bool,

    /// Fall back to the month-length walk when no rich table covers the date.
    #[serde(default = "default_true")]
    pub coarse_fallback: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            widen_search: false,
            coarse_fallback: true,
        }
    }
}

impl CalendarConfig {
    /// Reads a JSON config file; missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, CalendarError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, CalendarError> {
        serde_json::from_str(text).map_err(|e| CalendarError::Io(format!("config: {e}")))
    }
}

fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("nepali-calendar");
    path.push("api");
    path
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = CalendarConfig::from_json("{}").unwrap();
        assert_eq!(config, CalendarConfig::default());
        assert!(config.coarse_fallback);
        assert!(!config.widen_search);
        assert!(config.data_dir.ends_with("nepali-calendar/api"));
    }

    #[test]
    fn fields_override_defaults() {
        let config = CalendarConfig::from_json(
            r#"{"data_dir": "/tmp/api", "widen_search": true, "coarse_fallback": false}"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/api"));
        assert!(config.widen_search);
        assert!(!config.coarse_fallback);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(CalendarConfig::from_json(r#"{"widen": true}"#).is_err());
    }
}
