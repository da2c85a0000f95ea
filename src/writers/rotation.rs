//! Date-based rotation state of a file writer
//!
//! A rotating writer appends to `<base>_<date>.log` and moves to a new file
//! the first time an entry's timestamp reaches the end of the current day.
//! A non-rotating writer always appends to `<base>.log`.

use crate::core::timestamp::{end_of_day, format_with};
use chrono::{DateTime, FixedOffset};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RotationState {
    base_path: PathBuf,
    current_path: PathBuf,
    /// Last instant routed to `current_path`; `None` when rotation is off
    boundary: Option<DateTime<FixedOffset>>,
    date_format: String,
}

impl RotationState {
    /// Build the initial state; `now` selects the first dated file
    pub fn new(
        base_path: impl Into<PathBuf>,
        rotate: bool,
        date_format: impl Into<String>,
        now: &DateTime<FixedOffset>,
    ) -> Self {
        let base_path = base_path.into();
        let mut state = Self {
            current_path: with_suffix(&base_path, ".log"),
            base_path,
            boundary: None,
            date_format: date_format.into(),
        };
        if rotate {
            state.refresh(now);
        }
        state
    }

    #[must_use]
    pub fn is_rotating(&self) -> bool {
        self.boundary.is_some()
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    #[must_use]
    pub fn boundary(&self) -> Option<DateTime<FixedOffset>> {
        self.boundary
    }

    #[must_use]
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Use `pattern` for dated file names, starting with the current day
    pub fn set_date_format(&mut self, pattern: impl Into<String>) {
        self.date_format = pattern.into();
        if let Some(boundary) = self.boundary {
            self.refresh(&boundary);
        }
    }

    /// Whether an entry stamped `timestamp` belongs to a later file
    #[must_use]
    pub fn crosses(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        self.boundary.is_some_and(|boundary| *timestamp >= boundary)
    }

    /// Move to the file for `timestamp` if it is at or past the boundary
    ///
    /// Returns `true` if the target path changed.
    pub fn advance(&mut self, timestamp: &DateTime<FixedOffset>) -> bool {
        if !self.crosses(timestamp) {
            return false;
        }
        let previous = self.current_path.clone();
        self.refresh(timestamp);
        previous != self.current_path
    }

    fn refresh(&mut self, timestamp: &DateTime<FixedOffset>) {
        self.boundary = Some(end_of_day(timestamp));
        let suffix = format!("_{}.log", format_with(timestamp, &self.date_format));
        self.current_path = with_suffix(&self.base_path, &suffix);
    }
}

/// `base` with `suffix` appended to its final component (no extension logic)
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timestamp::DEFAULT_DATE_FORMAT;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_non_rotating_path() {
        let mut state = RotationState::new("/tmp/logs/app", false, DEFAULT_DATE_FORMAT, &utc(2024, 1, 1, 0, 0, 0));
        assert!(!state.is_rotating());
        assert_eq!(state.current_path(), Path::new("/tmp/logs/app.log"));

        assert!(!state.advance(&utc(2030, 6, 1, 0, 0, 0)));
        assert_eq!(state.current_path(), Path::new("/tmp/logs/app.log"));
    }

    #[test]
    fn test_initial_rotating_path() {
        let state = RotationState::new("/tmp/logs/app", true, DEFAULT_DATE_FORMAT, &utc(2024, 1, 1, 9, 0, 0));
        assert!(state.is_rotating());
        assert_eq!(state.current_path(), Path::new("/tmp/logs/app_2024-01-01.log"));
    }

    #[test]
    fn test_day_boundary_crossing() {
        let mut state = RotationState::new("app", true, DEFAULT_DATE_FORMAT, &utc(2024, 1, 1, 0, 0, 0));

        assert!(!state.advance(&utc(2024, 1, 1, 23, 59, 59)));
        assert_eq!(state.current_path(), Path::new("app_2024-01-01.log"));

        assert!(state.advance(&utc(2024, 1, 2, 0, 0, 1)));
        assert_eq!(state.current_path(), Path::new("app_2024-01-02.log"));
        assert_eq!(state.boundary(), Some(end_of_day(&utc(2024, 1, 2, 12, 0, 0))));
    }

    #[test]
    fn test_boundary_never_moves_back() {
        let mut state = RotationState::new("app", true, DEFAULT_DATE_FORMAT, &utc(2024, 1, 5, 0, 0, 0));
        // A late entry from an earlier day stays in the current file.
        assert!(!state.advance(&utc(2024, 1, 4, 23, 0, 0)));
        assert_eq!(state.current_path(), Path::new("app_2024-01-05.log"));
    }

    #[test]
    fn test_skipping_several_days() {
        let mut state = RotationState::new("app", true, DEFAULT_DATE_FORMAT, &utc(2024, 1, 1, 0, 0, 0));
        assert!(state.advance(&utc(2024, 1, 9, 8, 0, 0)));
        assert_eq!(state.current_path(), Path::new("app_2024-01-09.log"));
    }

    #[test]
    fn test_date_format_change_keeps_day() {
        let mut state = RotationState::new("app", true, DEFAULT_DATE_FORMAT, &utc(2024, 3, 9, 15, 0, 0));
        let boundary = state.boundary();

        state.set_date_format("%Y@%m@%d");
        assert_eq!(state.current_path(), Path::new("app_2024@03@09.log"));
        assert_eq!(state.boundary(), boundary);

        assert!(state.advance(&utc(2024, 3, 10, 0, 0, 0)));
        assert_eq!(state.current_path(), Path::new("app_2024@03@10.log"));
    }

    #[test]
    fn test_date_format_change_without_rotation() {
        let mut state = RotationState::new("app", false, DEFAULT_DATE_FORMAT, &utc(2024, 3, 9, 15, 0, 0));
        state.set_date_format("%Y%m%d");
        assert_eq!(state.current_path(), Path::new("app.log"));
        assert_eq!(state.date_format(), "%Y%m%d");
    }

    #[test]
    fn test_custom_date_format() {
        let state = RotationState::new("app", true, "%Y%m%d", &utc(2024, 2, 29, 0, 0, 0));
        assert_eq!(state.current_path(), Path::new("app_20240229.log"));
    }
}
