use std::ffi::OsString;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Base filename, kept byte for byte for the destination
    pub name: OsString,
    /// Absolute source path
    pub path: PathBuf,
    /// Detected format (e.g. "jpg")
    pub format: &'static str,
    /// Capture date, if the metadata had one
    pub date: Option<NaiveDate>,
}

impl ImageRecord {
    pub fn new(name: OsString, path: PathBuf, format: &'static str) -> Self {
        Self {
            name,
            path,
            format,
            date: None,
        }
    }

    /// `(year, month, day)`, zero-valued when no date was found.
    pub fn ymd(&self) -> (i32, u32, u32) {
        match self.date {
            Some(d) => (d.year(), d.month(), d.day()),
            None => (0, 0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ymd_defaults_to_zero() {
        let mut rec = ImageRecord::new("a.jpg".into(), PathBuf::from("/src/a.jpg"), "jpg");
        assert_eq!(rec.ymd(), (0, 0, 0));
        rec.date = NaiveDate::from_ymd_opt(2021, 6, 15);
        assert_eq!(rec.ymd(), (2021, 6, 15));
    }
}
