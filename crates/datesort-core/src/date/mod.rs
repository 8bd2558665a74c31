pub mod exif;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use log::debug;

/// Read the capture date of an image file.
///
/// Returns `None` when the file cannot be opened, carries no EXIF block, or
/// the block has no usable date tag. None of these are errors for the batch.
pub fn resolve_date(path: &Path) -> Option<NaiveDate> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("cannot open {} for EXIF: {}", path.display(), e);
            return None;
        }
    };
    let mut reader = BufReader::new(file);
    let date = exif::extract_exif_datetime(&mut reader).map(|dt| dt.date());
    if date.is_none() {
        debug!("no capture date in {}", path.display());
    }
    date
}
