use std::io::{BufRead, Seek};

use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Reader, Tag};

/// Tags consulted for the capture time, best first.
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Extract the capture time from the EXIF block of an image container.
/// EXIF datetimes have no timezone info - they are local time as-is.
pub fn extract_exif_datetime<R: BufRead + Seek>(reader: &mut R) -> Option<NaiveDateTime> {
    let exif = Reader::new().read_from_container(reader).ok()?;

    for tag in &DATE_TAGS {
        if let Some(field) = exif.get_field(*tag, In::PRIMARY) {
            let val = field.display_value().to_string();
            if let Some(dt) = parse_exif_datetime(&val) {
                return Some(dt);
            }
        }
    }

    None
}

pub(crate) fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s
        .trim()
        .trim_matches('"')
        .replace('-', ":")
        .replace('/', ":")
        .replace('\\', ":")
        .replace('.', ":");

    if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    let date_part = cleaned.split(' ').next()?;
    NaiveDate::parse_from_str(date_part, "%Y:%m:%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Cursor;

    #[test]
    fn test_parse_variants() {
        let dt = parse_exif_datetime("2021:06:15 10:30:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2021, 6, 15));
        assert_eq!(dt.hour(), 10);

        assert!(parse_exif_datetime("2021-06-15 10:30:00").is_some());
        assert!(parse_exif_datetime("2021/06/15 10:30:00").is_some());

        let date_only = parse_exif_datetime("2019:12:31").unwrap();
        assert_eq!(date_only.hour(), 0);
        assert_eq!(date_only.day(), 31);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_exif_datetime("").is_none());
        assert!(parse_exif_datetime("    :  :     :  :  ").is_none());
        assert!(parse_exif_datetime("2021:13:40 10:00:00").is_none());
    }

    #[test]
    fn test_extract_from_jpeg() {
        let bytes = crate::testutil::jpeg_with_date("2021:06:15 10:30:00");
        let dt = extract_exif_datetime(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(dt.to_string(), "2021-06-15 10:30:00");
    }

    #[test]
    fn test_extract_without_exif() {
        let bytes = crate::testutil::jpeg_without_exif();
        assert!(extract_exif_datetime(&mut Cursor::new(bytes)).is_none());
    }
}
