use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn datesort(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_datesort"))
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

/// Minimal JPEG whose IFD0 carries a single DateTime tag.
fn jpeg_with_date(datetime: &str) -> Vec<u8> {
    let mut tiff = b"II*\0".to_vec();
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x0132u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&20u32.to_le_bytes());
    tiff.extend_from_slice(&26u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(datetime.as_bytes());
    tiff.push(0);

    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend_from_slice(&tiff);
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&app1);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn test_missing_destination() {
    let dir = tempfile::tempdir().unwrap();
    let out = datesort(&["--dry-run=false"], dir.path());
    assert_eq!(out.status.code(), Some(2));
    assert!(is_empty_dir(dir.path()));
}

#[test]
fn test_source_not_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("photo.jpg"), jpeg_with_date("2021:06:15 10:30:00")).unwrap();
    let out = datesort(
        &["--source", "photo.jpg", "--destination", "out", "--dry-run=false"],
        dir.path(),
    );
    assert_eq!(out.status.code(), Some(2));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_source_missing() {
    let dir = tempfile::tempdir().unwrap();
    let out = datesort(&["-s", "nowhere", "-d", "out"], dir.path());
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_dry_run_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.jpg"), jpeg_with_date("2021:06:15 10:30:00")).unwrap();

    let out = datesort(&["--source", "src", "--destination", "out"], dir.path());
    assert_eq!(out.status.code(), Some(0));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_copies_into_date_folders() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("nested")).unwrap();
    let jpeg = jpeg_with_date("2021:06:15 10:30:00");
    fs::write(src.join("nested/IMG_0042.jpg"), &jpeg).unwrap();
    fs::write(src.join("notes.txt"), "just some notes").unwrap();

    let args = [
        "--source",
        "src",
        "--destination",
        "out",
        "--dry-run=false",
        "--summary-json",
    ];
    let out = datesort(&args, dir.path());
    assert_eq!(out.status.code(), Some(0));
    let copied = dir.path().join("out/2021/06/15/IMG_0042.jpg");
    assert_eq!(fs::read(&copied).unwrap(), jpeg);

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["images_found"], 1);
    assert_eq!(summary["files_copied"], 1);
    assert_eq!(summary["dry_run"], false);

    // second run over the same tree succeeds and leaves the copy intact
    let again = datesort(&args, dir.path());
    assert_eq!(again.status.code(), Some(0));
    assert_eq!(fs::read(&copied).unwrap(), jpeg);
}

#[test]
fn test_undated_zero_folder() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("scan.png"), b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();

    let out = datesort(
        &["-s", "src", "-d", "out", "--dry-run=false", "--undated", "zero"],
        dir.path(),
    );
    assert_eq!(out.status.code(), Some(0));
    assert!(dir.path().join("out/0000/00/00/scan.png").is_file());
}

#[test]
fn test_blocked_destination_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.jpg"), jpeg_with_date("2021:06:15 10:30:00")).unwrap();
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();
    fs::write(out_dir.join("2021"), b"in the way").unwrap();

    let out = datesort(&["-s", "src", "-d", "out", "--dry-run=false"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(fs::read(out_dir.join("2021")).unwrap(), b"in the way");
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 1);
}
