use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use image::ImageFormat;

/// Number of leading bytes needed for signature sniffing.
pub const HEAD_LEN: usize = 261;

/// ISO-BMFF brands used by HEIF/HEIC files. `image` does not recognise these.
const HEIF_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// Signatures `image` does not know about.
const EXTRA_MAGIC: [(&[u8], &str); 2] = [(b"8BPS", "psd"), (b"II\xBC", "jxr")];

/// Detect the image format from leading bytes. Returns a short format name.
///
/// Only photo formats count. `image` also knows text-like magic such as
/// PNM's `P1`..`P7`, which would match ordinary text files.
pub fn detect(head: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(head) {
        if is_photo_format(format) {
            return Some(format.extensions_str().first().copied().unwrap_or("image"));
        }
    }
    if let Some(&(_, name)) = EXTRA_MAGIC.iter().find(|(magic, _)| head.starts_with(magic)) {
        return Some(name);
    }
    if is_heif(head) {
        return Some("heic");
    }
    None
}

fn is_photo_format(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg
            | ImageFormat::Png
            | ImageFormat::Gif
            | ImageFormat::WebP
            | ImageFormat::Tiff
            | ImageFormat::Bmp
            | ImageFormat::Ico
            | ImageFormat::Avif
    )
}

pub fn is_image(head: &[u8]) -> bool {
    detect(head).is_some()
}

fn is_heif(head: &[u8]) -> bool {
    if head.len() < 12 || &head[4..8] != b"ftyp" {
        return false;
    }
    let box_len = u32::from_be_bytes([head[0], head[1], head[2], head[3]]) as usize;
    let end = box_len.clamp(12, head.len());

    // major brand at 8..12, compatible brands from 16 on
    let major = &head[8..12];
    if HEIF_BRANDS.iter().any(|b| &b[..] == major) {
        return true;
    }
    head.get(16..end)
        .map(|compat| {
            compat
                .chunks_exact(4)
                .any(|brand| HEIF_BRANDS.iter().any(|b| &b[..] == brand))
        })
        .unwrap_or(false)
}

/// Read up to [`HEAD_LEN`] bytes from the start of a file.
pub fn read_head(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(HEAD_LEN);
    file.take(HEAD_LEN as u64).read_to_end(&mut head)?;
    Ok(head)
}
