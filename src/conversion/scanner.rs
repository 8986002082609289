//! Directory inventory.
//!
//! A scan enumerates the direct children of the chosen directory, keeps only
//! files whose content sniffs as PNG or WebP, and returns them in a stable
//! name order. The inventory is rebuilt from scratch on every scan; entries
//! are never mutated in place.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use image::ImageFormat;
use walkdir::WalkDir;

use super::{PNG_MIME, WEBP_MIME};
use crate::error::ConvertError;

/// Bytes read from the head of each candidate file. Enough for the PNG
/// signature and the RIFF/WEBP header.
const SNIFF_LEN: usize = 64;

/// One convertible file found by a scan.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    /// File name, unique within a scan.
    pub name: String,
    pub path: PathBuf,
    /// Size in bytes at scan time.
    pub size: u64,
    /// Always `image/png` or `image/webp`.
    pub mime_type: &'static str,
    pub last_modified: SystemTime,
}

/// Enumerate the direct children of `dir` and build the inventory.
///
/// Subdirectories and non-image files are skipped silently; a failure to
/// enumerate the directory itself (deleted, permission revoked mid-scan)
/// surfaces as a read error. The result is sorted by name ascending,
/// case-insensitively.
pub fn scan(dir: &Path) -> Result<Vec<ImageEntry>, ConvertError> {
    let mut entries = Vec::new();

    for item in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let item = item.map_err(|err| ConvertError::Read {
            name: dir.display().to_string(),
            source: err
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("directory enumeration failed")),
        })?;
        if !item.file_type().is_file() {
            continue;
        }
        let Some(name) = item.path().file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(mime_type) = sniff_mime(item.path()) else {
            continue;
        };
        // A file vanishing between listing and stat is treated like a
        // non-file entry.
        let Ok(metadata) = item.metadata() else {
            continue;
        };
        entries.push(ImageEntry {
            name: name.to_string(),
            path: item.path().to_path_buf(),
            size: metadata.len(),
            mime_type,
            last_modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(entries)
}

/// Content-first type detection from magic bytes.
///
/// Extensions never override the sniff: a mis-tagged file is excluded even
/// if its name suggests PNG or WebP.
fn sniff_mime(path: &Path) -> Option<&'static str> {
    let mut head = [0u8; SNIFF_LEN];
    let mut file = File::open(path).ok()?;
    let read = file.read(&mut head).ok()?;
    match image::guess_format(&head[..read]) {
        Ok(ImageFormat::Png) => Some(PNG_MIME),
        Ok(ImageFormat::WebP) => Some(WEBP_MIME),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::fs;
    use tempfile::tempdir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        RgbaImage::new(width, height)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
        let canvas = RgbaImage::new(width, height);
        webp::Encoder::from_rgba(canvas.as_raw(), width, height)
            .encode_simple(false, 92.0)
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.png"), png_bytes(4, 4)).unwrap();
        fs::write(dir.path().join("A.webp"), webp_bytes(4, 4)).unwrap();
        fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();
        // PNG name, JPEG magic: the declared content wins over the extension
        fs::write(
            dir.path().join("fake.png"),
            [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00],
        )
        .unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("deep.png"), png_bytes(4, 4)).unwrap();

        let entries = scan(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A.webp", "b.png"]);
        assert!(entries
            .iter()
            .all(|e| e.mime_type == PNG_MIME || e.mime_type == WEBP_MIME));
    }

    #[test]
    fn test_scan_records_metadata() {
        let dir = tempdir().unwrap();
        let bytes = png_bytes(4, 4);
        fs::write(dir.path().join("a.png"), &bytes).unwrap();

        let entries = scan(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.png");
        assert_eq!(entries[0].mime_type, PNG_MIME);
        assert_eq!(entries[0].size, bytes.len() as u64);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(scan(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_directory_is_read_error() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("gone");
        match scan(&gone) {
            Err(ConvertError::Read { .. }) => {}
            other => panic!("expected read error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_scan_extension_never_rescues_content() {
        let dir = tempdir().unwrap();
        // WebP content under a .png name is still inventoried as WebP
        fs::write(dir.path().join("mislabeled.png"), webp_bytes(4, 4)).unwrap();

        let entries = scan(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mime_type, WEBP_MIME);
    }
}
