//! Byte-to-raster decoding strategies.
//!
//! The pipeline never decodes bytes directly; it goes through a
//! [`DecodeStrategy`] picked once at startup by [`probe_decoder`]. The
//! preferred strategy decodes entirely in memory; the fallback spools the
//! bytes to a temporary file and decodes through the path-based reader.

use image::codecs::png::PngEncoder;
use image::{imageops, ExtendedColorType, ImageEncoder, ImageReader, RgbaImage};
use std::io::Write;
use tempfile::NamedTempFile;

use crate::error::ConvertError;

/// A decoded raster ready to be drawn onto a canvas.
///
/// `release` must be called exactly once per produced source; move semantics
/// enforce the "exactly once" part, and the spooled variant's `Drop` covers
/// early-return paths so the temporary file never outlives the source.
pub trait RasterSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Blit the decoded pixels onto `canvas` at the origin, no transform.
    fn draw_onto(&self, canvas: &mut RgbaImage);
    /// Free the decode backing store.
    fn release(self: Box<Self>);
}

/// Strategy for turning raw file bytes into a [`RasterSource`].
pub trait DecodeStrategy {
    fn rasterize(&self, name: &str, bytes: &[u8]) -> Result<Box<dyn RasterSource>, ConvertError>;
}

struct BitmapSource {
    pixels: RgbaImage,
}

impl RasterSource for BitmapSource {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn draw_onto(&self, canvas: &mut RgbaImage) {
        imageops::replace(canvas, &self.pixels, 0, 0);
    }

    fn release(self: Box<Self>) {}
}

/// Preferred strategy: decode the byte slice directly.
pub struct BitmapDecoder;

impl DecodeStrategy for BitmapDecoder {
    fn rasterize(&self, name: &str, bytes: &[u8]) -> Result<Box<dyn RasterSource>, ConvertError> {
        let image = image::load_from_memory(bytes)
            .map_err(|err| ConvertError::decode(name, err.to_string()))?;
        Ok(Box::new(BitmapSource {
            pixels: image.to_rgba8(),
        }))
    }
}

struct SpooledSource {
    pixels: RgbaImage,
    spool: NamedTempFile,
}

impl RasterSource for SpooledSource {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn draw_onto(&self, canvas: &mut RgbaImage) {
        imageops::replace(canvas, &self.pixels, 0, 0);
    }

    fn release(self: Box<Self>) {
        let this = *self;
        // Removing the spool can only fail if the file already vanished.
        let _ = this.spool.close();
    }
}

/// Fallback strategy: spool the bytes to a temporary file and decode through
/// the path-based reader. A decode failure drops the spool before returning,
/// so the temporary file is reclaimed on both outcomes.
pub struct SpoolDecoder;

impl DecodeStrategy for SpoolDecoder {
    fn rasterize(&self, name: &str, bytes: &[u8]) -> Result<Box<dyn RasterSource>, ConvertError> {
        let mut spool =
            NamedTempFile::new().map_err(|err| ConvertError::decode(name, err.to_string()))?;
        spool
            .write_all(bytes)
            .and_then(|_| spool.flush())
            .map_err(|err| ConvertError::decode(name, err.to_string()))?;

        let image = ImageReader::open(spool.path())
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| ConvertError::decode(name, err.to_string()))?
            .decode()
            .map_err(|err| ConvertError::decode(name, err.to_string()))?;

        Ok(Box::new(SpooledSource {
            pixels: image.to_rgba8(),
            spool,
        }))
    }
}

/// Select the decode strategy once at startup.
///
/// The probe encodes a 1×1 PNG and decodes it back in memory; if that round
/// trip works the in-memory decoder is used, otherwise the spooled reader.
pub fn probe_decoder() -> Box<dyn DecodeStrategy> {
    let probe = RgbaImage::new(1, 1);
    let mut bytes = Vec::new();
    let in_memory = PngEncoder::new(&mut bytes)
        .write_image(probe.as_raw(), 1, 1, ExtendedColorType::Rgba8)
        .is_ok()
        && image::load_from_memory(&bytes).is_ok();

    if in_memory {
        Box::new(BitmapDecoder)
    } else {
        Box::new(SpoolDecoder)
    }
}
