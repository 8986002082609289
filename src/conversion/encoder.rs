//! Canvas allocation and serialization to the target format.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use super::raster::RasterSource;
use super::{PNG_MIME, WEBP_MIME};
use crate::error::ConvertError;

/// Fixed quality factor for lossy WebP output, on the encoder's 0-100 scale.
pub const WEBP_QUALITY: f32 = 92.0;

/// Draw `source` onto a canvas of its exact dimensions and serialize the
/// canvas to `target_mime`.
///
/// PNG uses the format's lossless default; WebP uses [`WEBP_QUALITY`]. The
/// canvas is never scaled or cropped and the source is blitted at the
/// origin.
pub fn encode(
    name: &str,
    source: &dyn RasterSource,
    target_mime: &str,
) -> Result<Vec<u8>, ConvertError> {
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(ConvertError::encode(name, target_mime, "surface has zero dimension"));
    }

    let mut canvas = RgbaImage::new(width, height);
    source.draw_onto(&mut canvas);

    let bytes = match target_mime {
        PNG_MIME => {
            let mut out = Vec::new();
            PngEncoder::new(&mut out)
                .write_image(canvas.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|err| ConvertError::encode(name, target_mime, err.to_string()))?;
            out
        }
        WEBP_MIME => webp::Encoder::from_rgba(canvas.as_raw(), width, height)
            .encode_simple(false, WEBP_QUALITY)
            .map_err(|err| ConvertError::encode(name, target_mime, format!("{:?}", err)))?
            .to_vec(),
        other => {
            return Err(ConvertError::encode(name, other, "unsupported target type"));
        }
    };

    if bytes.is_empty() {
        return Err(ConvertError::encode(name, target_mime, "encoder produced no data"));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::raster::{BitmapDecoder, DecodeStrategy};
    use image::{ImageFormat, Rgba};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        RgbaImage::from_pixel(width, height, Rgba([12, 34, 56, 255]))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    struct ZeroSource;

    impl RasterSource for ZeroSource {
        fn width(&self) -> u32 {
            0
        }
        fn height(&self) -> u32 {
            0
        }
        fn draw_onto(&self, _canvas: &mut RgbaImage) {}
        fn release(self: Box<Self>) {}
    }

    #[test]
    fn test_encode_to_webp_preserves_dimensions() {
        let source = BitmapDecoder.rasterize("a.png", &png_bytes(10, 7)).unwrap();
        let encoded = encode("a.png", source.as_ref(), WEBP_MIME).unwrap();
        source.release();

        assert!(!encoded.is_empty());
        let decoded = image::load_from_memory(&encoded).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 7));
        assert_eq!(image::guess_format(&encoded).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn test_encode_to_png_preserves_dimensions() {
        let source = BitmapDecoder.rasterize("a.png", &png_bytes(5, 9)).unwrap();
        let encoded = encode("a.png", source.as_ref(), PNG_MIME).unwrap();
        source.release();

        let decoded = image::load_from_memory(&encoded).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 9));
        assert_eq!(image::guess_format(&encoded).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_round_trip_keeps_pixel_dimensions() {
        // a.png -> WebP -> PNG must stay decodable at the original size;
        // lossy pixel values are acceptable.
        let source = BitmapDecoder.rasterize("a.png", &png_bytes(10, 10)).unwrap();
        let as_webp = encode("a.png", source.as_ref(), WEBP_MIME).unwrap();
        source.release();

        let source = BitmapDecoder.rasterize("a.webp", &as_webp).unwrap();
        let as_png = encode("a.webp", source.as_ref(), PNG_MIME).unwrap();
        source.release();

        let decoded = image::load_from_memory(&as_png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
    }

    #[test]
    fn test_zero_dimension_surface_fails() {
        let result = encode("empty.png", &ZeroSource, WEBP_MIME);
        assert!(matches!(result, Err(ConvertError::Encode { .. })));
    }

    #[test]
    fn test_unsupported_target_fails() {
        let source = BitmapDecoder.rasterize("a.png", &png_bytes(2, 2)).unwrap();
        let result = encode("a.png", source.as_ref(), "image/gif");
        source.release();
        assert!(matches!(result, Err(ConvertError::Encode { .. })));
    }
}
