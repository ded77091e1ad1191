//! Pure Rust image I/O backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the requested quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! Frames are encoded into memory first and written with a single
//! `fs::write`, so an encoder failure never leaves a truncated file behind.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{EncodeParams, OutputFormat};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;

/// Background formats this backend can read, by extension.
const BACKGROUND_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    BACKGROUND_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the background file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Filesystem backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode(
    image: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Cursor::new(Vec::new());
    let result = match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel; the encoder rejects RGBA input.
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        }
        OutputFormat::Png => image.write_with_encoder(PngEncoder::new(&mut buf)),
    };
    result.map_err(|e| BackendError::Write(format!("{format:?} encode failed: {e}")))?;
    Ok(buf.into_inner())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        if !path.exists() {
            return Err(BackendError::NotFound(path.to_path_buf()));
        }
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::Decode(format!("Failed to read dimensions of {}: {e}", path.display()))
        })?;
        Ok(Dimensions { width, height })
    }

    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        if !path.exists() {
            return Err(BackendError::NotFound(path.to_path_buf()));
        }
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode(format!("Failed to decode {}: {e}", path.display())))
    }

    fn save(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError> {
        let quality = params.quality.value().min(100) as u8;
        let bytes = encode(image, params.format, quality)?;
        std::fs::write(&params.output, bytes).map_err(|e| {
            BackendError::Write(format!("Failed to write {}: {e}", params.output.display()))
        })
    }
}
