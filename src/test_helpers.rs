//! Shared test utilities.
//!
//! Provides the known fixture font and ready-made backgrounds so layout and
//! rendering tests are deterministic.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let font = fixture_font().sized(72);
//! let bg = solid_background(1080, 1920);
//! ```

use crate::imaging::FontSource;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =========================================================================
// Fonts
// =========================================================================

/// Path of the bundled fixture font.
pub fn fixture_font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/fonts/DejaVuSans-Bold.ttf")
}

/// The bundled fixture font, parsed. Panics if the fixture is missing.
pub fn fixture_font() -> FontSource {
    FontSource::load(&fixture_font_path())
        .unwrap_or_else(|e| panic!("fixture font unusable: {e}"))
}

// =========================================================================
// Backgrounds
// =========================================================================

/// The dark sample background colour.
pub const DARK: [u8; 3] = [20, 20, 30];

/// Opaque RGB background in the dark sample colour.
pub fn solid_background(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(DARK)))
}

/// Opaque RGBA canvas of one colour.
pub fn solid_rgba(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

// =========================================================================
// Library fixtures
// =========================================================================

/// Temp library with `images/`, `quotes/quotes.txt` and `output/`.
///
/// Each `(name, width, height, rgb)` becomes a PNG in `images/`.
pub fn setup_library(backgrounds: &[(&str, u32, u32, [u8; 3])], captions: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let images = tmp.path().join("images");
    let quotes = tmp.path().join("quotes");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::create_dir_all(&quotes).unwrap();
    std::fs::create_dir_all(tmp.path().join("output")).unwrap();

    for (name, w, h, rgb) in backgrounds {
        RgbImage::from_pixel(*w, *h, Rgb(*rgb))
            .save(images.join(name))
            .unwrap();
    }
    std::fs::write(quotes.join("quotes.txt"), captions.join("\n")).unwrap();
    tmp
}
