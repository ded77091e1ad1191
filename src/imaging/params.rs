//! Parameter types for caption rendering.
//!
//! These structs describe *what* to draw and how to encode it, not *how* the
//! pixels are produced. They are the interface between the high-level
//! [`operations`](super::operations) module (which decides what goes where)
//! and the stages that touch pixels ([`outline`](super::outline),
//! [`vignette`](super::vignette), the [`backend`](super::backend)).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 95). Clamped on construction.
//! - [`Align`]: Per-line horizontal alignment inside a multi-line block.
//! - [`StyleSpec`]: Fill colour, outline colour, outline half-width, alignment.
//! - [`OutputFormat`]: Encoded format handed to the sink, and its colour model.
//! - [`EncodeParams`]: Everything a sink write needs: output path, format, quality.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Horizontal alignment of lines within a text block.
///
/// The block itself is always positioned by its bounding box; alignment only
/// moves shorter lines relative to the widest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Visual style of caption text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpec {
    pub fill: Rgba<u8>,
    pub outline: Rgba<u8>,
    /// Outline half-width in pixels. Zero disables the outline passes.
    pub outline_width: u32,
    pub align: Align,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            fill: Rgba([255, 255, 255, 255]),
            outline: Rgba([0, 0, 0, 255]),
            outline_width: 2,
            align: Align::Left,
        }
    }
}

impl StyleSpec {
    /// Same style with a different alignment.
    pub fn aligned(self, align: Align) -> Self {
        Self { align, ..self }
    }
}

/// Colour model of the final frame handed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Rgb,
    Rgba,
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy, honours [`Quality`], no alpha channel.
    #[default]
    Jpeg,
    /// Lossless, keeps the alpha channel. Quality is ignored.
    Png,
}

impl OutputFormat {
    pub fn color_model(self) -> ColorModel {
        match self {
            OutputFormat::Jpeg => ColorModel::Rgb,
            OutputFormat::Png => ColorModel::Rgba,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Parameters for a sink write.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Parse `#rrggbb` or `#rrggbbaa` into an RGBA colour.
///
/// Returns `None` for anything else, including the three-digit shorthand.
pub fn parse_hex_color(s: &str) -> Option<Rgba<u8>> {
    let hex = s.trim().strip_prefix('#')?;
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}
