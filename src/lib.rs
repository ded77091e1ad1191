//! # povframe
//!
//! Composites short text captions onto background photographs to produce
//! vertical thumbnails for short-form video. Every frame gets the same
//! treatment: a fixed centre-weighted vignette, a font size derived from the
//! frame width, greedy word wrapping to the frame, and white text with a black
//! outline so the caption stays readable over any background.
//!
//! # Architecture: Core and Driver
//!
//! ```text
//! imaging    background + caption  →  frame      (font, layout, vignette, outline)
//! library    images/ + quotes.txt  →  Library    (scan, suitability, sample)
//! batch      Library × N           →  output/    (parallel render + manifest.json)
//! ```
//!
//! The [`imaging`] core is a pure function of its inputs: it never logs in
//! place of returning an error, holds no per-render state, and reaches the
//! filesystem only through the [`imaging::ImageBackend`] trait. Everything
//! that decides *which* background and caption to use lives in the driver
//! modules around it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Font resolution, text layout, vignette, outlined text, caption composition |
//! | [`config`] | `povframe.toml` loading, merging onto stock defaults, validation |
//! | [`library`] | Background scan, caption file, suitability check, sample background |
//! | [`queue`] | Shuffled selection without immediate repeats |
//! | [`naming`] | Output filename convention |
//! | [`batch`] | Parallel rendering of N posts and the run manifest |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Font, Many Sizes
//!
//! The font file is read and parsed once per run. Each block derives its own
//! sized handle from the parsed font, so a composer can be shared across the
//! rayon pool without locking.
//!
//! ## Vignette by Lookup Table
//!
//! The vignette is defined as 100 nested rectangles composited one after
//! another. Because the rectangles nest, a pixel's final value depends only on
//! how many of them cover it, so the composite is precomputed per band count
//! and applied in a single pass over the image.
//!
//! ## Outline by Offset Fills
//!
//! Text outlines are drawn by repeating the text in the outline colour at every
//! offset within the outline width, then drawing the fill on top. It needs no
//! stroke primitive and matches the look of the thumbnails this tool replaces.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod library;
pub mod naming;
pub mod output;
pub mod queue;

#[cfg(test)]
pub(crate) mod test_helpers;
