//! Caption compositing: fonts, layout, vignette, outlined text.
//!
//! | Stage | Module | Crate |
//! |---|---|---|
//! | **Font resolution** | [`font`] | `rusttype` |
//! | **Wrapping + measurement** | [`layout`] | `rusttype`, `textwrap` |
//! | **Vignette** | [`vignette`] | `image` |
//! | **Outlined text** | [`outline`] | `rusttype`, `image` |
//! | **Decode / encode** | [`rust_backend`] | `image` (JPEG, PNG, WebP) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for sizing and placement math (unit testable)
//! - **Parameters**: Data structures describing styles and encode targets
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`CaptionComposer`], combining all of the above

pub mod backend;
pub mod calculations;
pub mod font;
pub mod layout;
pub mod operations;
pub mod outline;
mod params;
pub mod rust_backend;
pub mod vignette;

pub use backend::{BackendError, Dimensions, ImageBackend, RenderError};
pub use font::{FontHandle, FontSource, resolve_font_path};
pub use layout::{TextBlock, WrapStrategy};
pub use operations::{
    CaptionComposer, CaptionMode, ComposerConfig, PlacedBlock, RenderSummary, plan_label_caption,
    plan_single,
};
pub use params::{
    Align, ColorModel, EncodeParams, OutputFormat, Quality, StyleSpec, parse_hex_color,
};
pub use rust_backend::{RustBackend, supported_input_extensions};
