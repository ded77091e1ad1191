//! Image I/O backend trait and the error types shared by the imaging stages.
//!
//! The [`ImageBackend`] trait is the boundary between the compositing core and
//! the outside world. It plays two collaborator roles:
//!
//! - **Background Image Source**: `identify` and `load` hand the core a decoded
//!   raster image.
//! - **Image Sink**: `save` persists the finished frame. The composer only ever
//!   calls it with a fully composited image.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::EncodeParams;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures reported by a backend (source or sink side).
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to write image: {0}")]
    Write(String),
}

/// Failures of a single render call.
///
/// Every stage reports one of these to its caller; nothing is retried or
/// downgraded inside the core.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No usable font found (searched: {})", display_paths(.searched))]
    FontNotFound { searched: Vec<PathBuf> },
    #[error("Background image too small or invalid: {0}")]
    ImageTooSmallOrInvalid(String),
    #[error("Caption is empty")]
    EmptyCaption,
    #[error("Render failed: {0}")]
    RenderFailure(String),
    #[error("Sink write failed: {0}")]
    Sink(BackendError),
}

impl RenderError {
    /// Map a background-source failure onto the render error kinds.
    ///
    /// Missing and undecodable backgrounds are both the caller's input problem;
    /// raw I/O errors while reading are treated the same way.
    pub fn from_source(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(path) => {
                Self::ImageTooSmallOrInvalid(format!("{} does not exist", path.display()))
            }
            BackendError::Decode(msg) => Self::ImageTooSmallOrInvalid(msg),
            BackendError::Io(e) => Self::ImageTooSmallOrInvalid(e.to_string()),
            BackendError::Write(msg) => Self::RenderFailure(msg),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image I/O backends.
///
/// `Sync` so a single backend can serve a rayon-parallel batch.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode where the format allows it.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image from disk.
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode and persist a finished frame.
    fn save(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError>;
}
