//! Font resolution and sized font handles.
//!
//! Resolution is a pure scan over an ordered candidate list: an explicit path
//! wins when it exists, otherwise the first existing candidate does. The only
//! side effect is the filesystem existence probe.
//!
//! A [`FontSource`] parses the font file once. Every call to
//! [`FontSource::sized`] derives a fresh, immutable [`FontHandle`] for one
//! pixel size; handles are never resized in place.

use super::backend::RenderError;
use rusttype::{Font, Scale, VMetrics};
use std::path::{Path, PathBuf};

/// Pick the font file to use.
///
/// See [`resolve_font_path_with`] for the rules; this variant probes the real
/// filesystem.
pub fn resolve_font_path(
    explicit: Option<&Path>,
    candidates: &[PathBuf],
) -> Result<PathBuf, RenderError> {
    resolve_font_path_with(explicit, candidates, Path::is_file)
}

/// Pick the font file to use, with an injectable existence probe.
///
/// - An `explicit` path that exists is used unconditionally.
/// - Otherwise `candidates` are checked in declared order; the first that
///   exists wins.
/// - If nothing exists the result is [`RenderError::FontNotFound`] listing
///   every path that was probed.
pub fn resolve_font_path_with(
    explicit: Option<&Path>,
    candidates: &[PathBuf],
    exists: impl Fn(&Path) -> bool,
) -> Result<PathBuf, RenderError> {
    if let Some(path) = explicit.filter(|p| exists(*p)) {
        return Ok(path.to_path_buf());
    }
    if let Some(found) = candidates.iter().find(|p| exists(p.as_path())) {
        return Ok(found.clone());
    }
    let searched = explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(candidates.iter().cloned())
        .collect();
    Err(RenderError::FontNotFound { searched })
}

/// A parsed scalable font file.
#[derive(Clone)]
pub struct FontSource {
    path: PathBuf,
    font: Font<'static>,
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSource").field("path", &self.path).finish()
    }
}

impl FontSource {
    /// Read and parse a font file.
    ///
    /// A missing file is `FontNotFound`; unparsable data is `RenderFailure`
    /// (the file exists, it just isn't a font we can draw with).
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|_| RenderError::FontNotFound {
            searched: vec![path.to_path_buf()],
        })?;
        Self::from_bytes(path, bytes)
    }

    /// Parse font data that has already been read. `path` is kept for display.
    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = Font::try_from_vec(bytes).ok_or_else(|| {
            RenderError::RenderFailure(format!("{} is not a usable font", path.display()))
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            font,
        })
    }

    /// Resolve a font path and load it in one step.
    pub fn resolve(explicit: Option<&Path>, candidates: &[PathBuf]) -> Result<Self, RenderError> {
        let path = resolve_font_path(explicit, candidates)?;
        Self::load(&path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Derive a handle for one pixel size.
    ///
    /// `px` is the em size. rusttype scales by full line height
    /// (ascent - descent), so the em size is converted through the font's
    /// unscaled metrics.
    pub fn sized(&self, px: u32) -> FontHandle {
        let v = self.font.v_metrics_unscaled();
        let units_per_em = f32::from(self.font.units_per_em());
        let height = if units_per_em > 0.0 {
            px as f32 * (v.ascent - v.descent) / units_per_em
        } else {
            px as f32
        };
        FontHandle {
            font: self.font.clone(),
            scale: Scale::uniform(height),
            size: px,
        }
    }
}

/// A font at one fixed pixel size.
#[derive(Clone)]
pub struct FontHandle {
    font: Font<'static>,
    scale: Scale,
    size: u32,
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle").field("size", &self.size).finish()
    }
}

impl FontHandle {
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn font(&self) -> &Font<'static> {
        &self.font
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn v_metrics(&self) -> VMetrics {
        self.font.v_metrics(self.scale)
    }

    /// Height of one line of ink: ascent to descent, rounded up.
    pub fn line_height(&self) -> u32 {
        let v = self.v_metrics();
        (v.ascent - v.descent).ceil().max(0.0) as u32
    }
}
