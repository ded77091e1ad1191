//! Background and caption library.
//!
//! Finds the inputs a batch draws from:
//!
//! ```text
//! images/                  # backgrounds, scanned one level deep
//! ├── alley.jpg
//! ├── rooftop.png
//! └── notes.txt            # ignored (not an image)
//! quotes/
//! └── quotes.txt           # one caption per line, blank lines ignored
//! ```
//!
//! Not every background makes a readable post. A background is *usable* when
//! both edges reach the minimum dimension and its mean luma is below the
//! brightness ceiling, so white outlined text keeps its contrast. Unusable
//! backgrounds are skipped with a warning rather than failing the run.
//!
//! When the directory holds no images at all, a dark 1080 x 1920 sample is
//! written so a fresh checkout can render immediately.

use crate::config::LibraryConfig;
use crate::imaging::{
    BackendError, EncodeParams, ImageBackend, OutputFormat, Quality, supported_input_extensions,
};
use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File name of the generated sample background.
pub const SAMPLE_BACKGROUND: &str = "sample_dark_bg.jpg";
/// Sample background size (portrait short-form video frame).
pub const SAMPLE_SIZE: (u32, u32) = (1080, 1920);
/// Sample background colour.
pub const SAMPLE_COLOR: [u8; 3] = [20, 20, 30];

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Backgrounds directory not found: {0}")]
    MissingImagesDir(PathBuf),
    #[error("Captions file not found: {0}")]
    MissingCaptions(PathBuf),
    #[error("No captions in {0}")]
    NoCaptions(PathBuf),
    #[error("No usable backgrounds in {0}")]
    NoUsableBackgrounds(PathBuf),
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Everything a batch draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    pub backgrounds: Vec<PathBuf>,
    pub captions: Vec<String>,
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            supported_input_extensions().contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// List background images directly inside `dir`, sorted by file name.
pub fn scan_backgrounds(dir: &Path) -> Result<Vec<PathBuf>, LibraryError> {
    if !dir.is_dir() {
        return Err(LibraryError::MissingImagesDir(dir.to_path_buf()));
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Read captions: one per line, trimmed, blank lines dropped.
pub fn load_captions(path: &Path) -> Result<Vec<String>, LibraryError> {
    if !path.is_file() {
        return Err(LibraryError::MissingCaptions(path.to_path_buf()));
    }
    let captions: Vec<String> = std::fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    if captions.is_empty() {
        return Err(LibraryError::NoCaptions(path.to_path_buf()));
    }
    Ok(captions)
}

/// Thresholds a background must meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suitability {
    pub min_dimension: u32,
    /// Mean luma ceiling (exclusive). `None` disables the check.
    pub max_brightness: Option<f64>,
}

impl Suitability {
    pub fn from_config(config: &LibraryConfig) -> Self {
        Self {
            min_dimension: config.min_dimension,
            max_brightness: (config.max_brightness > 0).then_some(config.max_brightness as f64),
        }
    }
}

/// Outcome of a suitability check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Usable,
    TooSmall { width: u32, height: u32 },
    TooBright { mean_luma: f64 },
}

/// Mean 8-bit luma of an image.
pub fn mean_luma(image: &DynamicImage) -> f64 {
    let luma = image.to_luma8();
    let count = luma.width() as usize * luma.height() as usize;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = luma.pixels().map(|p| p[0] as u64).sum();
    sum as f64 / count as f64
}

/// Judge one background. Dimensions are checked from the header first; the
/// image is only decoded when a brightness ceiling is set.
pub fn check_background(
    backend: &impl ImageBackend,
    path: &Path,
    rules: &Suitability,
) -> Result<Verdict, BackendError> {
    let dims = backend.identify(path)?;
    if dims.width < rules.min_dimension || dims.height < rules.min_dimension {
        return Ok(Verdict::TooSmall {
            width: dims.width,
            height: dims.height,
        });
    }
    if let Some(ceiling) = rules.max_brightness {
        let mean = mean_luma(&backend.load(path)?);
        if mean >= ceiling {
            return Ok(Verdict::TooBright { mean_luma: mean });
        }
    }
    Ok(Verdict::Usable)
}

/// One background and how it fared against the rules.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundReport {
    pub path: PathBuf,
    /// `Err` holds the backend failure when the file could not be read.
    pub verdict: Result<Verdict, String>,
}

impl BackgroundReport {
    pub fn is_usable(&self) -> bool {
        self.verdict == Ok(Verdict::Usable)
    }
}

/// Judge every candidate, keeping their order.
pub fn survey_backgrounds(
    backend: &impl ImageBackend,
    candidates: &[PathBuf],
    rules: &Suitability,
) -> Vec<BackgroundReport> {
    candidates
        .iter()
        .map(|path| BackgroundReport {
            path: path.clone(),
            verdict: check_background(backend, path, rules).map_err(|e| e.to_string()),
        })
        .collect()
}

/// Keep only usable backgrounds. Rejections and unreadable files are logged.
pub fn usable_backgrounds(
    backend: &impl ImageBackend,
    candidates: &[PathBuf],
    rules: &Suitability,
) -> Vec<PathBuf> {
    survey_backgrounds(backend, candidates, rules)
        .into_iter()
        .filter_map(|report| {
            let path = report.path.display();
            match report.verdict {
                Ok(Verdict::Usable) => {
                    debug!(path = %path, "background usable");
                    return Some(report.path);
                }
                Ok(Verdict::TooSmall { width, height }) => {
                    warn!(path = %path, width, height, "skipping background: too small");
                }
                Ok(Verdict::TooBright { mean_luma }) => {
                    warn!(path = %path, mean_luma, "skipping background: too bright");
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "skipping unreadable background");
                }
            }
            None
        })
        .collect()
}

/// Write the dark sample background into `dir` and return its path.
pub fn write_sample_background(
    backend: &impl ImageBackend,
    dir: &Path,
) -> Result<PathBuf, LibraryError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(SAMPLE_BACKGROUND);
    let (w, h) = SAMPLE_SIZE;
    let sample = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(SAMPLE_COLOR)));
    backend.save(
        &sample,
        &EncodeParams {
            output: path.clone(),
            format: OutputFormat::Jpeg,
            quality: Quality::default(),
        },
    )?;
    Ok(path)
}

/// Scan backgrounds and captions, creating a sample background when the
/// directory has none, and filtering out unusable backgrounds.
pub fn load_library(
    backend: &impl ImageBackend,
    config: &LibraryConfig,
) -> Result<Library, LibraryError> {
    let captions = load_captions(&config.captions_file)?;

    std::fs::create_dir_all(&config.images_dir)?;
    let mut candidates = scan_backgrounds(&config.images_dir)?;
    if candidates.is_empty() {
        let sample = write_sample_background(backend, &config.images_dir)?;
        info!(path = %sample.display(), "no backgrounds found, created a sample");
        candidates.push(sample);
    }

    let backgrounds = usable_backgrounds(backend, &candidates, &Suitability::from_config(config));
    if backgrounds.is_empty() {
        return Err(LibraryError::NoUsableBackgrounds(config.images_dir.clone()));
    }
    info!(
        backgrounds = backgrounds.len(),
        skipped = candidates.len() - backgrounds.len(),
        captions = captions.len(),
        "library loaded"
    );
    Ok(Library {
        backgrounds,
        captions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::test_helpers::{DARK, setup_library};
    use tempfile::TempDir;

    fn library_config(root: &Path) -> LibraryConfig {
        LibraryConfig {
            images_dir: root.join("images"),
            captions_file: root.join("quotes/quotes.txt"),
            output_dir: root.join("output"),
            ..LibraryConfig::default()
        }
    }

    fn lenient() -> Suitability {
        Suitability {
            min_dimension: 0,
            max_brightness: None,
        }
    }

    // =========================================================================
    // scan tests
    // =========================================================================

    #[test]
    fn scan_finds_images_sorted_and_ignores_others() {
        let tmp = setup_library(&[("b.png", 4, 4, DARK), ("a.png", 4, 4, DARK)], &["x"]);
        std::fs::write(tmp.path().join("images/notes.txt"), "hi").unwrap();
        std::fs::create_dir(tmp.path().join("images/nested.png")).unwrap();

        let found = scan_backgrounds(&tmp.path().join("images")).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn scan_matches_extensions_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("SHOUT.JPG"), b"x").unwrap();
        assert_eq!(scan_backgrounds(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn scan_missing_directory_is_error() {
        let err = scan_backgrounds(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, LibraryError::MissingImagesDir(_)));
    }

    // =========================================================================
    // caption tests
    // =========================================================================

    #[test]
    fn captions_are_trimmed_and_blank_lines_dropped() {
        let tmp = setup_library(&[], &["  first  ", "", "second", "   "]);
        let captions = load_captions(&tmp.path().join("quotes/quotes.txt")).unwrap();
        assert_eq!(captions, vec!["first", "second"]);
    }

    #[test]
    fn empty_caption_file_is_error() {
        let tmp = setup_library(&[], &["", "  "]);
        let err = load_captions(&tmp.path().join("quotes/quotes.txt")).unwrap_err();
        assert!(matches!(err, LibraryError::NoCaptions(_)));
    }

    #[test]
    fn missing_caption_file_is_error() {
        let err = load_captions(Path::new("/nope/quotes.txt")).unwrap_err();
        assert!(matches!(err, LibraryError::MissingCaptions(_)));
    }

    // =========================================================================
    // suitability tests
    // =========================================================================

    #[test]
    fn mean_luma_of_solid_images() {
        let black = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([0, 0, 0])));
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([255, 255, 255])));
        assert_eq!(mean_luma(&black), 0.0);
        assert_eq!(mean_luma(&white), 255.0);
    }

    #[test]
    fn small_background_is_rejected() {
        let tmp = setup_library(&[("small.png", 100, 900, DARK)], &["x"]);
        let rules = Suitability {
            min_dimension: 640,
            max_brightness: None,
        };
        let verdict =
            check_background(&RustBackend::new(), &tmp.path().join("images/small.png"), &rules)
                .unwrap();
        assert_eq!(
            verdict,
            Verdict::TooSmall {
                width: 100,
                height: 900
            }
        );
    }

    #[test]
    fn bright_background_is_rejected() {
        let tmp = setup_library(&[("snow.png", 8, 8, [240, 240, 240])], &["x"]);
        let rules = Suitability {
            min_dimension: 0,
            max_brightness: Some(100.0),
        };
        let verdict =
            check_background(&RustBackend::new(), &tmp.path().join("images/snow.png"), &rules)
                .unwrap();
        assert!(matches!(verdict, Verdict::TooBright { .. }));
    }

    #[test]
    fn usable_backgrounds_filters_and_keeps_order() {
        let tmp = setup_library(
            &[
                ("a.png", 8, 8, DARK),
                ("b.png", 8, 8, [250, 250, 250]),
                ("c.png", 8, 8, DARK),
            ],
            &["x"],
        );
        let candidates = scan_backgrounds(&tmp.path().join("images")).unwrap();
        let rules = Suitability {
            max_brightness: Some(100.0),
            ..lenient()
        };
        let usable = usable_backgrounds(&RustBackend::new(), &candidates, &rules);
        assert_eq!(usable, vec![candidates[0].clone(), candidates[2].clone()]);
    }

    #[test]
    fn unreadable_background_is_skipped() {
        let tmp = setup_library(&[("ok.png", 8, 8, DARK)], &["x"]);
        std::fs::write(tmp.path().join("images/broken.png"), b"nope").unwrap();
        let candidates = scan_backgrounds(&tmp.path().join("images")).unwrap();
        let usable = usable_backgrounds(&RustBackend::new(), &candidates, &lenient());
        assert_eq!(usable.len(), 1);
        assert!(usable[0].ends_with("ok.png"));
    }

    #[test]
    fn survey_reports_every_candidate() {
        let tmp = setup_library(&[("a.png", 8, 8, DARK), ("b.png", 4, 4, DARK)], &["x"]);
        std::fs::write(tmp.path().join("images/c.png"), b"nope").unwrap();
        let candidates = scan_backgrounds(&tmp.path().join("images")).unwrap();
        let rules = Suitability {
            min_dimension: 6,
            max_brightness: None,
        };
        let reports = survey_backgrounds(&RustBackend::new(), &candidates, &rules);

        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_usable());
        assert_eq!(
            reports[1].verdict,
            Ok(Verdict::TooSmall {
                width: 4,
                height: 4
            })
        );
        assert!(reports[2].verdict.is_err());
    }

    #[test]
    fn zero_brightness_ceiling_disables_check() {
        let config = LibraryConfig {
            max_brightness: 0,
            ..LibraryConfig::default()
        };
        assert_eq!(Suitability::from_config(&config).max_brightness, None);
    }

    // =========================================================================
    // load_library tests
    // =========================================================================

    #[test]
    fn load_library_creates_sample_when_empty() {
        let tmp = setup_library(&[], &["Discipline beats motivation."]);
        let library = load_library(&RustBackend::new(), &library_config(tmp.path())).unwrap();

        let sample = tmp.path().join("images").join(SAMPLE_BACKGROUND);
        assert_eq!(library.backgrounds, vec![sample.clone()]);
        assert_eq!(image::image_dimensions(&sample).unwrap(), SAMPLE_SIZE);
        assert_eq!(library.captions, vec!["Discipline beats motivation."]);
    }

    #[test]
    fn load_library_fails_when_nothing_is_usable() {
        let tmp = setup_library(&[("tiny.png", 10, 10, DARK)], &["x"]);
        let err = load_library(&RustBackend::new(), &library_config(tmp.path())).unwrap_err();
        assert!(matches!(err, LibraryError::NoUsableBackgrounds(_)));
    }

    #[test]
    fn load_library_requires_captions_first() {
        let tmp = TempDir::new().unwrap();
        let err = load_library(&RustBackend::new(), &library_config(tmp.path())).unwrap_err();
        assert!(matches!(err, LibraryError::MissingCaptions(_)));
        // no sample written when captions are missing
        assert!(!tmp.path().join("images").exists());
    }
}
