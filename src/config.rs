//! Studio configuration module.
//!
//! Handles loading, validating, and merging `povframe.toml`. A missing file
//! means stock defaults; a present file only needs the keys it overrides.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [fonts]
//! # path = "/path/to/font.ttf"   # Explicit font, used when it exists
//! preferred = [...]              # Tried first, in order (handwriting faces)
//! fallbacks = [...]              # Tried next, in order (system sans faces)
//!
//! [style]
//! fill = "#ffffff"               # #rrggbb or #rrggbbaa
//! outline = "#000000"
//! outline_width = 2              # Outline half-width in pixels (0-16)
//! # align = "center"             # Override the mode's line alignment
//!
//! [vignette]
//! bands = 100                    # Nested darkening bands (0 disables)
//!
//! [layout]
//! mode = "label"                 # "single" | "label"
//! label = "POV"                  # Label text in label mode
//! # wrap = "measured"            # Override the mode's wrap: "measured" | "estimate"
//!
//! [output]
//! format = "jpeg"                # "jpeg" | "png"
//! quality = 95                   # 1-100, lossy formats only
//!
//! [library]
//! images_dir = "images"
//! captions_file = "quotes/quotes.txt"
//! output_dir = "output"
//! min_dimension = 640            # Skip backgrounds smaller than this on either edge
//! max_brightness = 100           # Skip backgrounds with mean luma >= this (0 disables)
//!
//! [processing]
//! max_processes = 4              # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only switch to the single-caption style
//! [layout]
//! mode = "single"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{
    Align, CaptionMode, ComposerConfig, EncodeParams, OutputFormat, Quality, StyleSpec,
    WrapStrategy, parse_hex_color,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "povframe.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `povframe.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Font file lookup.
    pub fonts: FontsConfig,
    /// Text colours, outline width, alignment override.
    pub style: StyleConfig,
    /// Background darkening.
    pub vignette: VignetteConfig,
    /// Overlay style and wrapping.
    pub layout: LayoutConfig,
    /// Encoded output format.
    pub output: OutputConfig,
    /// Where backgrounds, captions and rendered posts live.
    pub library: LibraryConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl StudioConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("style.fill", &self.style.fill),
            ("style.outline", &self.style.outline),
        ] {
            if parse_hex_color(value).is_none() {
                return Err(ConfigError::Validation(format!(
                    "{key} must be #rrggbb or #rrggbbaa, got {value:?}"
                )));
            }
        }
        if self.style.outline_width > 16 {
            return Err(ConfigError::Validation(
                "style.outline_width must be 0-16".into(),
            ));
        }
        if self.vignette.bands > 255 {
            return Err(ConfigError::Validation(
                "vignette.bands must be 0-255".into(),
            ));
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.layout.mode == LayoutMode::Label && self.layout.label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "layout.label must not be empty in label mode".into(),
            ));
        }
        Ok(())
    }

    /// Font candidates in lookup order: preferred faces, then fallbacks.
    pub fn font_candidates(&self) -> Vec<PathBuf> {
        self.fonts
            .preferred
            .iter()
            .chain(&self.fonts.fallbacks)
            .cloned()
            .collect()
    }

    pub fn caption_mode(&self) -> CaptionMode {
        match self.layout.mode {
            LayoutMode::Single => CaptionMode::Single,
            LayoutMode::Label => CaptionMode::LabelCaption {
                label: self.layout.label.trim().to_string(),
            },
        }
    }

    /// Text style with the configured colours. Alignment is left at its
    /// default; the composer fills it in per mode.
    pub fn style_spec(&self) -> Result<StyleSpec, ConfigError> {
        let color = |key: &str, value: &str| {
            parse_hex_color(value).ok_or_else(|| {
                ConfigError::Validation(format!("{key} must be #rrggbb or #rrggbbaa"))
            })
        };
        Ok(StyleSpec {
            fill: color("style.fill", &self.style.fill)?,
            outline: color("style.outline", &self.style.outline)?,
            outline_width: self.style.outline_width,
            align: self.style.align.unwrap_or_default(),
        })
    }

    /// Everything the caption composer needs.
    pub fn composer_config(&self) -> Result<ComposerConfig, ConfigError> {
        Ok(ComposerConfig {
            mode: self.caption_mode(),
            style: self.style_spec()?,
            align: self.style.align,
            wrap: self.layout.wrap,
            vignette_bands: self.vignette.bands,
        })
    }

    /// Sink parameters for one output file.
    pub fn encode_params(&self, output: PathBuf) -> EncodeParams {
        EncodeParams {
            output,
            format: self.output.format,
            quality: Quality::new(self.output.quality),
        }
    }
}

/// Font file lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Explicit font file. Used unconditionally when it exists.
    pub path: Option<PathBuf>,
    /// Faces tried first, in order.
    pub preferred: Vec<PathBuf>,
    /// Faces tried after `preferred`, in order.
    pub fallbacks: Vec<PathBuf>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            path: None,
            preferred: vec![
                "/usr/share/fonts/truetype/msttcorefonts/Comic_Sans_MS.ttf".into(),
                "/usr/share/fonts/truetype/comic/comic.ttf".into(),
            ],
            fallbacks: vec![
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf".into(),
                "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf".into(),
                "/usr/share/fonts/truetype/ubuntu/Ubuntu-Bold.ttf".into(),
                "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf".into(),
            ],
        }
    }
}

/// Text style settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Fill colour, `#rrggbb` or `#rrggbbaa`.
    pub fill: String,
    /// Outline colour, `#rrggbb` or `#rrggbbaa`.
    pub outline: String,
    /// Outline half-width in pixels.
    pub outline_width: u32,
    /// Line alignment override. Absent means the mode's default.
    pub align: Option<Align>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fill: "#ffffff".to_string(),
            outline: "#000000".to_string(),
            outline_width: 2,
            align: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VignetteConfig {
    pub bands: u32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self { bands: 100 }
    }
}

/// Overlay style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// One centred caption.
    Single,
    /// Label above caption.
    #[default]
    Label,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    /// Label text drawn above the caption in label mode.
    pub label: String,
    /// Wrap strategy override. Absent means the mode's default.
    pub wrap: Option<WrapStrategy>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Label,
            label: "POV".to_string(),
            wrap: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Lossy encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: 95,
        }
    }
}

/// Input and output locations, and which backgrounds are usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Directory of background images.
    pub images_dir: PathBuf,
    /// Text file with one caption per line.
    pub captions_file: PathBuf,
    /// Directory rendered posts are written to.
    pub output_dir: PathBuf,
    /// Backgrounds smaller than this on either edge are skipped.
    pub min_dimension: u32,
    /// Backgrounds whose mean luma (0-255) is at or above this are skipped.
    /// Zero disables the check.
    pub max_brightness: u32,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            images_dir: "images".into(),
            captions_file: "quotes/quotes.txt".into(),
            output_dir: "output".into(),
            min_dimension: 640,
            max_brightness: 100,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(StudioConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it exists but is
/// not valid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<StudioConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StudioConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<StudioConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Returns a fully-commented stock `povframe.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# povframe Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
[fonts]
# Explicit font file. Used unconditionally when it exists.
# path = "/path/to/font.ttf"

# Tried first, in order. The label style looks best in a handwriting face.
preferred = [
    "/usr/share/fonts/truetype/msttcorefonts/Comic_Sans_MS.ttf",
    "/usr/share/fonts/truetype/comic/comic.ttf",
]

# Tried after `preferred`, in order.
fallbacks = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/ubuntu/Ubuntu-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
]

# ---------------------------------------------------------------------------
# Text style
# ---------------------------------------------------------------------------
[style]
# Colours as #rrggbb or #rrggbbaa.
fill = "#ffffff"
outline = "#000000"

# Outline half-width in pixels (0-16). 0 draws fill only.
outline_width = 2

# Line alignment inside a block: "left" | "center".
# Defaults to "left" in single mode and "center" in label mode.
# align = "center"

# ---------------------------------------------------------------------------
# Vignette
# ---------------------------------------------------------------------------
[vignette]
# Nested darkening bands (0-255). 0 disables the vignette.
bands = 100

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# "single": one caption centred in the frame.
# "label":  a short label at 35% height with the caption below it.
mode = "label"

# Label text for label mode.
label = "POV"

# Wrapping: "measured" (real glyph widths) | "estimate" (character count).
# Defaults to "measured" in single mode and "estimate" in label mode.
# wrap = "measured"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# "jpeg" (lossy, no alpha) | "png" (lossless).
format = "jpeg"

# Lossy encoding quality (1 = worst, 100 = best).
quality = 95

# ---------------------------------------------------------------------------
# Library
# ---------------------------------------------------------------------------
[library]
images_dir = "images"
captions_file = "quotes/quotes.txt"
output_dir = "output"

# Backgrounds smaller than this on either edge are skipped.
min_dimension = 640

# Backgrounds with mean luma (0-255) at or above this are skipped, so white
# text stays readable. 0 disables the check.
max_brightness = 100

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = StudioConfig::default();
        assert_eq!(config.layout.mode, LayoutMode::Label);
        assert_eq!(config.layout.label, "POV");
        assert_eq!(config.vignette.bands, 100);
        assert_eq!(config.style.outline_width, 2);
        assert_eq!(config.output.quality, 95);
        assert_eq!(config.library.min_dimension, 640);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[style]
fill = "#ffee00"
"##;
        let config: StudioConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.style.fill, "#ffee00");
        // Default values preserved
        assert_eq!(config.style.outline, "#000000");
        assert_eq!(config.layout.mode, LayoutMode::Label);
    }

    #[test]
    fn parse_enums_and_overrides() {
        let toml = r#"
[style]
align = "center"

[layout]
mode = "single"
wrap = "estimate"

[output]
format = "png"
"#;
        let config: StudioConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.style.align, Some(Align::Center));
        assert_eq!(config.layout.mode, LayoutMode::Single);
        assert_eq!(config.layout.wrap, Some(WrapStrategy::ByCharacterEstimate));
        assert_eq!(config.output.format, OutputFormat::Png);
    }

    // =========================================================================
    // Derived settings tests
    // =========================================================================

    #[test]
    fn font_candidates_are_preferred_then_fallbacks() {
        let config = StudioConfig {
            fonts: FontsConfig {
                path: None,
                preferred: vec!["/p1.ttf".into()],
                fallbacks: vec!["/f1.ttf".into(), "/f2.ttf".into()],
            },
            ..StudioConfig::default()
        };
        assert_eq!(
            config.font_candidates(),
            vec![
                PathBuf::from("/p1.ttf"),
                PathBuf::from("/f1.ttf"),
                PathBuf::from("/f2.ttf")
            ]
        );
    }

    #[test]
    fn composer_config_follows_layout() {
        let mut config = StudioConfig::default();
        let composer = config.composer_config().unwrap();
        assert_eq!(
            composer.mode,
            CaptionMode::LabelCaption {
                label: "POV".to_string()
            }
        );
        assert_eq!(composer.effective_align(), Align::Center);
        assert_eq!(composer.vignette_bands, 100);

        config.layout.mode = LayoutMode::Single;
        config.style.fill = "#ff000080".to_string();
        let composer = config.composer_config().unwrap();
        assert_eq!(composer.mode, CaptionMode::Single);
        assert_eq!(composer.effective_align(), Align::Left);
        assert_eq!(composer.style.fill, image::Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn encode_params_use_output_section() {
        let mut config = StudioConfig::default();
        config.output.quality = 80;
        let params = config.encode_params("/out/post_001.jpg".into());
        assert_eq!(params.format, OutputFormat::Jpeg);
        assert_eq!(params.quality, Quality::new(80));
        assert_eq!(params.output, PathBuf::from("/out/post_001.jpg"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[layout]
mode = "single"

[library]
images_dir = "backgrounds"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.layout.mode, LayoutMode::Single);
        assert_eq!(config.library.images_dir, PathBuf::from("backgrounds"));
        // untouched sections keep stock values
        assert_eq!(config.library.output_dir, PathBuf::from("output"));
        assert_eq!(config.fonts, FontsConfig::default());
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn explicit_font_path_survives_merge() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[fonts]\npath = \"/my/font.ttf\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.fonts.path, Some(PathBuf::from("/my/font.ttf")));
        assert_eq!(config.fonts.fallbacks, FontsConfig::default().fallbacks);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"quality = 95"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"quality = 70"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[output]
format = "jpeg"
quality = 95
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[output]
quality = 70
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let output = merged.get("output").unwrap();
        assert_eq!(output.get("quality").unwrap().as_integer(), Some(70));
        assert_eq!(output.get("format").unwrap().as_str(), Some("jpeg"));
    }

    #[test]
    fn merge_toml_arrays_replace_not_append() {
        let base: toml::Value = toml::from_str(r#"fallbacks = ["/a.ttf", "/b.ttf"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"fallbacks = ["/c.ttf"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("fallbacks").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[output]
qualty = 90
"#;
        let result: Result<StudioConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<StudioConfig, _> = toml::from_str("[outptu]\nquality = 90\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_enum_value_rejected() {
        let result: Result<StudioConfig, _> = toml::from_str("[layout]\nmode = \"triple\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[vignette]\nbandz = 3\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(StudioConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_colour() {
        let mut config = StudioConfig::default();
        config.style.outline = "black".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = StudioConfig::default();
        config.output.quality = 100;
        assert!(config.validate().is_ok());
        config.output.quality = 0;
        assert!(config.validate().is_err());
        config.output.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_band_and_outline_limits() {
        let mut config = StudioConfig::default();
        config.vignette.bands = 256;
        assert!(config.validate().is_err());

        let mut config = StudioConfig::default();
        config.style.outline_width = 17;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_label_required_only_in_label_mode() {
        let mut config = StudioConfig::default();
        config.layout.label = "  ".to_string();
        assert!(config.validate().is_err());
        config.layout.mode = LayoutMode::Single;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[output]\nquality = 200\n").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Processing tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_never_zero() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: StudioConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[fonts]",
            "[style]",
            "[vignette]",
            "[layout]",
            "[output]",
            "[library]",
            "[processing]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        for key in ["fonts", "style", "vignette", "layout", "output", "library", "processing"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
