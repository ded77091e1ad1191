//! Output filename convention.
//!
//! Batch posts are numbered from 1 with a three-digit, zero-padded counter;
//! the label style carries a `pov` marker so both styles can share an output
//! directory:
//! - label mode, post 1 → `post_pov_001.jpg`
//! - single mode, post 12 → `post_012.jpg`
//!
//! One-off renders without an explicit output path are named after their
//! background:
//! - `alley.png`, label mode → `alley_pov_quote_centered.jpg`
//! - `alley.png`, single mode → `alley_quote.jpg`

use crate::imaging::{CaptionMode, OutputFormat};
use std::path::Path;

/// File name of batch post `number` (1-based).
pub fn post_file_name(mode: &CaptionMode, number: usize, format: OutputFormat) -> String {
    let ext = format.extension();
    match mode {
        CaptionMode::Single => format!("post_{number:03}.{ext}"),
        CaptionMode::LabelCaption { .. } => format!("post_pov_{number:03}.{ext}"),
    }
}

/// File name for a one-off render of `background`.
pub fn render_file_name(background: &Path, mode: &CaptionMode, format: OutputFormat) -> String {
    let stem = background
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("frame");
    let ext = format.extension();
    match mode {
        CaptionMode::Single => format!("{stem}_quote.{ext}"),
        CaptionMode::LabelCaption { .. } => format!("{stem}_pov_quote_centered.{ext}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> CaptionMode {
        CaptionMode::LabelCaption {
            label: "POV".to_string(),
        }
    }

    #[test]
    fn post_names_are_zero_padded() {
        assert_eq!(post_file_name(&label(), 1, OutputFormat::Jpeg), "post_pov_001.jpg");
        assert_eq!(post_file_name(&CaptionMode::Single, 12, OutputFormat::Jpeg), "post_012.jpg");
    }

    #[test]
    fn post_names_grow_past_three_digits() {
        assert_eq!(post_file_name(&CaptionMode::Single, 1234, OutputFormat::Png), "post_1234.png");
    }

    #[test]
    fn render_names_follow_background_stem() {
        let bg = Path::new("/lib/images/alley.png");
        assert_eq!(
            render_file_name(bg, &label(), OutputFormat::Jpeg),
            "alley_pov_quote_centered.jpg"
        );
        assert_eq!(
            render_file_name(bg, &CaptionMode::Single, OutputFormat::Png),
            "alley_quote.png"
        );
    }

    #[test]
    fn render_name_without_stem_falls_back() {
        assert_eq!(
            render_file_name(Path::new("/"), &CaptionMode::Single, OutputFormat::Jpeg),
            "frame_quote.jpg"
        );
    }
}
