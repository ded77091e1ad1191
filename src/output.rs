//! CLI output formatting for every command.
//!
//! # Post-First Display
//!
//! Each rendered post leads with its positional index and the caption lines
//! as drawn; the background and output file follow as indented context. The
//! output reads as a list of posts, and any line can still be traced back to
//! the files involved.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! alley_pov_quote_centered.jpg (1080x1920, 60px)
//!     Discipline beats
//!     motivation.
//! ```
//!
//! ## Batch
//!
//! ```text
//! 001 Discipline beats motivation.
//!     Background: images/alley.jpg
//!     Output: output/post_pov_001.jpg
//! 002 FAILED
//!     Background: images/rooftop.png
//!     Error: Sink write failed: disk full
//!
//! Rendered 1 of 2 posts (1 failed)
//! Manifest: output/manifest.json
//! ```
//!
//! ## Check
//!
//! ```text
//! Font
//!     /usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf
//!
//! Captions
//!     12 in quotes/quotes.txt
//!
//! Backgrounds
//! 001 alley.jpg: usable
//! 002 beach.jpg: too bright (mean luma 187.4)
//! 003 icon.png: too small (64x64)
//!
//! 1 of 3 backgrounds usable
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::batch::{BatchEvent, BatchManifest, MANIFEST_FILE};
use crate::imaging::{RenderError, RenderSummary};
use crate::library::{BackgroundReport, Verdict};
use std::path::{Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// render
// ============================================================================

/// Format the result of a one-off render: output file, size, then the
/// wrapped caption lines.
pub fn format_render_summary(summary: &RenderSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}x{}, {}px)",
        summary.output.display(),
        summary.width,
        summary.height,
        summary.font_size
    )];
    lines.extend(
        summary
            .lines
            .iter()
            .map(|line| format!("{}{}", indent(1), line)),
    );
    lines
}

pub fn print_render_summary(summary: &RenderSummary) {
    for line in format_render_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// batch
// ============================================================================

/// Format a single batch progress event as display lines.
///
/// Events arrive in completion order, so each leads with the post number.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Rendered {
            number,
            background,
            output,
            lines,
            ..
        } => vec![
            format!("{} {}", format_index(*number), lines.join(" ")),
            format!("{}Background: {}", indent(1), background.display()),
            format!("{}Output: {}", indent(1), output.display()),
        ],
        BatchEvent::Failed {
            number,
            background,
            error,
            ..
        } => vec![
            format!("{} FAILED", format_index(*number)),
            format!("{}Background: {}", indent(1), background.display()),
            format!("{}Error: {}", indent(1), error),
        ],
    }
}

/// Format the closing summary of a batch run.
pub fn format_batch_summary(manifest: &BatchManifest, output_dir: &Path) -> Vec<String> {
    let mut headline = format!(
        "Rendered {} of {}",
        manifest.rendered,
        plural(manifest.requested, "post")
    );
    if manifest.failed > 0 {
        headline.push_str(&format!(" ({} failed)", manifest.failed));
    }
    let mut lines = vec![String::new(), headline];
    if let Some(seed) = manifest.seed {
        lines.push(format!("Seed: {}", seed));
    }
    lines.push(format!(
        "Manifest: {}",
        output_dir.join(MANIFEST_FILE).display()
    ));
    lines
}

pub fn print_batch_event(event: &BatchEvent) {
    for line in format_batch_event(event) {
        println!("{}", line);
    }
}

pub fn print_batch_summary(manifest: &BatchManifest, output_dir: &Path) {
    for line in format_batch_summary(manifest, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Everything `check` found out, gathered before printing.
#[derive(Debug)]
pub struct CheckReport {
    pub font: Result<PathBuf, RenderError>,
    pub captions_file: PathBuf,
    /// Caption count, or why the file could not be used.
    pub captions: Result<usize, String>,
    /// `None` when the backgrounds directory does not exist.
    pub backgrounds: Option<Vec<BackgroundReport>>,
    pub images_dir: PathBuf,
}

impl CheckReport {
    /// True when a batch run would have a font, captions and a background.
    pub fn is_ready(&self) -> bool {
        let has_background = match &self.backgrounds {
            // An empty directory is fine: batch writes a sample.
            Some(reports) => reports.is_empty() || reports.iter().any(|r| r.is_usable()),
            None => true,
        };
        self.font.is_ok() && self.captions.is_ok() && has_background
    }
}

fn verdict_text(verdict: &Result<Verdict, String>) -> String {
    match verdict {
        Ok(Verdict::Usable) => "usable".to_string(),
        Ok(Verdict::TooSmall { width, height }) => format!("too small ({}x{})", width, height),
        Ok(Verdict::TooBright { mean_luma }) => {
            format!("too bright (mean luma {:.1})", mean_luma)
        }
        Err(e) => format!("unreadable ({})", e),
    }
}

pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines = vec!["Font".to_string()];
    match &report.font {
        Ok(path) => lines.push(format!("{}{}", indent(1), path.display())),
        Err(e) => lines.push(format!("{}MISSING: {}", indent(1), e)),
    }

    lines.push(String::new());
    lines.push("Captions".to_string());
    match &report.captions {
        Ok(n) => lines.push(format!(
            "{}{} in {}",
            indent(1),
            n,
            report.captions_file.display()
        )),
        Err(e) => lines.push(format!("{}MISSING: {}", indent(1), e)),
    }

    lines.push(String::new());
    lines.push("Backgrounds".to_string());
    match &report.backgrounds {
        None => lines.push(format!(
            "{}{} does not exist yet; batch will create it with a sample",
            indent(1),
            report.images_dir.display()
        )),
        Some(reports) if reports.is_empty() => lines.push(format!(
            "{}none in {}; batch will write a sample",
            indent(1),
            report.images_dir.display()
        )),
        Some(reports) => {
            for (i, r) in reports.iter().enumerate() {
                lines.push(format!(
                    "{} {}: {}",
                    format_index(i + 1),
                    file_name(&r.path),
                    verdict_text(&r.verdict)
                ));
            }
            let usable = reports.iter().filter(|r| r.is_usable()).count();
            lines.push(String::new());
            lines.push(format!(
                "{} of {} usable",
                usable,
                plural(reports.len(), "background")
            ));
        }
    }
    lines
}

pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
