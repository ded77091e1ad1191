//! Text measurement and line wrapping.
//!
//! Two wrapping strategies sit behind one entry point, [`wrap`]:
//!
//! | Strategy | Rule | Used by |
//! |---|---|---|
//! | [`WrapStrategy::ByMeasuredWidth`] | greedy fill against glyph advances | single caption |
//! | [`WrapStrategy::ByCharacterEstimate`] | `textwrap` to a character budget | label + caption |
//!
//! The measured strategy never splits a word: a word wider than the limit ends
//! up alone on its own line and overflows. The estimate strategy is cheaper and
//! deliberately approximate; it follows `textwrap`'s defaults, which break
//! words longer than the column budget.
//!
//! ## Block geometry
//!
//! - Line width: horizontal advance extent of the laid-out run (kerning
//!   included), rounded up. Wrapping and per-line alignment use it.
//! - Line height: font ascent to descent, rounded up. Lines are stacked
//!   [`LINE_SPACING`] pixels apart.
//! - Block size: the box of pixels the renderer actually touches, the union of
//!   every glyph's pixel bounds with lines placed under the block's alignment.
//!   [`TextBlock::ink`] also gives the box's offset from the drawing origin so
//!   placement can centre what is drawn, not the advance box. A block with no
//!   visible text measures 0 x 0.

use super::calculations::{InkBox, chars_per_line};
use super::font::FontHandle;
use super::params::Align;
use rusttype::{Rect, point};
use serde::{Deserialize, Serialize};

/// Extra pixels between consecutive lines of a block.
pub const LINE_SPACING: u32 = 4;

/// How a caption is broken into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapStrategy {
    /// Greedy word wrap against the measured pixel width of each tentative line.
    #[serde(rename = "measured")]
    ByMeasuredWidth,
    /// Character-count wrap with an estimated characters-per-line budget.
    #[serde(rename = "estimate")]
    ByCharacterEstimate,
}

/// Bounding box size of a wrapped block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockSize {
    pub width: u32,
    pub height: u32,
}

/// Wrapped, measured caption text at one font size.
///
/// Built fresh per render call by [`wrap`]; immutable afterwards.
#[derive(Debug, Clone)]
pub struct TextBlock {
    lines: Vec<String>,
    line_widths: Vec<u32>,
    font: FontHandle,
    align: Align,
    advance_width: u32,
    ink: InkBox,
}

impl TextBlock {
    /// Measure already-broken lines without re-wrapping them.
    pub fn from_lines(lines: Vec<String>, font: FontHandle, align: Align) -> Self {
        let lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        let line_widths: Vec<u32> = lines.iter().map(|l| measure_line(&font, l)).collect();
        let advance_width = line_widths.iter().copied().max().unwrap_or(0);
        let ink = block_ink(&lines, &line_widths, advance_width, &font, align);
        Self {
            lines,
            line_widths,
            font,
            align,
            advance_width,
            ink,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn font(&self) -> &FontHandle {
        &self.font
    }

    pub fn font_size(&self) -> u32 {
        self.font.size()
    }

    pub fn align(&self) -> Align {
        self.align
    }

    /// Size of the drawn-pixel box.
    pub fn size(&self) -> BlockSize {
        BlockSize {
            width: self.ink.width,
            height: self.ink.height,
        }
    }

    pub fn width(&self) -> u32 {
        self.ink.width
    }

    pub fn height(&self) -> u32 {
        self.ink.height
    }

    /// Drawn-pixel box relative to the origin the block is drawn at.
    pub fn ink(&self) -> InkBox {
        self.ink
    }

    /// Widest line advance. Line offsets are computed against it.
    pub fn advance_width(&self) -> u32 {
        self.advance_width
    }

    pub fn line_width(&self, index: usize) -> u32 {
        self.line_widths.get(index).copied().unwrap_or(0)
    }

    /// Horizontal offset of a line inside the block for the given alignment.
    pub fn line_offset(&self, index: usize, align: Align) -> i32 {
        align_offset(self.advance_width, self.line_width(index), align)
    }

    /// Vertical offset of a line's top edge inside the block.
    pub fn line_top(&self, index: usize) -> i32 {
        line_top(&self.font, index)
    }

    /// Recompute the bounding box from the lines and font.
    ///
    /// Always equal to [`size`](Self::size); measurement has no hidden state.
    pub fn measure(&self) -> BlockSize {
        let widths: Vec<u32> = self.lines.iter().map(|l| measure_line(&self.font, l)).collect();
        let advance = widths.iter().copied().max().unwrap_or(0);
        let ink = block_ink(&self.lines, &widths, advance, &self.font, self.align);
        BlockSize {
            width: ink.width,
            height: ink.height,
        }
    }

    /// The block as one newline-joined string.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Wrap `text` to `max_width` pixels and measure the result.
///
/// `align` decides where each line sits relative to the widest one, so it
/// also shapes the drawn-pixel box.
pub fn wrap(
    text: &str,
    font: &FontHandle,
    max_width: u32,
    align: Align,
    strategy: WrapStrategy,
) -> TextBlock {
    let lines = match strategy {
        WrapStrategy::ByMeasuredWidth => wrap_measured(text, font, max_width),
        WrapStrategy::ByCharacterEstimate => wrap_estimated(text, font.size(), max_width),
    };
    TextBlock::from_lines(lines, font.clone(), align)
}

/// Greedy word wrap by measured pixel width.
///
/// Words are whitespace-delimited and rejoined with single spaces.
pub fn wrap_measured(text: &str, font: &FontHandle, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let tentative = format!("{current} {word}");
        if measure_line(font, &tentative) <= max_width {
            current = tentative;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Character-budget wrap: `chars_per_line(max_width, font_size)` columns.
pub fn wrap_estimated(text: &str, font_size: u32, max_width: u32) -> Vec<String> {
    let columns = chars_per_line(max_width, font_size);
    let lines: Vec<String> = textwrap::wrap(text.trim(), columns)
        .into_iter()
        .map(|l| l.into_owned())
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Pixel width of a single line of text.
pub fn measure_line(font: &FontHandle, text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }
    let ascent = font.v_metrics().ascent;
    let extent = font
        .font()
        .layout(text, font.scale(), point(0.0, ascent))
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .fold(0.0f32, f32::max);
    extent.ceil().max(0.0) as u32
}

/// Drawn-pixel box of a single line laid out with its top-left at the origin.
pub fn measure_ink(font: &FontHandle, text: &str) -> InkBox {
    to_ink(line_bounds(font, text, 0, 0))
}

fn align_offset(block_width: u32, line_width: u32, align: Align) -> i32 {
    match align {
        Align::Left => 0,
        Align::Center => (block_width.saturating_sub(line_width) / 2) as i32,
    }
}

fn line_top(font: &FontHandle, index: usize) -> i32 {
    (index as u32 * (font.line_height() + LINE_SPACING)) as i32
}

/// Union of glyph pixel bounds for one line whose top-left is at `(x, top)`.
///
/// Uses the same baseline arithmetic as the renderer so the box matches the
/// pixels it touches.
fn line_bounds(font: &FontHandle, text: &str, x: i32, top: i32) -> Option<Rect<i32>> {
    let baseline = point(x as f32, top as f32 + font.v_metrics().ascent);
    font.font()
        .layout(text, font.scale(), baseline)
        .filter_map(|g| g.pixel_bounding_box())
        .reduce(union)
}

fn union(a: Rect<i32>, b: Rect<i32>) -> Rect<i32> {
    Rect {
        min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
        max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
    }
}

fn to_ink(bounds: Option<Rect<i32>>) -> InkBox {
    match bounds {
        Some(r) => InkBox {
            left: r.min.x,
            top: r.min.y,
            width: (r.max.x - r.min.x) as u32,
            height: (r.max.y - r.min.y) as u32,
        },
        None => InkBox::default(),
    }
}

fn block_ink(
    lines: &[String],
    widths: &[u32],
    advance_width: u32,
    font: &FontHandle,
    align: Align,
) -> InkBox {
    let bounds = lines
        .iter()
        .zip(widths)
        .enumerate()
        .filter(|(_, (line, _))| !line.is_empty())
        .filter_map(|(index, (line, &width))| {
            let x = align_offset(advance_width, width, align);
            line_bounds(font, line, x, line_top(font, index))
        })
        .reduce(union);
    to_ink(bounds)
}
