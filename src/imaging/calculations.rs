//! Pure calculation functions for caption geometry.
//!
//! All functions here are pure and testable without any I/O, fonts or images.
//! Integer division follows floor semantics throughout so that blocks wider
//! than the frame get a negative (off-frame) origin instead of wrapping around.

/// Font size divisor for the single-caption style (`width / 15`).
pub const SINGLE_FONT_DIVISOR: u32 = 15;
/// Font size divisor for the label in the label + caption style (`width / 12`).
pub const LABEL_FONT_DIVISOR: u32 = 12;
/// Font size divisor for the caption in the label + caption style (`width / 18`).
pub const CAPTION_FONT_DIVISOR: u32 = 18;

/// Horizontal margin on each side in the single-caption style.
pub const SINGLE_MARGIN: u32 = 20;
/// Horizontal margin on each side in the label + caption style.
pub const LABEL_MARGIN: u32 = 40;

/// Label top edge as a fraction of frame height.
pub const LABEL_ANCHOR: f64 = 0.35;
/// Gap between label and caption as a fraction of frame height.
pub const LABEL_GAP: f64 = 0.05;

/// Assumed average glyph width as a fraction of the font size, used by the
/// character-budget wrap.
pub const CHAR_WIDTH_FACTOR: f64 = 0.5;

/// Top-left pixel origin of a text block. May be negative for overflowing blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

/// Font size in pixels derived from the frame width.
///
/// # Examples
/// ```
/// # use povframe::imaging::calculations::font_size_for_width;
/// assert_eq!(font_size_for_width(1080, 15), 72);
/// assert_eq!(font_size_for_width(1080, 18), 60);
/// ```
pub fn font_size_for_width(image_width: u32, divisor: u32) -> u32 {
    image_width / divisor.max(1)
}

/// Width available to text after removing a margin on both sides.
pub fn wrap_width(image_width: u32, margin: u32) -> u32 {
    image_width.saturating_sub(margin.saturating_mul(2))
}

/// Characters-per-line budget for the character-estimate wrap.
///
/// `floor(max_width / (font_size * CHAR_WIDTH_FACTOR))`, never below 1 so the
/// wrapper always makes progress.
pub fn chars_per_line(max_width: u32, font_size: u32) -> usize {
    if font_size == 0 {
        return 1;
    }
    let budget = max_width as f64 / (font_size as f64 * CHAR_WIDTH_FACTOR);
    (budget.floor() as usize).max(1)
}

/// Left edge that centres a span of `inner` pixels inside `outer` pixels.
pub fn centered_offset(outer: u32, inner: u32) -> i32 {
    (outer as i64 - inner as i64).div_euclid(2) as i32
}

/// Drawn-pixel extent of a text block, relative to the origin it is drawn at.
///
/// `left` and `top` are usually positive: side bearings and the space above
/// capitals keep the first inked pixel off the layout origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InkBox {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl InkBox {
    /// Layout origin that puts this box's top-left corner at `(x, y)`.
    pub fn origin_for(&self, x: i32, y: i32) -> Placement {
        Placement {
            x: x - self.left,
            y: y - self.top,
        }
    }
}

/// Origin that centres a block's drawn pixels both horizontally and
/// vertically in the frame.
pub fn center_placement(image: (u32, u32), ink: InkBox) -> Placement {
    ink.origin_for(
        centered_offset(image.0, ink.width),
        centered_offset(image.1, ink.height),
    )
}

/// Origins for the label + caption style.
///
/// The label's drawn top edge sits at `floor(h * 0.35)`; the caption's drawn
/// top edge is `floor(h * 0.05)` below the label's drawn bottom edge. Each
/// block is centred horizontally on its own drawn width.
pub fn label_caption_placements(
    image: (u32, u32),
    label: InkBox,
    caption: InkBox,
) -> (Placement, Placement) {
    let (width, height) = image;
    let label_y = (height as f64 * LABEL_ANCHOR).floor() as i32;
    let gap = (height as f64 * LABEL_GAP).floor() as i32;
    let label_at = label.origin_for(centered_offset(width, label.width), label_y);
    let caption_at = caption.origin_for(
        centered_offset(width, caption.width),
        label_y + label.height as i32 + gap,
    );
    (label_at, caption_at)
}

/// Opacity of vignette band `index` on the 0–255 alpha scale: `max(0, 100 - index)`.
pub fn band_alpha(index: u32) -> u8 {
    100u32.saturating_sub(index) as u8
}

/// Inset of vignette band `index` of `count` along one axis of `extent` pixels.
///
/// Band 0 covers the full extent; each following band shrinks linearly
/// toward the centre: `round(extent / 2 * index / count)`.
pub fn band_inset(extent: u32, index: u32, count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    let half = extent as f64 / 2.0;
    (half * index as f64 / count as f64).round() as u32
}

/// Number of nested bands covering a pixel `distance` pixels from the nearest
/// edge along one axis.
///
/// Band `i` covers the pixel when its inset is at most `distance`; insets grow
/// with `i`, so the covering bands are always a prefix `0..n`.
pub fn bands_covering(distance: u32, extent: u32, count: u32) -> u32 {
    (0..count)
        .take_while(|&i| band_inset(extent, i, count) <= distance)
        .count() as u32
}

/// `x * y / 255`, rounded to nearest, for two 8-bit quantities.
pub fn mul_div255(x: u8, y: u8) -> u8 {
    ((x as u32 * y as u32 + 127) / 255) as u8
}

/// One channel of an alpha-over: `src * alpha + dst * (1 - alpha)`.
pub fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    mul_div255(src, alpha).saturating_add(mul_div255(dst, 255 - alpha))
}
