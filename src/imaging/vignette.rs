//! Centre-weighted darkening of the background.
//!
//! The effect is a stack of nested black rectangles. Band `i` of `n` is inset
//! from the frame edges by `round(extent / 2 * i / n)` on each axis and carries
//! alpha `max(0, 100 - i)`. Bands are alpha-over composited in order, largest
//! and faintest first, so the frame darkens monotonically toward the centre.
//!
//! Because the bands nest, the bands covering any pixel are always a prefix
//! `0..k`. The result for a channel value therefore only depends on `k`, and
//! a lookup table of `n + 1` rows replaces `n` full-frame passes with one.

use super::calculations::{band_alpha, bands_covering, blend_channel};
use image::RgbaImage;

/// Band count used by the caption styles.
pub const DEFAULT_BANDS: u32 = 100;

/// Per-band-count channel mappings.
struct BandTables {
    /// `color[k][v]`: a colour channel of value `v` after `k` black bands.
    color: Vec<[u8; 256]>,
    /// `alpha[k][v]`: an alpha channel of value `v` after `k` opaque-source bands.
    alpha: Vec<[u8; 256]>,
}

impl BandTables {
    fn new(bands: u32) -> Self {
        let mut identity = [0u8; 256];
        for (v, slot) in identity.iter_mut().enumerate() {
            *slot = v as u8;
        }
        let mut color = vec![identity];
        let mut alpha = vec![identity];
        for i in 0..bands {
            let a = band_alpha(i);
            let (prev_color, prev_alpha) = (color[i as usize], alpha[i as usize]);
            color.push(prev_color.map(|v| blend_channel(0, v, a)));
            alpha.push(prev_alpha.map(|v| blend_channel(255, v, a)));
        }
        Self { color, alpha }
    }
}

/// Darken `image` in place with `bands` nested black bands.
///
/// Zero bands, or an empty image, leave the pixels untouched.
pub fn apply_vignette(image: &mut RgbaImage, bands: u32) {
    let (width, height) = image.dimensions();
    if bands == 0 || width == 0 || height == 0 {
        return;
    }

    let tables = BandTables::new(bands);
    let columns: Vec<u32> = (0..width)
        .map(|x| bands_covering(x.min(width - 1 - x), width, bands))
        .collect();
    let rows: Vec<u32> = (0..height)
        .map(|y| bands_covering(y.min(height - 1 - y), height, bands))
        .collect();

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let k = columns[x as usize].min(rows[y as usize]) as usize;
        if k == 0 {
            continue;
        }
        let [r, g, b, a] = pixel.0;
        let color = &tables.color[k];
        pixel.0 = [
            color[r as usize],
            color[g as usize],
            color[b as usize],
            tables.alpha[k][a as usize],
        ];
    }
}
