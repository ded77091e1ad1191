//! Stroked text by repeated offset fills.
//!
//! There is no stroke primitive: the block is drawn in the outline colour at
//! every integer offset `(dx, dy)` within `[-w, w]` except the origin, then once
//! more at the origin in the fill colour. All passes use the same alignment,
//! so multi-line blocks never drift between outline and fill.

use super::calculations::{Placement, blend_channel};
use super::layout::TextBlock;
use super::params::{Align, StyleSpec};
use image::{Rgba, RgbaImage};
use rusttype::point;

/// Draw every line of `block` with the block's layout origin at `origin`.
///
/// The touched pixels fall inside [`TextBlock::ink`] shifted by `origin`.
/// Glyph coverage scales the colour's alpha; anything outside the image is
/// clipped.
pub fn draw_text(
    image: &mut RgbaImage,
    block: &TextBlock,
    origin: Placement,
    color: Rgba<u8>,
    align: Align,
) {
    let font = block.font();
    let ascent = font.v_metrics().ascent;
    let (width, height) = (image.width() as i32, image.height() as i32);

    for (index, line) in block.lines().iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let x = origin.x + block.line_offset(index, align);
        let top = origin.y + block.line_top(index);
        let baseline = point(x as f32, top as f32 + ascent);

        for glyph in font.font().layout(line, font.scale(), baseline) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            if bb.max.x <= 0 || bb.max.y <= 0 || bb.min.x >= width || bb.min.y >= height {
                continue;
            }
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px < 0 || py < 0 || px >= width || py >= height {
                    return;
                }
                let alpha = (coverage.clamp(0.0, 1.0) * color[3] as f32).round() as u8;
                if alpha == 0 {
                    return;
                }
                blend_pixel(image.get_pixel_mut(px as u32, py as u32), color, alpha);
            });
        }
    }
}

/// Draw `block` outlined in `style.outline` and filled in `style.fill`.
pub fn draw_outlined(
    image: &mut RgbaImage,
    block: &TextBlock,
    origin: Placement,
    style: &StyleSpec,
) {
    let w = style.outline_width as i32;
    for dy in -w..=w {
        for dx in -w..=w {
            if dx == 0 && dy == 0 {
                continue;
            }
            let shifted = Placement {
                x: origin.x + dx,
                y: origin.y + dy,
            };
            draw_text(image, block, shifted, style.outline, style.align);
        }
    }
    draw_text(image, block, origin, style.fill, style.align);
}

fn blend_pixel(dst: &mut Rgba<u8>, color: Rgba<u8>, alpha: u8) {
    for c in 0..3 {
        dst[c] = blend_channel(color[c], dst[c], alpha);
    }
    dst[3] = blend_channel(255, dst[3], alpha);
}
