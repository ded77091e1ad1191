//! Caption composition: the high-level render operation.
//!
//! These functions combine calculations, layout and drawing with backend I/O.
//! One render call runs:
//!
//! 1. trim the caption and reject it if empty (before any I/O)
//! 2. load the background through the backend
//! 3. size fonts from the frame width and wrap the text into blocks
//! 4. place the blocks
//! 5. vignette a private RGBA copy of the background
//! 6. draw each block outlined
//! 7. convert to the output colour model and hand the frame to the sink
//!
//! The sink only ever sees a finished frame. Any failure before step 7
//! returns a typed [`RenderError`] and nothing is written.

use super::backend::{ImageBackend, RenderError};
use super::calculations::{
    CAPTION_FONT_DIVISOR, LABEL_FONT_DIVISOR, LABEL_MARGIN, Placement, SINGLE_FONT_DIVISOR,
    SINGLE_MARGIN, center_placement, font_size_for_width, label_caption_placements, wrap_width,
};
use super::font::{FontHandle, FontSource};
use super::layout::{TextBlock, WrapStrategy, wrap};
use super::outline::draw_outlined;
use super::params::{Align, ColorModel, EncodeParams, StyleSpec};
use super::vignette::{DEFAULT_BANDS, apply_vignette};
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Which overlay style to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionMode {
    /// One caption block centred in the frame.
    Single,
    /// A short fixed label above the caption, both horizontally centred.
    LabelCaption { label: String },
}

impl CaptionMode {
    /// Default line alignment inside a block for this mode.
    pub fn default_align(&self) -> Align {
        match self {
            Self::Single => Align::Left,
            Self::LabelCaption { .. } => Align::Center,
        }
    }

    /// Default wrapping strategy for this mode.
    pub fn default_wrap(&self) -> WrapStrategy {
        match self {
            Self::Single => WrapStrategy::ByMeasuredWidth,
            Self::LabelCaption { .. } => WrapStrategy::ByCharacterEstimate,
        }
    }
}

/// Composer settings. Fixed for the lifetime of a [`CaptionComposer`].
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    pub mode: CaptionMode,
    /// Colours and outline width; `style.align` is replaced per mode unless
    /// `align` overrides it.
    pub style: StyleSpec,
    pub align: Option<Align>,
    pub wrap: Option<WrapStrategy>,
    pub vignette_bands: u32,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            mode: CaptionMode::Single,
            style: StyleSpec::default(),
            align: None,
            wrap: None,
            vignette_bands: DEFAULT_BANDS,
        }
    }
}

impl ComposerConfig {
    /// Line alignment after applying the override.
    pub fn effective_align(&self) -> Align {
        self.align.unwrap_or_else(|| self.mode.default_align())
    }

    /// Wrapping strategy after applying the override.
    pub fn effective_wrap(&self) -> WrapStrategy {
        self.wrap.unwrap_or_else(|| self.mode.default_wrap())
    }

    /// Style with the effective alignment filled in.
    pub fn effective_style(&self) -> StyleSpec {
        self.style.aligned(self.effective_align())
    }
}

/// A wrapped block and where to draw it.
#[derive(Debug, Clone)]
pub struct PlacedBlock {
    pub block: TextBlock,
    pub at: Placement,
}

/// What a successful render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Wrapped caption lines, label excluded.
    pub lines: Vec<String>,
    pub font_size: u32,
}

/// Trim a caption, rejecting one with no visible text.
pub fn normalize_caption(caption: &str) -> Result<&str> {
    let trimmed = caption.trim();
    if trimmed.is_empty() {
        return Err(RenderError::EmptyCaption);
    }
    Ok(trimmed)
}

fn sized_for(font: &FontSource, image_width: u32, divisor: u32) -> Result<FontHandle> {
    let px = font_size_for_width(image_width, divisor);
    if px == 0 {
        return Err(RenderError::ImageTooSmallOrInvalid(format!(
            "{image_width}px wide frame gives a zero font size"
        )));
    }
    Ok(font.sized(px))
}

/// Plan the single-caption layout without drawing anything.
///
/// Font size is `width / 15`; the block is wrapped to the frame width minus
/// a 20 px margin per side and its drawn pixels are centred on both axes.
pub fn plan_single(
    font: &FontSource,
    image: (u32, u32),
    caption: &str,
    align: Align,
    strategy: WrapStrategy,
) -> Result<PlacedBlock> {
    let handle = sized_for(font, image.0, SINGLE_FONT_DIVISOR)?;
    let block = wrap(caption, &handle, wrap_width(image.0, SINGLE_MARGIN), align, strategy);
    let at = center_placement(image, block.ink());
    Ok(PlacedBlock { block, at })
}

/// Plan the label + caption layout without drawing anything.
///
/// The label is set at `width / 12` on a single line, never wrapped. The
/// caption is set at `width / 18` and wrapped to the frame width minus a 40 px
/// margin per side. Returns `[label, caption]`.
pub fn plan_label_caption(
    font: &FontSource,
    image: (u32, u32),
    label: &str,
    caption: &str,
    align: Align,
    strategy: WrapStrategy,
) -> Result<[PlacedBlock; 2]> {
    let max_width = wrap_width(image.0, LABEL_MARGIN);
    let label_font = sized_for(font, image.0, LABEL_FONT_DIVISOR)?;
    let caption_font = sized_for(font, image.0, CAPTION_FONT_DIVISOR)?;

    let label_block = TextBlock::from_lines(vec![label.trim().to_string()], label_font, align);
    let caption_block = wrap(caption, &caption_font, max_width, align, strategy);
    let (label_at, caption_at) =
        label_caption_placements(image, label_block.ink(), caption_block.ink());

    Ok([
        PlacedBlock {
            block: label_block,
            at: label_at,
        },
        PlacedBlock {
            block: caption_block,
            at: caption_at,
        },
    ])
}

/// Convert the working buffer to the sink's colour model.
pub fn into_color_model(image: RgbaImage, model: ColorModel) -> DynamicImage {
    match model {
        ColorModel::Rgba => DynamicImage::ImageRgba8(image),
        ColorModel::Rgb => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8()),
    }
}

/// Renders captions onto backgrounds with one resolved font.
///
/// Holds no per-render state; one composer can serve any number of renders,
/// including from several threads at once.
#[derive(Debug, Clone)]
pub struct CaptionComposer {
    font: FontSource,
    config: ComposerConfig,
}

impl CaptionComposer {
    pub fn new(font: FontSource, config: ComposerConfig) -> Self {
        Self { font, config }
    }

    /// Resolve and load the font, then build the composer.
    pub fn resolve(
        explicit_font: Option<&Path>,
        fallback_fonts: &[PathBuf],
        config: ComposerConfig,
    ) -> Result<Self> {
        let font = FontSource::resolve(explicit_font, fallback_fonts)?;
        Ok(Self::new(font, config))
    }

    pub fn font(&self) -> &FontSource {
        &self.font
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Lay out `caption` for a frame of the given size.
    ///
    /// The caption block is always the last element.
    pub fn plan(&self, image: (u32, u32), caption: &str) -> Result<Vec<PlacedBlock>> {
        let caption = normalize_caption(caption)?;
        if image.0 == 0 || image.1 == 0 {
            return Err(RenderError::ImageTooSmallOrInvalid(format!(
                "background is {}x{}",
                image.0, image.1
            )));
        }
        let align = self.config.effective_align();
        let strategy = self.config.effective_wrap();
        match &self.config.mode {
            CaptionMode::Single => {
                Ok(vec![plan_single(&self.font, image, caption, align, strategy)?])
            }
            CaptionMode::LabelCaption { label } => {
                Ok(plan_label_caption(&self.font, image, label, caption, align, strategy)?.into())
            }
        }
    }

    /// Composite `caption` onto a copy of `background`.
    ///
    /// `background` is never modified. The result has the background's
    /// dimensions and the requested colour model.
    pub fn compose(
        &self,
        background: &DynamicImage,
        caption: &str,
        model: ColorModel,
    ) -> Result<DynamicImage> {
        let blocks = self.plan((background.width(), background.height()), caption)?;
        Ok(into_color_model(self.draw(background, &blocks), model))
    }

    fn draw(&self, background: &DynamicImage, blocks: &[PlacedBlock]) -> RgbaImage {
        let mut canvas = background.to_rgba8();
        apply_vignette(&mut canvas, self.config.vignette_bands);
        let style = self.config.effective_style();
        for placed in blocks {
            draw_outlined(&mut canvas, &placed.block, placed.at, &style);
        }
        canvas
    }

    /// Load `source`, compose `caption` onto it, and save per `params`.
    ///
    /// The caption is checked before the background is touched, and the
    /// backend's `save` runs only after compositing has fully succeeded.
    pub fn render(
        &self,
        backend: &impl ImageBackend,
        source: &Path,
        caption: &str,
        params: &EncodeParams,
    ) -> Result<RenderSummary> {
        let caption = normalize_caption(caption)?;
        let background = backend.load(source).map_err(RenderError::from_source)?;
        let blocks = self.plan((background.width(), background.height()), caption)?;
        let frame = into_color_model(self.draw(&background, &blocks), params.format.color_model());

        backend.save(&frame, params).map_err(RenderError::Sink)?;

        let caption_block = blocks
            .last()
            .map(|p| &p.block)
            .ok_or_else(|| RenderError::RenderFailure("no caption block planned".to_string()))?;
        Ok(RenderSummary {
            output: params.output.clone(),
            width: frame.width(),
            height: frame.height(),
            lines: caption_block.lines().to_vec(),
            font_size: caption_block.font_size(),
        })
    }
}
