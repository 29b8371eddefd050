use crate::band::Band;
use crate::color::Color;
use crate::guideline::Guideline;
use crate::text::{FontSpec, StyledText};

pub const DEFAULT_RADIUS: f64 = 75.0;
pub const DEFAULT_BAND_WIDTH: f64 = 16.0;
pub const DEFAULT_BAND_SPACING: f64 = 1.0;
pub const DEFAULT_CAPTION_PADDING: f64 = 6.0;
pub const DEFAULT_TEXT_PADDING: f64 = 2.0;
pub const DEFAULT_ANIMATION_DURATION: f64 = 2.0;

/// Everything needed to draw a chart. Set it up, then hand it to [`crate::image`],
/// [`crate::image_for_time`] or [`crate::animated_image`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Outer radius of the outermost band, in points.
    pub radius: f64,
    /// Width of a single band, not counting spacing.
    pub band_width: f64,
    /// Gap between two neighbouring bands.
    pub band_spacing: f64,
    /// Required as soon as any band has a caption.
    pub font: Option<FontSpec>,
    pub caption_padding: f64,
    /// Shifts caption baselines down (positive) or up (negative).
    pub caption_baseline_adjustment: f64,
    /// Fade the captions out at the end of the animation.
    pub auto_hide_captions: bool,
    pub large_text: Option<StyledText>,
    pub small_text: Option<StyledText>,
    pub large_small_text_padding: f64,
    /// Seconds.
    pub animation_duration: f64,
    /// Outermost first.
    pub bands: Vec<Band>,
    pub guideline: Option<Guideline>,
    /// Pixels per point of the produced images.
    pub scale: f64,
    /// Fills the whole canvas before anything else; transparent when unset.
    pub canvas_color: Option<Color>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            band_width: DEFAULT_BAND_WIDTH,
            band_spacing: DEFAULT_BAND_SPACING,
            font: Some(FontSpec::default()),
            caption_padding: DEFAULT_CAPTION_PADDING,
            caption_baseline_adjustment: 0.0,
            auto_hide_captions: false,
            large_text: None,
            small_text: None,
            large_small_text_padding: DEFAULT_TEXT_PADDING,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            bands: Vec::new(),
            guideline: None,
            scale: 1.0,
            canvas_color: None,
        }
    }
}

impl ChartConfig {
    pub fn with_band(mut self, band: Band) -> Self {
        self.bands.push(band);
        self
    }

    pub fn with_guideline(mut self, guideline: Guideline) -> Self {
        self.guideline = Some(guideline);
        self
    }
}
