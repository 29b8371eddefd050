use crate::chart::ChartConfig;
use crate::error::RenderError;
use crate::text::{self, StyledText, TextMetrics};
use cairo::{Context, Format, ImageSurface};
use std::f64::consts::FRAC_PI_2;
use std::iter::zip;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `radius` away from `center` at `angle` radians clockwise from 12 o'clock.
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self::new(
            center.x + radius * angle.sin(),
            center.y - radius * angle.cos(),
        )
    }

    pub fn offset(&self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            min: Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            max: Point::new(center.x + size.width / 2.0, center.y + size.height / 2.0),
        }
    }

    pub fn around(center: Point, radius: f64) -> Self {
        Self::from_center(center, Size::new(2.0 * radius, 2.0 * radius))
    }

    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn union(&self, other: &Rect) -> Self {
        Self::spanning(
            Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }

    pub fn inflate(&self, by: f64) -> Self {
        Self {
            min: Point::new(self.min.x - by, self.min.y - by),
            max: Point::new(self.max.x + by, self.max.y + by),
        }
    }

    pub fn offset(&self, by: Point) -> Self {
        Self {
            min: self.min.offset(by),
            max: self.max.offset(by),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// Converts a clockwise angle from 12 o'clock into cairo's angle, measured from 3 o'clock.
pub fn to_device_angle(angle: f64) -> f64 {
    angle - FRAC_PI_2
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandGeometry {
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl BandGeometry {
    /// Band 0 is the outermost one; each following band steps inwards by width + spacing.
    pub fn for_index(config: &ChartConfig, index: usize) -> Self {
        let outer_radius = config.radius - index as f64 * (config.band_width + config.band_spacing);
        Self {
            outer_radius,
            inner_radius: outer_radius - config.band_width,
        }
    }

    pub fn mid_radius(&self) -> f64 {
        (self.outer_radius + self.inner_radius) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Nested too deep to fit inside the chart; drawn as nothing.
    pub fn is_degenerate(&self) -> bool {
        self.inner_radius <= 0.0
    }
}

/// A line of text positioned by the left end of its baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub origin: Point,
    pub metrics: TextMetrics,
}

impl TextPlacement {
    pub fn bounds(&self) -> Rect {
        Rect {
            min: Point::new(self.origin.x, self.origin.y - self.metrics.ascent),
            max: Point::new(
                self.origin.x + self.metrics.width,
                self.origin.y + self.metrics.descent,
            ),
        }
    }

    fn offset(&self, by: Point) -> Self {
        Self {
            origin: self.origin.offset(by),
            metrics: self.metrics,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidelineGeometry {
    /// Radians clockwise from 12 o'clock.
    pub angle: f64,
    pub start_radius: f64,
    pub end_radius: f64,
}

impl GuidelineGeometry {
    pub fn endpoints(&self, center: Point) -> (Point, Point) {
        (
            Point::polar(center, self.start_radius, self.angle),
            Point::polar(center, self.end_radius, self.angle),
        )
    }
}

/// Where everything goes on the canvas. All positions are absolute canvas points.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub size: Size,
    pub center: Point,
    pub bands: Vec<BandGeometry>,
    pub captions: Vec<Option<TextPlacement>>,
    pub icons: Vec<Option<Rect>>,
    pub large_text: Option<TextPlacement>,
    pub small_text: Option<TextPlacement>,
    pub guideline: Option<GuidelineGeometry>,
}

impl Layout {
    pub fn pixel_size(&self, scale: f64) -> (i32, i32) {
        (
            (self.size.width * scale).ceil() as i32,
            (self.size.height * scale).ceil() as i32,
        )
    }
}

/// Rejects configurations that cannot be drawn at all.
pub fn validate(config: &ChartConfig) -> Result<(), RenderError> {
    if !(config.radius.is_finite() && config.radius > 0.0) {
        return Err(RenderError::InvalidRadius(config.radius));
    }
    if !(config.scale.is_finite() && config.scale > 0.0) {
        return Err(RenderError::InvalidScale(config.scale));
    }
    if !(config.animation_duration.is_finite() && config.animation_duration >= 0.0) {
        return Err(RenderError::InvalidDuration(config.animation_duration));
    }
    if let Some((index, band)) = config
        .bands
        .iter()
        .enumerate()
        .find(|(_, band)| !band.value.is_finite())
    {
        return Err(RenderError::InvalidValue {
            index,
            value: band.value,
        });
    }
    if config.font.is_none()
        && let Some(index) = config
            .bands
            .iter()
            .position(|band| band.visible_caption().is_some())
    {
        return Err(RenderError::MissingFont { index });
    }
    Ok(())
}

/// Computes the canvas size and the placement of every element.
///
/// The chart is laid out around the origin first; the canvas is the bounding box of the
/// disc, captions, icons, center text and guideline, and the center is shifted so that box
/// starts at (0, 0). Captions count even when they fade out, since earlier frames show them.
pub fn compute_layout(config: &ChartConfig) -> Result<Layout, RenderError> {
    validate(config)?;

    let surface = ImageSurface::create(Format::ARgb32, 1, 1)?;
    let cr = Context::new(&surface)?;

    let origin = Point::default();
    let mut bounds = Rect::around(origin, config.radius);

    let bands: Vec<BandGeometry> = (0..config.bands.len())
        .map(|i| BandGeometry::for_index(config, i))
        .collect();

    let mut captions = Vec::with_capacity(bands.len());
    let mut icons = Vec::with_capacity(bands.len());

    for (i, (band, geometry)) in zip(&config.bands, &bands).enumerate() {
        if band.value > 1.0 {
            log::warn!(
                "Band {} value {} exceeds 1, rendering may look off",
                i,
                band.value
            );
        }
        if geometry.is_degenerate() {
            log::warn!("Band {} does not fit inside radius {}", i, config.radius);
            captions.push(None);
            icons.push(None);
            continue;
        }

        let start = Point::polar(origin, geometry.mid_radius(), 0.0);
        let icon = band
            .icon
            .as_ref()
            .map(|icon| Rect::from_center(start, icon.size()));
        if let Some(rect) = &icon {
            bounds = bounds.union(rect);
        }

        let caption = match (band.visible_caption(), &config.font) {
            (Some(caption), Some(font)) => {
                let metrics = text::measure(&cr, font, caption)?;
                // clear the round start cap and the icon
                let start_extent = icon
                    .map_or(0.0, |rect| rect.width())
                    .max(geometry.width())
                    / 2.0;
                let right = start.x - start_extent - config.caption_padding;
                let baseline = start.y
                    + (metrics.ascent - metrics.descent) / 2.0
                    + config.caption_baseline_adjustment;
                let placement = TextPlacement {
                    origin: Point::new(right - metrics.width, baseline),
                    metrics,
                };
                bounds = bounds.union(&placement.bounds());
                Some(placement)
            }
            _ => None,
        };

        captions.push(caption);
        icons.push(icon);
    }

    let (large_text, small_text) = layout_center_text(&cr, config)?;
    for placement in large_text.iter().chain(small_text.iter()) {
        bounds = bounds.union(&placement.bounds());
    }

    let guideline = config.guideline.as_ref().map(|guideline| {
        let innermost = bands
            .last()
            .map_or(config.radius, |band| band.inner_radius.max(0.0));
        let outermost = bands.first().map_or(config.radius, |band| band.outer_radius);
        GuidelineGeometry {
            angle: guideline.angle(),
            start_radius: (innermost - guideline.extra_before).max(0.0),
            end_radius: outermost + guideline.extra_after,
        }
    });
    if let (Some(geometry), Some(guideline)) = (&guideline, &config.guideline) {
        let (start, end) = geometry.endpoints(origin);
        bounds = bounds.union(&Rect::spanning(start, end).inflate(guideline.line_width / 2.0));
    }

    let size = Size::new(bounds.width().ceil(), bounds.height().ceil());
    let center = Point::new(-bounds.min.x, -bounds.min.y);
    log::debug!(
        "Chart layout {}x{} centered at ({}, {})",
        size.width,
        size.height,
        center.x,
        center.y
    );

    Ok(Layout {
        size,
        center,
        bands,
        captions: captions
            .into_iter()
            .map(|c| c.map(|c| c.offset(center)))
            .collect(),
        icons: icons
            .into_iter()
            .map(|i| i.map(|i| i.offset(center)))
            .collect(),
        large_text: large_text.map(|t| t.offset(center)),
        small_text: small_text.map(|t| t.offset(center)),
        guideline,
    })
}

/// Stacks the large text above the small one, the pair vertically centered on the origin.
fn layout_center_text(
    cr: &Context,
    config: &ChartConfig,
) -> Result<(Option<TextPlacement>, Option<TextPlacement>), RenderError> {
    let measure = |styled: Option<&StyledText>| -> Result<Option<TextMetrics>, cairo::Error> {
        styled
            .filter(|s| !s.text.is_empty())
            .map(|s| text::measure(cr, &s.font, &s.text))
            .transpose()
    };
    let large = measure(config.large_text.as_ref())?;
    let small = measure(config.small_text.as_ref())?;

    let gap = if large.is_some() && small.is_some() {
        config.large_small_text_padding
    } else {
        0.0
    };
    let total = large.map_or(0.0, |m| m.height()) + gap + small.map_or(0.0, |m| m.height());

    let mut top = -total / 2.0;
    let mut place = |metrics: TextMetrics| {
        let placement = TextPlacement {
            origin: Point::new(-metrics.width / 2.0, top + metrics.ascent),
            metrics,
        };
        top += metrics.height() + gap;
        placement
    };

    let large = large.map(&mut place);
    let small = small.map(&mut place);
    Ok((large, small))
}
