mod band;
pub mod timing;

use crate::chart::ChartConfig;
use crate::error::RenderError;
use crate::geometry::{Layout, Size, TextPlacement, compute_layout};
use crate::raster::ChartImage;
use crate::text::{self, StyledText};
use band::BandRenderer;
use cairo::{Context, Format, ImageSurface};
use std::iter::zip;
use timing::FrameClock;

/// Draws frames of one chart. The layout and the icon surfaces are prepared once and reused
/// for every frame.
pub struct FrameRenderer {
    config: ChartConfig,
    layout: Layout,
    icons: Vec<Option<ImageSurface>>,
}

impl FrameRenderer {
    pub fn new(config: ChartConfig) -> Result<Self, RenderError> {
        let layout = compute_layout(&config)?;
        let icons = zip(&config.bands, &layout.icons)
            .map(|(band, rect)| match (&band.icon, rect) {
                (Some(icon), Some(_)) => icon.to_surface().map(Some),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            config,
            layout,
            icons,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Canvas size in points.
    pub fn size(&self) -> Size {
        self.layout.size
    }

    /// Renders the moment `time` seconds into the animation.
    pub fn render(&self, time: f64) -> Result<ChartImage, RenderError> {
        let (width, height) = self.layout.pixel_size(self.config.scale);
        let surface = ImageSurface::create(Format::ARgb32, width, height)?;
        {
            let cr = Context::new(&surface)?;
            cr.scale(self.config.scale, self.config.scale);
            self.draw(&cr, time)?;
        }
        log::trace!("Rendered {}x{} frame at {:.3}s", width, height, time);
        ChartImage::from_surface(&surface)
    }

    /// Draws the frame at `time` into `cr`, in points, with the canvas origin at the current
    /// user-space origin.
    pub fn draw(&self, cr: &Context, time: f64) -> Result<(), cairo::Error> {
        let clock = FrameClock::new(time, self.config.animation_duration);
        let renderers: Vec<_> = zip(&self.config.bands, &self.layout.bands)
            .map(|(band, geometry)| BandRenderer::new(band, geometry, self.layout.center, clock))
            .collect();

        cr.save()?;
        if let Some(color) = self.config.canvas_color {
            let (r, g, b, a) = color.components();
            cr.set_source_rgba(r, g, b, a);
            cr.rectangle(0.0, 0.0, self.layout.size.width, self.layout.size.height);
            cr.fill()?;
        }

        for renderer in &renderers {
            renderer.draw_track(cr)?;
        }
        for renderer in &renderers {
            renderer.draw_arc(cr)?;
        }
        for (i, renderer) in renderers.iter().enumerate() {
            if let (Some(surface), Some(rect), Some(icon)) = (
                &self.icons[i],
                &self.layout.icons[i],
                &self.config.bands[i].icon,
            ) {
                renderer.draw_icon(cr, surface, rect, icon.scale())?;
            }
        }
        if let Some(font) = &self.config.font {
            for (renderer, placement) in zip(&renderers, &self.layout.captions) {
                if let Some(placement) = placement {
                    renderer.draw_caption(cr, placement, font, self.config.auto_hide_captions)?;
                }
            }
        }

        self.draw_center_text(cr)?;
        self.draw_guideline(cr)?;
        cr.restore()
    }

    fn draw_center_text(&self, cr: &Context) -> Result<(), cairo::Error> {
        let lines = [
            (&self.config.large_text, &self.layout.large_text),
            (&self.config.small_text, &self.layout.small_text),
        ];
        for (styled, placement) in lines {
            if let (
                Some(StyledText {
                    text: line,
                    font,
                    color,
                }),
                Some(TextPlacement { origin, .. }),
            ) = (styled, placement)
            {
                cr.move_to(origin.x, origin.y);
                text::draw_text(cr, line, font, *color)?;
            }
        }
        Ok(())
    }

    fn draw_guideline(&self, cr: &Context) -> Result<(), cairo::Error> {
        let (Some(guideline), Some(geometry)) = (&self.config.guideline, &self.layout.guideline)
        else {
            return Ok(());
        };
        let (start, end) = geometry.endpoints(self.layout.center);
        let (r, g, b, a) = guideline.color.components();

        cr.save()?;
        cr.new_path();
        cr.move_to(start.x, start.y);
        cr.line_to(end.x, end.y);
        cr.set_source_rgba(r, g, b, a);
        cr.set_line_width(guideline.line_width);
        cr.set_line_cap(guideline.line_cap.into());
        cr.set_dash(&guideline.dash, 0.0);
        cr.stroke()?;
        cr.restore()
    }
}

/// Canvas size of `config` in points.
pub fn size(config: &ChartConfig) -> Result<Size, RenderError> {
    Ok(compute_layout(config)?.size)
}

/// The final, fully drawn state of the chart.
pub fn image(config: &ChartConfig) -> Result<ChartImage, RenderError> {
    image_for_time(config, config.animation_duration)
}

/// A single frame of the chart animation.
pub fn image_for_time(config: &ChartConfig, time: f64) -> Result<ChartImage, RenderError> {
    if !time.is_finite() {
        return Err(RenderError::InvalidTime(time));
    }
    FrameRenderer::new(config.clone())?.render(time)
}
