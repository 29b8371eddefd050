use crate::color::Color;
use crate::error::RenderError;
use crate::geometry::Size;
use cairo::{Format, ImageSurface};
use derive_more::{AsRef, Deref, Display, From, Into};
use image::RgbaImage;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Display, Deref, From, Into, AsRef)]
#[serde(transparent)]
pub struct Caption(String);

crate::impl_string_newtype!(Caption);

/// A raster icon drawn at the start of a band.
///
/// `scale` is the number of pixels per point, so a 64px icon with scale 2 occupies 32pt.
#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pixels: RgbaImage,
    scale: f64,
}

impl Icon {
    pub fn from_rgba(pixels: RgbaImage, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self { pixels, scale }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let pixels = image::open(path)?.into_rgba8();
        Ok(Self::from_rgba(pixels, 1.0))
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self::from_rgba(self.pixels, scale)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn size(&self) -> Size {
        let (w, h) = self.pixels.dimensions();
        Size::new(w as f64 / self.scale, h as f64 / self.scale)
    }

    /// Copies the pixels into a premultiplied ARGB32 surface cairo can paint from.
    pub fn to_surface(&self) -> Result<ImageSurface, RenderError> {
        let (width, height) = self.pixels.dimensions();
        let mut surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
        let stride = surface.stride() as usize;
        {
            let mut data = surface.data()?;
            for (x, y, pixel) in self.pixels.enumerate_pixels() {
                let [r, g, b, a] = pixel.0;
                let premultiply = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
                let argb = u32::from_be_bytes([a, premultiply(r), premultiply(g), premultiply(b)]);
                let offset = y as usize * stride + x as usize * 4;
                data[offset..offset + 4].copy_from_slice(&argb.to_ne_bytes());
            }
        }
        Ok(surface)
    }
}

/// One concentric ring of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// Color of the first half of the arc, and the default caption color.
    pub start_color: Color,
    /// Color the arc blends into over its second half.
    pub end_color: Color,
    /// Full ring drawn underneath the arc.
    pub background_color: Option<Color>,
    pub icon: Option<Icon>,
    /// Drawn left of the band's start; never truncated, the canvas grows to fit it.
    pub caption: Option<Caption>,
    pub caption_color: Option<Color>,
    /// Fraction of the full circle. Values above 1 are drawn as overlapping turns.
    pub value: f64,
}

impl Band {
    pub fn new(start_color: Color, end_color: Color, value: f64) -> Self {
        Self {
            start_color,
            end_color,
            background_color: None,
            icon: None,
            caption: None,
            caption_color: None,
            value,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(Caption::new(caption));
        self
    }

    pub fn with_caption_color(mut self, color: Color) -> Self {
        self.caption_color = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn caption_color(&self) -> Color {
        self.caption_color.unwrap_or(self.start_color)
    }

    pub fn visible_caption(&self) -> Option<&str> {
        self.caption
            .as_ref()
            .map(|c| c.as_str())
            .filter(|c| !c.is_empty())
    }
}
