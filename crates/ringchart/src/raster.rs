use crate::error::RenderError;
use cairo::ImageSurface;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageFormat, Rgba, RgbaImage};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::time::Duration;

/// A rendered frame with straight (non-premultiplied) RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    pixels: RgbaImage,
}

impl ChartImage {
    pub fn from_surface(surface: &ImageSurface) -> Result<Self, RenderError> {
        surface.flush();
        let (width, height) = (surface.width() as u32, surface.height() as u32);
        let stride = surface.stride() as usize;
        let mut pixels = RgbaImage::new(width, height);
        surface.with_data(|data| {
            for (x, y, pixel) in pixels.enumerate_pixels_mut() {
                let offset = y as usize * stride + x as usize * 4;
                let argb = u32::from_ne_bytes([
                    data[offset],
                    data[offset + 1],
                    data[offset + 2],
                    data[offset + 3],
                ]);
                *pixel = unpremultiply(argb);
            }
        })?;
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }

    pub fn write_png<W: Write + Seek>(&self, writer: &mut W) -> Result<(), RenderError> {
        self.pixels.write_to(writer, ImageFormat::Png)?;
        Ok(())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.pixels.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

fn unpremultiply(argb: u32) -> Rgba<u8> {
    let [a, r, g, b] = argb.to_be_bytes();
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let straight = |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
    Rgba([straight(r), straight(g), straight(b), a])
}

/// A sequence of equally timed frames.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedImage {
    frames: Vec<ChartImage>,
    frame_duration: Duration,
    looping: bool,
}

impl AnimatedImage {
    /// Plays once by default; see [`AnimatedImage::with_looping`].
    pub fn new(frames: Vec<ChartImage>, frame_duration: Duration) -> Self {
        Self {
            frames,
            frame_duration,
            looping: false,
        }
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn frames(&self) -> &[ChartImage] {
        &self.frames
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Saturates at [`Duration::MAX`].
    pub fn total_duration(&self) -> Duration {
        u32::try_from(self.frames.len())
            .ok()
            .and_then(|count| self.frame_duration.checked_mul(count))
            .unwrap_or(Duration::MAX)
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// The final frame, which is what a non-looping animation leaves on screen.
    pub fn last_frame(&self) -> Option<&ChartImage> {
        self.frames.last()
    }

    pub fn write_gif<W: Write>(&self, writer: W) -> Result<(), RenderError> {
        let mut encoder = GifEncoder::new(writer);
        if self.looping {
            encoder.set_repeat(Repeat::Infinite)?;
        }
        let delay = Delay::from_saturating_duration(self.frame_duration);
        encoder.encode_frames(
            self.frames
                .iter()
                .map(|frame| Frame::from_parts(frame.pixels.clone(), 0, 0, delay)),
        )?;
        Ok(())
    }

    pub fn save_gif(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let file = fs_err::File::create(path.as_ref())?;
        self.write_gif(BufWriter::new(file))
    }
}
