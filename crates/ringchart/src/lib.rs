//! Renders Activity-style ring charts: concentric arc bands that sweep into view, with
//! captions, icons, center text and a guideline marker, as still or animated images.

pub mod macros;

pub mod animation;
pub mod band;
pub mod chart;
pub mod color;
pub mod error;
pub mod flare;
pub mod geometry;
pub mod guideline;
pub mod raster;
pub mod render;
pub mod text;

pub use animation::{DEFAULT_FRAME_RATE, MAX_FRAMES, animated_image, animated_image_with_frame_rate};
pub use band::{Band, Caption, Icon};
pub use chart::ChartConfig;
pub use color::Color;
pub use error::RenderError;
pub use flare::{ChartFlare, Flare, FlareView};
pub use geometry::{Layout, Point, Size, compute_layout};
pub use guideline::{Guideline, LineCap};
pub use raster::{AnimatedImage, ChartImage};
pub use render::{FrameRenderer, image, image_for_time, size};
pub use text::{FontFamily, FontSpec, FontWeight, StyledText};
