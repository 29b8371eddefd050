use crate::chart::ChartConfig;
use crate::error::RenderError;
use crate::raster::AnimatedImage;
use crate::render::FrameRenderer;
use std::time::Duration;

pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Upper bound on the frames of one animation; ten minutes at 60 fps.
pub const MAX_FRAMES: usize = 36_000;

/// Absorbs float noise such as `0.1 * 30.0 == 3.0000000000000004`.
const FRAME_COUNT_EPSILON: f64 = 1e-9;

/// Number of frames for an animation of `duration` seconds; never less than one. Saturates
/// at `usize::MAX` for unbounded inputs.
pub fn frame_count(duration: f64, frame_rate: f64) -> usize {
    let frames = (duration.max(0.0) * frame_rate - FRAME_COUNT_EPSILON).ceil();
    if frames.is_nan() {
        return 1;
    }
    (frames as usize).max(1)
}

/// Evenly spaced sample times from 0 to `duration`, both included. A single frame shows the
/// final state. Non-finite durations count as zero and at most [`MAX_FRAMES`] times are produced.
pub fn frame_times(duration: f64, frame_rate: f64) -> Vec<f64> {
    let duration = if duration.is_finite() {
        duration.max(0.0)
    } else {
        0.0
    };
    let count = frame_count(duration, frame_rate).min(MAX_FRAMES);
    if count == 1 {
        return vec![duration];
    }
    let last = (count - 1) as f64;
    (0..count)
        .map(|i| duration * i as f64 / last)
        .collect()
}

/// The whole animation at [`DEFAULT_FRAME_RATE`].
pub fn animated_image(config: &ChartConfig) -> Result<AnimatedImage, RenderError> {
    animated_image_with_frame_rate(config, DEFAULT_FRAME_RATE)
}

pub fn animated_image_with_frame_rate(
    config: &ChartConfig,
    frame_rate: f64,
) -> Result<AnimatedImage, RenderError> {
    if !(frame_rate.is_finite() && frame_rate > 0.0) {
        return Err(RenderError::InvalidFrameRate(frame_rate));
    }

    let renderer = FrameRenderer::new(config.clone())?;
    let frames = frame_count(config.animation_duration, frame_rate);
    if frames > MAX_FRAMES {
        return Err(RenderError::TooManyFrames {
            frames,
            limit: MAX_FRAMES,
        });
    }
    let times = frame_times(config.animation_duration, frame_rate);
    log::debug!(
        "Rendering {} frames over {}s at {} fps",
        times.len(),
        config.animation_duration,
        frame_rate
    );

    let frames = times
        .into_iter()
        .map(|time| renderer.render(time))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AnimatedImage::new(
        frames,
        Duration::from_secs_f64(1.0 / frame_rate),
    ))
}
