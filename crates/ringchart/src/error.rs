use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("band {index} has a caption but no caption font is configured")]
    MissingFont { index: usize },
    #[error("chart radius must be a positive number, got {0}")]
    InvalidRadius(f64),
    #[error("render scale must be a positive number, got {0}")]
    InvalidScale(f64),
    #[error("frame rate must be a positive number, got {0}")]
    InvalidFrameRate(f64),
    #[error("animation duration must be a finite, non-negative number of seconds, got {0}")]
    InvalidDuration(f64),
    #[error("band {index} value must be a finite number, got {value}")]
    InvalidValue { index: usize, value: f64 },
    #[error("frame time must be a finite number of seconds, got {0}")]
    InvalidTime(f64),
    #[error("{frames} frames exceed the limit of {limit}")]
    TooManyFrames { frames: usize, limit: usize },
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("Surface data unavailable: {0}")]
    SurfaceBorrow(#[from] cairo::BorrowError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
