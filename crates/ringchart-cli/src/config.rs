use directories::ProjectDirs;
use ringchart::{
    Band, Caption, ChartConfig, Color, DEFAULT_FRAME_RATE, FontSpec, Guideline, Icon,
    RenderError, StyledText,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to load icon {path}: {source}")]
    Icon {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("{0} already exists, pass --force to overwrite it")]
    AlreadyExists(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn default_icon_scale() -> f64 {
    1.0
}

/// One band as written in a chart file. Icons are paths relative to the chart file.
#[derive(Debug, Clone, Deserialize)]
pub struct BandConfig {
    pub start_color: Color,
    /// Same as `start_color` when unset.
    pub end_color: Option<Color>,
    pub background_color: Option<Color>,
    pub icon: Option<PathBuf>,
    #[serde(default = "default_icon_scale")]
    pub icon_scale: f64,
    pub caption: Option<Caption>,
    pub caption_color: Option<Color>,
    #[serde(default)]
    pub value: f64,
}

impl BandConfig {
    fn into_band(self, base_dir: &Path) -> Result<Band, ConfigError> {
        let icon = self
            .icon
            .map(|path| {
                let path = base_dir.join(path);
                Icon::open(&path)
                    .map(|icon| icon.with_scale(self.icon_scale))
                    .map_err(|source| ConfigError::Icon { path, source })
            })
            .transpose()?;

        Ok(Band {
            start_color: self.start_color,
            end_color: self.end_color.unwrap_or(self.start_color),
            background_color: self.background_color,
            icon,
            caption: self.caption,
            caption_color: self.caption_color,
            value: self.value,
        })
    }
}

/// A chart file merged with the user style and the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartFile {
    pub radius: f64,
    pub band_width: f64,
    pub band_spacing: f64,
    pub font: Option<FontSpec>,
    pub caption_padding: f64,
    pub caption_baseline_adjustment: f64,
    pub auto_hide_captions: bool,
    pub large_text: Option<StyledText>,
    pub small_text: Option<StyledText>,
    pub large_small_text_padding: f64,
    pub animation_duration: f64,
    pub bands: Vec<BandConfig>,
    pub guideline: Option<Guideline>,
    pub scale: f64,
    pub canvas_color: Option<Color>,
    pub frame_rate: f64,
    pub looping: bool,
}

impl Default for ChartFile {
    fn default() -> Self {
        let chart = ChartConfig::default();
        Self {
            radius: chart.radius,
            band_width: chart.band_width,
            band_spacing: chart.band_spacing,
            font: chart.font,
            caption_padding: chart.caption_padding,
            caption_baseline_adjustment: chart.caption_baseline_adjustment,
            auto_hide_captions: chart.auto_hide_captions,
            large_text: chart.large_text,
            small_text: chart.small_text,
            large_small_text_padding: chart.large_small_text_padding,
            animation_duration: chart.animation_duration,
            bands: Vec::new(),
            guideline: chart.guideline,
            scale: chart.scale,
            canvas_color: chart.canvas_color,
            frame_rate: DEFAULT_FRAME_RATE,
            looping: false,
        }
    }
}

/// A chart ready to render, plus the animation settings that only matter for GIF output.
#[derive(Debug, Clone)]
pub struct Chart {
    pub config: ChartConfig,
    pub frame_rate: f64,
    pub looping: bool,
}

impl ChartFile {
    pub fn into_chart(self, base_dir: &Path) -> Result<Chart, ConfigError> {
        let bands = self
            .bands
            .into_iter()
            .map(|band| band.into_band(base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        let config = ChartConfig {
            radius: self.radius,
            band_width: self.band_width,
            band_spacing: self.band_spacing,
            font: self.font,
            caption_padding: self.caption_padding,
            caption_baseline_adjustment: self.caption_baseline_adjustment,
            auto_hide_captions: self.auto_hide_captions,
            large_text: self.large_text,
            small_text: self.small_text,
            large_small_text_padding: self.large_small_text_padding,
            animation_duration: self.animation_duration,
            bands,
            guideline: self.guideline,
            scale: self.scale,
            canvas_color: self.canvas_color,
        };
        Ok(Chart {
            config,
            frame_rate: self.frame_rate,
            looping: self.looping,
        })
    }
}

/// Shared style defaults, applied underneath every chart file.
pub fn get_style_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "ringchart", "ringchart")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("style.toml"))
}

pub fn load_layered(chart: &Path, style: Option<&Path>) -> Result<ChartFile, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(style) = style {
        builder = builder.add_source(config::File::from(style).required(false));
    }

    let s = builder
        .add_source(config::File::from(chart).format(config::FileFormat::Toml))
        .add_source(config::Environment::with_prefix("RINGCHART").try_parsing(true))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_chart(path: &Path) -> Result<Chart, ConfigError> {
    let style = match get_style_path() {
        Ok(style) => Some(style),
        Err(e) => {
            log::warn!("Ignoring user style: {}", e);
            None
        }
    };
    let file = load_layered(path, style.as_deref())?;
    let base_dir = path.parent().unwrap_or(Path::new("."));
    file.into_chart(base_dir)
}

pub fn write_default_chart(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CHART)?;
    Ok(())
}

const DEFAULT_CHART: &str = include_str!("default_chart.toml");
