use crate::color::Color;
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl From<LineCap> for cairo::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => cairo::LineCap::Butt,
            LineCap::Round => cairo::LineCap::Round,
            LineCap::Square => cairo::LineCap::Square,
        }
    }
}

/// A radial marker crossing every band at a fixed position around the circle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Guideline {
    /// Fraction of the full circle, clockwise from 12 o'clock.
    pub position: f64,
    pub color: Color,
    pub line_width: f64,
    /// How far the line reaches inside the innermost band.
    pub extra_before: f64,
    /// How far the line reaches outside the outermost band.
    pub extra_after: f64,
    pub line_cap: LineCap,
    /// Alternating on/off lengths in points; empty for a solid line.
    pub dash: Vec<f64>,
}

impl Default for Guideline {
    fn default() -> Self {
        Self {
            position: 0.0,
            color: Color::white(),
            line_width: 1.0,
            extra_before: 4.0,
            extra_after: 4.0,
            line_cap: LineCap::Butt,
            dash: Vec::new(),
        }
    }
}

impl Guideline {
    pub fn at(position: f64) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn angle(&self) -> f64 {
        self.position * std::f64::consts::TAU
    }
}
