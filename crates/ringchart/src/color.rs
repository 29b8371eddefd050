use derive_more::{Deref, From, Into};
use palette::rgb::FromHexError;
use palette::{Mix, Srgb, Srgba, WithAlpha};
use serde_with::DeserializeFromStr;
use std::str::FromStr;
use thiserror::Error;

/// An sRGB color with straight alpha, components in `0.0..=1.0`.
///
/// Parses from `#rgb`, `#rrggbb`, `#rgba` and `#rrggbbaa` hex strings (the leading `#` is
/// optional), which is also how it deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, DeserializeFromStr)]
pub struct Color(Srgba<f64>);

#[derive(Debug, Error)]
#[error("invalid color '{input}': {source}")]
pub struct ColorParseError {
    input: String,
    source: FromHexError,
}

impl Color {
    pub fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self(Srgba::new(red, green, blue, alpha))
    }

    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn components(&self) -> (f64, f64, f64, f64) {
        self.0.into_components()
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn faded(&self, factor: f64) -> Self {
        let mut color = self.0;
        color.alpha *= factor.clamp(0.0, 1.0);
        Self(color)
    }

    /// Linear interpolation in gamma-encoded space; `factor` is clamped to `0.0..=1.0`.
    pub fn mix(&self, other: Color, factor: f64) -> Self {
        Self(self.0.mix(other.0, factor))
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let parsed = match hex.len() {
            4 | 8 => Srgba::<u8>::from_str(hex).map(|c| c.into_format::<f64, f64>()),
            _ => Srgb::<u8>::from_str(hex).map(|c| c.into_format::<f64>().with_alpha(1.0)),
        };
        parsed.map(Self).map_err(|source| ColorParseError {
            input: s.to_string(),
            source,
        })
    }
}
