use crate::color::Color;
use cairo::Context;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Display, Deref, From, Into, AsRef)]
#[serde(transparent)]
pub struct FontFamily(String);

crate::impl_string_newtype!(FontFamily);

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, DeserializeFromStr, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl From<FontWeight> for cairo::FontWeight {
    fn from(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Normal => cairo::FontWeight::Normal,
            FontWeight::Bold => cairo::FontWeight::Bold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontSpec {
    pub family: FontFamily,
    pub size: f64,
    #[serde(default)]
    pub weight: FontWeight,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64, weight: FontWeight) -> Self {
        Self {
            family: FontFamily::new(family),
            size,
            weight,
        }
    }

    pub fn apply(&self, cr: &Context) {
        cr.select_font_face(&self.family, cairo::FontSlant::Normal, self.weight.into());
        cr.set_font_size(self.size);
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("Sans", 12.0, FontWeight::Bold)
    }
}

/// A single line of text drawn with its own font and color.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StyledText {
    pub text: String,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default = "Color::white")]
    pub color: Color,
}

impl StyledText {
    pub fn new(text: impl Into<String>, font: FontSpec, color: Color) -> Self {
        Self {
            text: text.into(),
            font,
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Horizontal advance of the whole run.
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl TextMetrics {
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

pub fn measure(cr: &Context, font: &FontSpec, text: &str) -> Result<TextMetrics, cairo::Error> {
    font.apply(cr);
    let font_extents = cr.font_extents()?;
    let text_extents = cr.text_extents(text)?;
    Ok(TextMetrics {
        width: text_extents.x_advance(),
        ascent: font_extents.ascent(),
        descent: font_extents.descent(),
    })
}

pub fn draw_text(
    cr: &Context,
    text: &str,
    font: &FontSpec,
    color: Color,
) -> Result<(), cairo::Error> {
    let (r, g, b, a) = color.components();
    font.apply(cr);
    cr.set_source_rgba(r, g, b, a);
    cr.show_text(text)
}
