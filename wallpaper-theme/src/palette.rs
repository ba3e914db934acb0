use crate::dominant::{color_to_hex, dominant_color, SampleOptions};
use anyhow::{Context, Result};
use palette::{FromColor, Hsl, ShiftHue, Srgb};
use std::path::Path;

/// Page colors derived from a wallpaper's dominant color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePalette {
    pub dominant: String,
    pub background: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl ThemePalette {
    pub fn from_dominant(color: Srgb<u8>) -> Self {
        let primary: Srgb<f32> = color.into_format();
        let background = darken(&primary, 0.2);
        let secondary = lighten(&primary, 0.8);
        let accent = complement(&primary);

        Self {
            dominant: color_to_hex(color),
            background: float_to_hex(background),
            primary: float_to_hex(primary),
            secondary: float_to_hex(secondary),
            accent: float_to_hex(accent),
        }
    }
}

pub fn extract_palette<P: AsRef<Path>>(path: P, options: SampleOptions) -> Result<Option<ThemePalette>> {
    let img = image::open(path.as_ref())
        .with_context(|| format!("Failed to open image {}", path.as_ref().display()))?;
    Ok(dominant_color(&img, options).map(ThemePalette::from_dominant))
}

fn darken(color: &Srgb<f32>, factor: f32) -> Srgb<f32> {
    Srgb::new(color.red * factor, color.green * factor, color.blue * factor)
}

fn lighten(color: &Srgb<f32>, factor: f32) -> Srgb<f32> {
    Srgb::new(
        color.red + (1.0 - color.red) * factor,
        color.green + (1.0 - color.green) * factor,
        color.blue + (1.0 - color.blue) * factor,
    )
}

fn complement(color: &Srgb<f32>) -> Srgb<f32> {
    let hsl: Hsl = Hsl::from_color(*color);
    Srgb::from_color(hsl.shift_hue(180.0))
}

fn float_to_hex(color: Srgb<f32>) -> String {
    color_to_hex(color.into_format())
}
