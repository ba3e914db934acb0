mod dominant;
mod palette;

pub use crate::dominant::{
    color_to_hex, dominant_color, dominant_color_from_bytes, dominant_color_rgba, SampleOptions,
    ALPHA_THRESHOLD, SAMPLE_WIDTH,
};
pub use crate::palette::{extract_palette, ThemePalette};
