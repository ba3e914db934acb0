use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use palette::Srgb;
use std::collections::HashMap;

/// Width the image is scaled to before counting.
pub const SAMPLE_WIDTH: u32 = 100;

/// Pixels with an alpha below this are not counted.
pub const ALPHA_THRESHOLD: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    pub width: u32,
    pub alpha_threshold: u8,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            width: SAMPLE_WIDTH,
            alpha_threshold: ALPHA_THRESHOLD,
        }
    }
}

pub fn dominant_color_from_bytes(bytes: &[u8], options: SampleOptions) -> Result<Option<Srgb<u8>>> {
    let img = image::load_from_memory(bytes).context("Failed to decode image")?;
    Ok(dominant_color(&img, options))
}

/// Most frequent exact RGB triple among the opaque pixels of a downscaled
/// copy of `img`. Returns `None` when no pixel passes the alpha threshold.
pub fn dominant_color(img: &DynamicImage, options: SampleOptions) -> Option<Srgb<u8>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 || options.width == 0 {
        return None;
    }

    let sample_height = ((height as f64 / width as f64) * options.width as f64)
        .round()
        .max(1.0) as u32;

    let mut sample = img.to_rgba8();
    if width != options.width || height != sample_height {
        premultiply(&mut sample);
        sample = imageops::resize(&sample, options.width, sample_height, FilterType::Triangle);
        unpremultiply(&mut sample);
    }

    dominant_color_rgba(&sample, options.alpha_threshold)
}

// Resampling straight RGBA lets the color of transparent pixels bleed into
// their neighbours, so channels are weighted by alpha around the resize.
fn premultiply(img: &mut RgbaImage) {
    for pixel in img.pixels_mut() {
        let a = pixel[3] as u32;
        for c in 0..3 {
            pixel[c] = ((pixel[c] as u32 * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply(img: &mut RgbaImage) {
    for pixel in img.pixels_mut() {
        let a = pixel[3] as u32;
        if a == 0 {
            continue;
        }
        for c in 0..3 {
            pixel[c] = ((pixel[c] as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Exact-match histogram over `pixels`. Ties go to the color seen first.
pub fn dominant_color_rgba(pixels: &RgbaImage, alpha_threshold: u8) -> Option<Srgb<u8>> {
    let mut index: HashMap<[u8; 3], usize> = HashMap::new();
    let mut counts: Vec<([u8; 3], u32)> = Vec::new();

    for pixel in pixels.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < alpha_threshold {
            continue;
        }
        let key = [r, g, b];
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    let mut best: Option<([u8; 3], u32)> = None;
    for &(key, count) in &counts {
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((key, count));
        }
    }

    best.map(|([r, g, b], count)| {
        log::trace!("Dominant color {:?} seen {} times among {} colors", [r, g, b], count, counts.len());
        Srgb::new(r, g, b)
    })
}

pub fn color_to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}
