//! Fit images into a carrier's MMS size budget.
//!
//! Quality is binary-searched first; if even the lowest quality is too large the
//! dimensions shrink step by step and the search repeats. When nothing fits, the
//! smallest encoding produced is returned rather than failing the send.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat, RgbImage};
use thiserror::Error;

pub const MIN_JPEG_QUALITY: u8 = 10;
pub const MAX_JPEG_QUALITY: u8 = 100;
/// Dimension multiplier applied on each downscale step.
pub const DOWNSCALE_FACTOR: f32 = 0.96;
pub const MAX_DOWNSCALE_ITERATIONS: u32 = 8;
/// Downscaling stops before the longer side would drop below this.
pub const MIN_DIMENSION: u32 = 720;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode JPEG: {0}")]
    Encode(String),
}

#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// `None` when the source was passed through untouched.
    pub quality: Option<u8>,
    pub within_budget: bool,
}

impl CompressedImage {
    pub fn mime_type(&self) -> &'static str {
        super::content_type::IMAGE_JPEG
    }
}

/// Produce a JPEG no larger than `max_bytes` where possible.
///
/// Only an undecodable source is an error; an image that cannot be squeezed under
/// the budget comes back as the smallest attempt with `within_budget == false`.
pub fn compress_image_to_fit(
    source: &[u8],
    max_bytes: usize,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> Result<CompressedImage, ImageError> {
    let format = image::guess_format(source).ok();
    let decoded =
        image::load_from_memory(source).map_err(|e| ImageError::Decode(e.to_string()))?;
    let (source_width, source_height) = decoded.dimensions();

    let (base_width, base_height) =
        fit_within(source_width, source_height, max_width, max_height);
    let (mut width, mut height) = (base_width, base_height);

    if format == Some(ImageFormat::Jpeg)
        && source.len() <= max_bytes
        && (width, height) == (source_width, source_height)
    {
        log::debug!("Image already fits ({} bytes), passing through", source.len());
        return Ok(CompressedImage {
            data: source.to_vec(),
            width,
            height,
            quality: None,
            within_budget: true,
        });
    }

    let rgb = decoded.to_rgb8();
    let mut smallest: Option<CompressedImage> = None;

    for iteration in 0..=MAX_DOWNSCALE_ITERATIONS {
        let frame = resize_rgb(&rgb, width, height);

        if let Some(found) = search_quality(&frame, max_bytes, &mut smallest)? {
            log::debug!(
                "Compressed image to {} bytes at {}x{} q{} after {} downscale steps",
                found.data.len(),
                found.width,
                found.height,
                found.quality.unwrap_or(0),
                iteration
            );
            return Ok(found);
        }

        match downscale_step(base_width, base_height, iteration + 1) {
            Some((w, h)) => {
                width = w;
                height = h;
            }
            None => break,
        }
    }

    match smallest {
        Some(best) => {
            log::warn!(
                "Image still {} bytes over budget of {}; sending smallest attempt",
                best.data.len().saturating_sub(max_bytes),
                max_bytes
            );
            Ok(best)
        }
        None => Err(ImageError::Encode("no encoding attempt produced output".to_string())),
    }
}

/// Binary search for the highest quality that fits; records the smallest attempt seen.
fn search_quality(
    frame: &RgbImage,
    max_bytes: usize,
    smallest: &mut Option<CompressedImage>,
) -> Result<Option<CompressedImage>, ImageError> {
    let mut low = MIN_JPEG_QUALITY;
    let mut high = MAX_JPEG_QUALITY;
    let mut best: Option<CompressedImage> = None;

    while low <= high {
        let quality = low + (high - low) / 2;
        let data = encode_jpeg(frame, quality)?;
        let fits = data.len() <= max_bytes;

        let attempt = CompressedImage {
            data,
            width: frame.width(),
            height: frame.height(),
            quality: Some(quality),
            within_budget: fits,
        };

        if smallest
            .as_ref()
            .map_or(true, |s| attempt.data.len() < s.data.len())
        {
            *smallest = Some(attempt.clone());
        }

        if fits {
            best = Some(attempt);
            low = quality + 1;
        } else {
            if quality == MIN_JPEG_QUALITY {
                break;
            }
            high = quality - 1;
        }
    }

    Ok(best)
}

fn encode_jpeg(frame: &RgbImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(frame)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(out)
}

fn resize_rgb(rgb: &RgbImage, width: u32, height: u32) -> RgbImage {
    if rgb.dimensions() == (width, height) {
        return rgb.clone();
    }
    image::imageops::resize(rgb, width, height, FilterType::Triangle)
}

/// Scale down to fit the optional bounds, keeping aspect ratio. Never upscales.
pub fn fit_within(
    width: u32,
    height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> (u32, u32) {
    let width_ratio = max_width.map_or(1.0, |m| m as f32 / width.max(1) as f32);
    let height_ratio = max_height.map_or(1.0, |m| m as f32 / height.max(1) as f32);
    let ratio = width_ratio.min(height_ratio).min(1.0);

    if ratio >= 1.0 {
        return (width, height);
    }

    (
        ((width as f32 * ratio) as u32).max(1),
        ((height as f32 * ratio) as u32).max(1),
    )
}

/// Dimensions after `step` successive 4% shrinks of the base size, both axes
/// scaled by the same factor. `None` once the longer side would fall below
/// [`MIN_DIMENSION`].
pub fn downscale_step(base_width: u32, base_height: u32, step: u32) -> Option<(u32, u32)> {
    let scale = DOWNSCALE_FACTOR.powi(step as i32);
    let width = ((base_width as f32 * scale).round() as u32).max(1);
    let height = ((base_height as f32 * scale).round() as u32).max(1);

    if width.max(height) < MIN_DIMENSION {
        None
    } else {
        Some((width, height))
    }
}
