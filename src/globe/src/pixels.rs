use serde::Serialize;

use crate::{projection::ImageSize, GlobeError, Result};

pub type Pixel = [u8; 4];

const BYTES_PER_PIXEL: usize = 4;

/// Decoded world texture, row-major RGBA with a top-left origin.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    size: ImageSize,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let size = ImageSize::new(width, height)?;
        let expected = byte_len(width, height)?;

        if bytes.len() != expected {
            return Err(GlobeError::invalid(format!(
                "{width}x{height} RGBA buffer needs {expected} bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self { size, bytes })
    }

    /// Builds a buffer by evaluating `pixel` at every `(u, v)`.
    pub fn from_fn<F>(width: u32, height: u32, mut pixel: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        let mut bytes = Vec::with_capacity(byte_len(width, height)?);

        for v in 0..height {
            for u in 0..width {
                bytes.extend_from_slice(&pixel(u, v));
            }
        }

        Self::new(width, height, bytes)
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width()
    }

    pub fn height(&self) -> u32 {
        self.size.height()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn pixel(&self, u: u32, v: u32) -> Result<Pixel> {
        if u >= self.width() || v >= self.height() {
            return Err(GlobeError::IndexOutOfRange {
                u,
                v,
                width: self.width(),
                height: self.height(),
            });
        }

        let offset = (self.width() as usize * v as usize + u as usize) * BYTES_PER_PIXEL;
        let mut pixel = [0; BYTES_PER_PIXEL];
        pixel.copy_from_slice(&self.bytes[offset..offset + BYTES_PER_PIXEL]);

        Ok(pixel)
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| GlobeError::invalid(format!("{width}x{height} buffer is too large")))
}

/// Color with each channel normalized to `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl From<Pixel> for Rgba {
    fn from([r, g, b, a]: Pixel) -> Self {
        let normalize = |channel: u8| f64::from(channel) / 255.;

        Self {
            r: normalize(r),
            g: normalize(g),
            b: normalize(b),
            a: normalize(a),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Terrain,
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub category: Category,
    pub color: Rgba,
}

pub fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold > 0. && threshold < 1. {
        return Ok(());
    }

    Err(GlobeError::invalid(format!(
        "threshold must lie strictly between 0 and 1, got {threshold}"
    )))
}

/// Samples the pixel at `(u, v)` and labels it terrain when all three color
/// channels fall below `threshold`. The texture paints land near-black.
pub fn classify(buffer: &PixelBuffer, u: u32, v: u32, threshold: f64) -> Result<Sample> {
    validate_threshold(threshold)?;

    let color = Rgba::from(buffer.pixel(u, v)?);

    let category = if color.r < threshold && color.g < threshold && color.b < threshold {
        Category::Terrain
    } else {
        Category::Other
    };

    Ok(Sample { category, color })
}
