use anyhow::Context;
use globe::{GlobeError, PixelBuffer};
use image::{DynamicImage, ImageReader};
use log::info;
use std::{
    fs::File,
    io::{BufRead, BufReader, Seek},
    path::Path,
};

/// Decodes the world texture at `path` into an RGBA buffer.
pub fn load_texture<P>(path: P) -> anyhow::Result<PixelBuffer>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let buffer =
        decode_texture(BufReader::new(file)).with_context(|| format!("decoding {}", path.display()))?;

    info!(
        "loaded {} ({}x{})",
        path.display(),
        buffer.width(),
        buffer.height()
    );

    Ok(buffer)
}

pub fn decode_texture<R>(reader: R) -> anyhow::Result<PixelBuffer>
where
    R: BufRead + Seek,
{
    let mut reader = ImageReader::new(reader).with_guessed_format()?;

    // world maps routinely exceed the default decoder limits
    reader.no_limits();

    let decoder = reader.into_decoder()?;

    let image = DynamicImage::from_decoder(decoder)?;

    Ok(to_pixel_buffer(image)?)
}

pub fn to_pixel_buffer(image: DynamicImage) -> Result<PixelBuffer, GlobeError> {
    let image = image.into_rgba8();
    let (width, height) = image.dimensions();

    PixelBuffer::new(width, height, image.into_raw())
}
