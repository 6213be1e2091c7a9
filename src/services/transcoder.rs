//! Decode, resample and re-encode stages.
//!
//! The source is decoded with whatever codec matches its header bytes,
//! stretched onto a fixed 400x400 canvas with nearest-neighbour sampling and
//! written back out as PNG.

use crate::error::{DecodeError, EncodeError};
use image::codecs::png::PngEncoder;
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage, GenericImageView, ImageEncoder, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output canvas width in pixels
pub const TARGET_WIDTH: u32 = 400;
/// Output canvas height in pixels
pub const TARGET_HEIGHT: u32 = 400;

/// A raster with the fixed output bounds, ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizedRaster(RgbaImage);

impl ResizedRaster {
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn into_image(self) -> RgbaImage {
        self.0
    }
}

/// Opens `path` and decodes it, detecting the format from its header.
pub fn decode(path: &Path) -> Result<DynamicImage, DecodeError> {
    let io = |source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(io)?
        .with_guessed_format()
        .map_err(io)?;

    reader.decode().map_err(|source| DecodeError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Stretches `src` onto a blank 400x400 canvas. Each destination pixel takes
/// the source pixel under its centre; no blending, aspect ratio is not kept.
pub fn resize(src: &DynamicImage) -> ResizedRaster {
    let (sw, sh) = src.dimensions();
    let mut dst = RgbaImage::new(TARGET_WIDTH, TARGET_HEIGHT);

    if sw == 0 || sh == 0 {
        return ResizedRaster(dst);
    }

    let xs: Vec<u32> = (0..TARGET_WIDTH)
        .map(|dx| nearest(dx, TARGET_WIDTH, sw))
        .collect();

    for dy in 0..TARGET_HEIGHT {
        let sy = nearest(dy, TARGET_HEIGHT, sh);
        for (dx, &sx) in xs.iter().enumerate() {
            dst.put_pixel(dx as u32, dy, src.get_pixel(sx, sy));
        }
    }

    ResizedRaster(dst)
}

/// Source index whose span contains the centre of destination index `d`.
fn nearest(d: u32, dst_len: u32, src_len: u32) -> u32 {
    let s = ((2 * d as u64 + 1) * src_len as u64) / (2 * dst_len as u64);
    s as u32
}

/// Writes `img` to `path` as PNG, creating or truncating the file.
pub fn encode(img: &ResizedRaster, path: &Path) -> Result<(), EncodeError> {
    let io = |source| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io)?;
    let mut writer = BufWriter::new(file);

    PngEncoder::new(&mut writer).write_image(
        img.as_image().as_raw(),
        img.width(),
        img.height(),
        ColorType::Rgba8,
    )?;

    writer.flush().map_err(io)?;
    Ok(())
}
