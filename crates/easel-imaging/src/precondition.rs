//! Dimension checks that need decoded image headers

use image::ColorType;

use crate::codec::{self, Dimensions};
use crate::error::{ImagingError, Result};

/// Fail when either side is below the minimum
pub fn check_min(bytes: &[u8], min_width: u32, min_height: u32) -> Result<Dimensions> {
    let dims = codec::probe_dimensions(bytes)?;
    if dims.width < min_width || dims.height < min_height {
        return Err(ImagingError::DimensionTooSmall(format!(
            "Image dimensions {dims} are below the minimum of {min_width}x{min_height}"
        )));
    }
    Ok(dims)
}

/// Fail when the pixel count exceeds `max_pixels`
pub fn check_max_pixels(bytes: &[u8], max_pixels: u64) -> Result<Dimensions> {
    let dims = codec::probe_dimensions(bytes)?;
    if dims.pixels() > max_pixels {
        return Err(ImagingError::DimensionTooLarge(format!(
            "Image {dims} has {} pixels, above the maximum of {max_pixels}",
            dims.pixels()
        )));
    }
    Ok(dims)
}

/// Fail when the pixel count is below `min_pixels`
pub fn check_min_pixels(bytes: &[u8], min_pixels: u64) -> Result<Dimensions> {
    let dims = codec::probe_dimensions(bytes)?;
    if dims.pixels() < min_pixels {
        return Err(ImagingError::DimensionTooSmall(format!(
            "Image {dims} has {} pixels, below the minimum of {min_pixels}",
            dims.pixels()
        )));
    }
    Ok(dims)
}

/// Fail when mask and image differ in pixel size
pub fn check_mask_matches(image_bytes: &[u8], mask_bytes: &[u8]) -> Result<Dimensions> {
    let image = codec::probe_dimensions(image_bytes)?;
    let mask = codec::probe_dimensions(mask_bytes)?;
    if image != mask {
        return Err(ImagingError::MaskMismatch(format!(
            "Mask dimensions {mask} do not match image dimensions {image}"
        )));
    }
    Ok(image)
}

/// Fail unless the mask is 8-bit grayscale or RGB, with or without alpha
pub fn check_mask_format(mask_bytes: &[u8]) -> Result<()> {
    let info = codec::probe(mask_bytes)?;
    match info.color {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => Ok(()),
        other => Err(ImagingError::UnsupportedMaskFormat(format!(
            "{other:?}; use 8-bit grayscale or RGB"
        ))),
    }
}
