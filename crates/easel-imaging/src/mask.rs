//! Synthesized grayscale masks
//!
//! 255 marks the region an edit operation may change, 0 the region to keep.
//! Output is always an 8-bit single-channel PNG.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma, imageops};

use crate::codec::{Dimensions, ImageRef};
use crate::error::{ImagingError, Result};

/// Largest accepted canvas side
pub const MAX_SIDE: i64 = 16_384;
/// Largest accepted feather radius
pub const MAX_FEATHER: i64 = 50;

const ON: Luma<u8> = Luma([255]);
const OFF: Luma<u8> = Luma([0]);

/// Geometry of a synthesized mask, sized to a canvas later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskShape {
    Rectangle {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        feather: i64,
    },
    Ellipse {
        center_x: i64,
        center_y: i64,
        radius_x: i64,
        radius_y: i64,
        feather: i64,
    },
    Full,
}

impl MaskShape {
    /// Render onto a canvas of the given size
    pub fn render(&self, canvas: Dimensions) -> Result<Vec<u8>> {
        tracing::debug!(shape = ?self, canvas = %canvas, "rendering mask");
        let (width, height) = (i64::from(canvas.width), i64::from(canvas.height));
        match *self {
            Self::Rectangle {
                x,
                y,
                width: mask_width,
                height: mask_height,
                feather,
            } => rectangle(width, height, x, y, mask_width, mask_height, feather),
            Self::Ellipse {
                center_x,
                center_y,
                radius_x,
                radius_y,
                feather,
            } => ellipse(width, height, center_x, center_y, radius_x, radius_y, feather),
            Self::Full => full(width, height),
        }
    }
}

/// Mask for an edit operation: caller-supplied or synthesized to match the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskSpec {
    Supplied(ImageRef),
    Generated(MaskShape),
}

impl MaskSpec {
    /// Mask bytes for a target of the given size
    ///
    /// Supplied masks are returned as-is; size agreement is checked separately.
    pub fn resolve(&self, target: Dimensions) -> Result<Vec<u8>> {
        match self {
            Self::Supplied(reference) => reference.read(),
            Self::Generated(shape) => shape.render(target),
        }
    }
}

/// Mask with an axis-aligned rectangle set
///
/// The rectangle covers `[x, x + mask_width) × [y, y + mask_height)` and must
/// lie entirely inside the canvas.
pub fn rectangle(
    width: i64,
    height: i64,
    x: i64,
    y: i64,
    mask_width: i64,
    mask_height: i64,
    feather: i64,
) -> Result<Vec<u8>> {
    let (canvas_w, canvas_h) = canvas(width, height)?;
    let feather = feather_radius(feather)?;

    if mask_width <= 0 || mask_height <= 0 {
        return Err(ImagingError::InvalidGeometry(format!(
            "rectangle size must be positive, got {mask_width}x{mask_height}"
        )));
    }
    if x < 0 || y < 0 {
        return Err(ImagingError::InvalidGeometry(format!(
            "rectangle origin must not be negative, got ({x}, {y})"
        )));
    }
    let exceeds = || {
        ImagingError::InvalidGeometry(format!(
            "rectangle ({x}, {y}) {mask_width}x{mask_height} exceeds canvas {width}x{height}"
        ))
    };
    let right = x.checked_add(mask_width).filter(|&r| r <= width).ok_or_else(exceeds)?;
    let bottom = y.checked_add(mask_height).filter(|&b| b <= height).ok_or_else(exceeds)?;

    // In bounds of a canvas no larger than MAX_SIDE, so these fit in u32
    let (left, top) = (to_u32(x)?, to_u32(y)?);
    let (right, bottom) = (to_u32(right)?, to_u32(bottom)?);

    let mask = GrayImage::from_fn(canvas_w, canvas_h, |px, py| {
        if (left..right).contains(&px) && (top..bottom).contains(&py) { ON } else { OFF }
    });

    encode(soften(mask, feather))
}

/// Mask with a filled ellipse set
///
/// Ellipses may extend past the canvas edge; the overflow is clipped.
pub fn ellipse(
    width: i64,
    height: i64,
    center_x: i64,
    center_y: i64,
    radius_x: i64,
    radius_y: i64,
    feather: i64,
) -> Result<Vec<u8>> {
    let (canvas_w, canvas_h) = canvas(width, height)?;
    let feather = feather_radius(feather)?;

    if radius_x <= 0 || radius_y <= 0 {
        return Err(ImagingError::InvalidGeometry(format!(
            "ellipse radii must be positive, got {radius_x}x{radius_y}"
        )));
    }
    if center_x < 0 || center_y < 0 {
        return Err(ImagingError::InvalidGeometry(format!(
            "ellipse center must not be negative, got ({center_x}, {center_y})"
        )));
    }

    let (cx, cy) = (f64::from(to_u32(center_x)?), f64::from(to_u32(center_y)?));
    let (rx, ry) = (f64::from(to_u32(radius_x)?), f64::from(to_u32(radius_y)?));

    let mask = GrayImage::from_fn(canvas_w, canvas_h, |px, py| {
        let dx = (f64::from(px) - cx) / rx;
        let dy = (f64::from(py) - cy) / ry;
        if dx.mul_add(dx, dy * dy) <= 1.0 { ON } else { OFF }
    });

    encode(soften(mask, feather))
}

/// Mask with every pixel set
pub fn full(width: i64, height: i64) -> Result<Vec<u8>> {
    let (canvas_w, canvas_h) = canvas(width, height)?;
    encode(GrayImage::from_pixel(canvas_w, canvas_h, ON))
}

fn canvas(width: i64, height: i64) -> Result<(u32, u32)> {
    if width <= 0 || height <= 0 {
        return Err(ImagingError::InvalidGeometry(format!(
            "canvas size must be positive, got {width}x{height}"
        )));
    }
    if width > MAX_SIDE || height > MAX_SIDE {
        return Err(ImagingError::InvalidGeometry(format!(
            "canvas {width}x{height} exceeds the {MAX_SIDE}px side limit"
        )));
    }
    Ok((to_u32(width)?, to_u32(height)?))
}

fn feather_radius(feather: i64) -> Result<f32> {
    if !(0..=MAX_FEATHER).contains(&feather) {
        return Err(ImagingError::InvalidGeometry(format!(
            "feather must be between 0 and {MAX_FEATHER}, got {feather}"
        )));
    }
    u8::try_from(feather)
        .map(f32::from)
        .map_err(|e| ImagingError::InvalidGeometry(e.to_string()))
}

fn to_u32(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| ImagingError::InvalidGeometry(format!("{value} is out of range")))
}

fn soften(mask: GrayImage, feather: f32) -> GrayImage {
    if feather > 0.0 { imageops::blur(&mask, feather) } else { mask }
}

fn encode(mask: GrayImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    mask.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ImagingError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}
