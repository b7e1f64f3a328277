//! Per-operation image checks run before any remote call

use easel_imaging::precondition::{check_mask_format, check_mask_matches, check_max_pixels, check_min, check_min_pixels};
use easel_imaging::{Dimensions, ImageRef, MaskSpec, codec};
use serde_json::{Map, Value};

use crate::error::ImageGenError;
use crate::request::WireImages;
use crate::schema::OperationParams;

/// Smallest side accepted by the Stability image operations
pub const MIN_SIDE: u32 = 64;
/// Creative upscale input ceiling; exceeding it only warns
pub const CREATIVE_MAX_PIXELS: u64 = 1_048_576;
pub const CONSERVATIVE_MAX_PIXELS: u64 = 9_437_184;
pub const FAST_MIN_PIXELS: u64 = 1_024;
pub const FAST_MAX_PIXELS: u64 = 1_048_576;

/// Images resolved and checked for one call
#[derive(Debug, Default)]
pub struct PreparedInputs {
    pub images: WireImages,
    /// Input dimensions and warnings to report back
    pub metadata: Map<String, Value>,
}

impl PreparedInputs {
    fn image(&mut self, key: &str, bytes: &[u8], dims: Dimensions) {
        self.images.image = Some(codec::encode(bytes));
        self.metadata.insert(key.to_owned(), Value::String(dims.to_string()));
    }

    fn warn(&mut self, warning: String) {
        let warnings = self
            .metadata
            .entry("warnings")
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = warnings {
            list.push(Value::String(warning));
        }
    }
}

/// Resolve every image input and enforce the operation's size rules
pub fn prepare(params: &OperationParams) -> Result<PreparedInputs, ImageGenError> {
    let mut prepared = PreparedInputs::default();

    match params {
        OperationParams::GenerateImage(_)
        | OperationParams::GenerateImageWithColors(_)
        | OperationParams::GenerateImageSd35(_) => {}
        OperationParams::TransformImageSd35(p) => min_side(&mut prepared, &p.image)?,
        OperationParams::UpscaleCreative(p) => {
            let bytes = p.image.read()?;
            let dims = check_min(&bytes, MIN_SIDE, MIN_SIDE)?;
            if let Err(e) = check_max_pixels(&bytes, CREATIVE_MAX_PIXELS) {
                tracing::warn!(dimensions = %dims, limit = CREATIVE_MAX_PIXELS, "creative upscale input above pixel ceiling");
                prepared.warn(format!("{e}; the upscale may fail or be slow"));
            }
            prepared.image("input_dimensions", &bytes, dims);
        }
        OperationParams::UpscaleConservative(p) => {
            let bytes = p.image.read()?;
            let dims = check_min(&bytes, MIN_SIDE, MIN_SIDE)?;
            check_max_pixels(&bytes, CONSERVATIVE_MAX_PIXELS)?;
            prepared.image("input_dimensions", &bytes, dims);
        }
        OperationParams::UpscaleFast(p) => {
            let bytes = p.image.read()?;
            let dims = check_min_pixels(&bytes, FAST_MIN_PIXELS)?;
            check_max_pixels(&bytes, FAST_MAX_PIXELS)?;
            prepared.image("input_dimensions", &bytes, dims);
        }
        OperationParams::InpaintImage(p) => masked(&mut prepared, &p.image, &p.mask)?,
        OperationParams::RemoveObject(p) => masked(&mut prepared, &p.image, &p.mask)?,
        OperationParams::OutpaintImage(p) => min_side(&mut prepared, &p.image)?,
        OperationParams::SearchAndReplace(p) => min_side(&mut prepared, &p.image)?,
        OperationParams::SearchAndRecolor(p) => min_side(&mut prepared, &p.image)?,
        OperationParams::RemoveBackground(p) => min_side(&mut prepared, &p.image)?,
        OperationParams::SketchToImage(p) | OperationParams::StructureControl(p) => {
            min_side(&mut prepared, &p.control_image)?;
        }
        OperationParams::StyleGuide(p) => min_side(&mut prepared, &p.reference_image)?,
        OperationParams::StyleTransfer(p) => {
            let init = p.init_image.read()?;
            let init_dims = check_min(&init, MIN_SIDE, MIN_SIDE)?;
            let style = p.style_image.read()?;
            let style_dims = check_min(&style, MIN_SIDE, MIN_SIDE)?;
            prepared.image("init_dimensions", &init, init_dims);
            prepared.images.style_image = Some(codec::encode(&style));
            prepared
                .metadata
                .insert("style_dimensions".to_owned(), Value::String(style_dims.to_string()));
        }
    }

    Ok(prepared)
}

fn min_side(prepared: &mut PreparedInputs, image: &ImageRef) -> Result<(), ImageGenError> {
    let bytes = image.read()?;
    let dims = check_min(&bytes, MIN_SIDE, MIN_SIDE)?;
    prepared.image("input_dimensions", &bytes, dims);
    Ok(())
}

// Mask format is checked before size so a colour-mapped mask reports the real problem
fn masked(prepared: &mut PreparedInputs, image: &ImageRef, mask: &MaskSpec) -> Result<(), ImageGenError> {
    let bytes = image.read()?;
    let dims = check_min(&bytes, MIN_SIDE, MIN_SIDE)?;
    let mask_bytes = mask.resolve(dims)?;
    check_mask_format(&mask_bytes)?;
    check_mask_matches(&bytes, &mask_bytes)?;

    prepared.image("input_dimensions", &bytes, dims);
    prepared.images.mask = Some(codec::encode(&mask_bytes));
    if matches!(mask, MaskSpec::Generated(_)) {
        prepared.metadata.insert("mask_generated".to_owned(), Value::Bool(true));
    }
    Ok(())
}
