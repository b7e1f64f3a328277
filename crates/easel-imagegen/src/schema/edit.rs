//! Stability edit parameters: fill, extend, replace, recolor, erase

use easel_imaging::{ImageRef, MaskSpec};
use serde_json::{Map, Value};

use super::field::{self, FieldSpec, ValidationError};
use super::{IMAGE, NEGATIVE_PROMPT, OUTPUT_FORMAT, PROMPT, SEED};
use crate::types::OutputFormat;

const MASK: FieldSpec =
    FieldSpec::mask("mask").describe("Same size as the image; white marks the area to change");
const GROW_MASK: FieldSpec =
    FieldSpec::integer("grow_mask", 0, 20, 5).describe("Pixels to grow the mask edges by, softening the seam");
const LEFT: FieldSpec = FieldSpec::integer("left", 0, 2000, 0).describe("Pixels to add on the left");
const RIGHT: FieldSpec = FieldSpec::integer("right", 0, 2000, 0).describe("Pixels to add on the right");
const UP: FieldSpec = FieldSpec::integer("up", 0, 2000, 0).describe("Pixels to add on top");
const DOWN: FieldSpec = FieldSpec::integer("down", 0, 2000, 0).describe("Pixels to add at the bottom");
const OUTPAINT_CREATIVITY: FieldSpec =
    FieldSpec::float("creativity", 0.0, 1.0, 0.5).describe("How freely the extension may depart from the image");
const SEARCH_PROMPT: FieldSpec = FieldSpec::text("search_prompt", 1, super::STABILITY_PROMPT_MAX)
    .required()
    .describe("Object to find and replace");
const SELECT_PROMPT: FieldSpec = FieldSpec::text("select_prompt", 1, super::STABILITY_PROMPT_MAX)
    .required()
    .describe("Object to find and recolor");

pub(crate) const INPAINT_FIELDS: &[FieldSpec] =
    &[IMAGE, MASK, PROMPT, NEGATIVE_PROMPT, GROW_MASK, SEED, OUTPUT_FORMAT];
pub(crate) const OUTPAINT_FIELDS: &[FieldSpec] = &[
    IMAGE,
    PROMPT,
    LEFT,
    RIGHT,
    UP,
    DOWN,
    OUTPAINT_CREATIVITY,
    NEGATIVE_PROMPT,
    SEED,
    OUTPUT_FORMAT,
];
pub(crate) const SEARCH_REPLACE_FIELDS: &[FieldSpec] =
    &[IMAGE, SEARCH_PROMPT, PROMPT, NEGATIVE_PROMPT, SEED, OUTPUT_FORMAT];
pub(crate) const SEARCH_RECOLOR_FIELDS: &[FieldSpec] =
    &[IMAGE, SELECT_PROMPT, PROMPT, NEGATIVE_PROMPT, SEED, OUTPUT_FORMAT];
pub(crate) const REMOVE_OBJECT_FIELDS: &[FieldSpec] = &[IMAGE, MASK, GROW_MASK, SEED, OUTPUT_FORMAT];
pub(crate) const REMOVE_BACKGROUND_FIELDS: &[FieldSpec] = &[IMAGE, OUTPUT_FORMAT];

/// `inpaint_image`
#[derive(Debug, Clone, PartialEq)]
pub struct InpaintParams {
    pub(crate) image: ImageRef,
    pub(crate) mask: MaskSpec,
    pub(crate) prompt: String,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) grow_mask: u32,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl InpaintParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(INPAINT_FIELDS, args)?;
        Ok(Self {
            image: fields.image("image")?,
            mask: fields.mask("mask")?,
            prompt: fields.text("prompt")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            grow_mask: fields.integer("grow_mask")?,
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// Pixels added on each side by an outpaint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    pub left: u32,
    pub right: u32,
    pub up: u32,
    pub down: u32,
}

/// `outpaint_image`
#[derive(Debug, Clone, PartialEq)]
pub struct OutpaintParams {
    pub(crate) image: ImageRef,
    pub(crate) prompt: String,
    pub(crate) expansion: Expansion,
    pub(crate) creativity: f64,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl OutpaintParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(OUTPAINT_FIELDS, args)?;
        Ok(Self {
            image: fields.image("image")?,
            prompt: fields.text("prompt")?,
            expansion: Expansion {
                left: fields.integer("left")?,
                right: fields.integer("right")?,
                up: fields.integer("up")?,
                down: fields.integer("down")?,
            },
            creativity: fields.float("creativity")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// `search_and_replace`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReplaceParams {
    pub(crate) image: ImageRef,
    pub(crate) search_prompt: String,
    pub(crate) prompt: String,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl SearchReplaceParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(SEARCH_REPLACE_FIELDS, args)?;
        Ok(Self {
            image: fields.image("image")?,
            search_prompt: fields.text("search_prompt")?,
            prompt: fields.text("prompt")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// `search_and_recolor`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRecolorParams {
    pub(crate) image: ImageRef,
    pub(crate) select_prompt: String,
    pub(crate) prompt: String,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl SearchRecolorParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(SEARCH_RECOLOR_FIELDS, args)?;
        Ok(Self {
            image: fields.image("image")?,
            select_prompt: fields.text("select_prompt")?,
            prompt: fields.text("prompt")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// `remove_object`
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveObjectParams {
    pub(crate) image: ImageRef,
    pub(crate) mask: MaskSpec,
    pub(crate) grow_mask: u32,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl RemoveObjectParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(REMOVE_OBJECT_FIELDS, args)?;
        Ok(Self {
            image: fields.image("image")?,
            mask: fields.mask("mask")?,
            grow_mask: fields.integer("grow_mask")?,
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// `remove_background`
///
/// The requested format is kept only to report it; output is always PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveBackgroundParams {
    pub(crate) image: ImageRef,
    pub(crate) requested_format: OutputFormat,
}

impl RemoveBackgroundParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(REMOVE_BACKGROUND_FIELDS, args)?;
        Ok(Self {
            image: fields.image("image")?,
            requested_format: fields.choice("output_format")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::tests::{args, png_b64};

    #[test]
    fn inpaint_requires_mask() {
        let err = InpaintParams::from_args(&args(json!({ "image": png_b64(64, 64), "prompt": "x" }))).unwrap_err();
        assert_eq!(err.violations[0].field, "mask");
    }

    #[test]
    fn grow_mask_bounds() {
        let image = png_b64(64, 64);
        for (grow, ok) in [(0, true), (20, true), (21, false), (-1, false)] {
            let input = args(json!({ "image": image, "mask": image, "grow_mask": grow }));
            assert_eq!(RemoveObjectParams::from_args(&input).is_ok(), ok, "{grow}");
        }
    }

    #[test]
    fn outpaint_directions_default_to_zero_and_cap_at_2000() {
        let image = png_b64(64, 64);
        let params = OutpaintParams::from_args(&args(json!({ "image": image, "prompt": "x", "left": 2000 }))).unwrap();
        assert_eq!(
            params.expansion,
            Expansion {
                left: 2000,
                right: 0,
                up: 0,
                down: 0
            }
        );

        let err = OutpaintParams::from_args(&args(json!({ "image": image, "prompt": "x", "up": 2001, "down": -5 })))
            .unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["up", "down"]);
    }

    #[test]
    fn search_operations_need_their_selector() {
        let image = png_b64(64, 64);
        let err = SearchReplaceParams::from_args(&args(json!({ "image": image, "prompt": "x" }))).unwrap_err();
        assert_eq!(err.violations[0].field, "search_prompt");

        let err = SearchRecolorParams::from_args(&args(json!({ "image": image, "prompt": "x" }))).unwrap_err();
        assert_eq!(err.violations[0].field, "select_prompt");
    }

    #[test]
    fn remove_background_records_requested_format() {
        let params =
            RemoveBackgroundParams::from_args(&args(json!({ "image": png_b64(64, 64), "output_format": "webp" })))
                .unwrap();
        assert_eq!(params.requested_format, OutputFormat::Webp);
    }
}
