//! Stable Diffusion 3.5 Large parameters

use easel_imaging::ImageRef;
use serde_json::{Map, Value};
use strum::VariantNames;

use super::field::{self, FieldSpec, ValidationError};
use super::{IMAGE, NEGATIVE_PROMPT, OUTPUT_FORMAT, PROMPT, SEED};
use crate::types::{AspectRatio, OutputFormat};

const ASPECT_RATIO: FieldSpec =
    FieldSpec::choice("aspect_ratio", AspectRatio::VARIANTS, Some("1:1")).describe("Frame of the generated image");
const STRENGTH: FieldSpec = FieldSpec::float_unset("strength", 0.0, 1.0)
    .required()
    .describe("How far to depart from the input image");

pub(crate) const TEXT_FIELDS: &[FieldSpec] = &[PROMPT, NEGATIVE_PROMPT, ASPECT_RATIO, SEED, OUTPUT_FORMAT];
pub(crate) const IMAGE_FIELDS: &[FieldSpec] = &[PROMPT, IMAGE, STRENGTH, NEGATIVE_PROMPT, SEED, OUTPUT_FORMAT];

/// `generate_image_sd35`
#[derive(Debug, Clone, PartialEq)]
pub struct Sd35TextParams {
    pub(crate) prompt: String,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) aspect_ratio: AspectRatio,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl Sd35TextParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(TEXT_FIELDS, args)?;
        Ok(Self {
            prompt: fields.text("prompt")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            aspect_ratio: fields.choice("aspect_ratio")?,
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// `transform_image_sd35`
#[derive(Debug, Clone, PartialEq)]
pub struct Sd35ImageParams {
    pub(crate) prompt: String,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) image: ImageRef,
    pub(crate) strength: f64,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl Sd35ImageParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(IMAGE_FIELDS, args)?;
        Ok(Self {
            prompt: fields.text("prompt")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            image: fields.image("image")?,
            strength: fields.float("strength")?,
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}
