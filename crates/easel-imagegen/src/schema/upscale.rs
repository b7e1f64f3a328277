//! Stability upscaler parameters

use easel_imaging::ImageRef;
use serde_json::{Map, Value};

use super::field::{self, FieldSpec, ValidationError};
use super::{IMAGE, NEGATIVE_PROMPT, OUTPUT_FORMAT, PROMPT, SEED, STYLE_PRESET};
use crate::types::{OutputFormat, StylePreset};

const CREATIVITY: FieldSpec =
    FieldSpec::float("creativity", 0.1, 0.5, 0.3).describe("How much detail the upscaler may invent");

pub(crate) const CREATIVE_FIELDS: &[FieldSpec] = &[
    IMAGE,
    PROMPT,
    CREATIVITY,
    NEGATIVE_PROMPT,
    SEED,
    STYLE_PRESET,
    OUTPUT_FORMAT,
];
pub(crate) const CONSERVATIVE_FIELDS: &[FieldSpec] = &[IMAGE, PROMPT, NEGATIVE_PROMPT, SEED, OUTPUT_FORMAT];
pub(crate) const FAST_FIELDS: &[FieldSpec] = &[IMAGE, OUTPUT_FORMAT];

/// `upscale_creative`
#[derive(Debug, Clone, PartialEq)]
pub struct CreativeUpscaleParams {
    pub(crate) image: ImageRef,
    pub(crate) prompt: String,
    pub(crate) creativity: f64,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) seed: u64,
    pub(crate) style_preset: Option<StylePreset>,
    pub(crate) output_format: OutputFormat,
}

impl CreativeUpscaleParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(CREATIVE_FIELDS, args)?;
        Ok(Self {
            image: fields.image("image")?,
            prompt: fields.text("prompt")?,
            creativity: fields.float("creativity")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            seed: fields.seed()?,
            style_preset: fields.optional_choice("style_preset")?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// `upscale_conservative`
#[derive(Debug, Clone, PartialEq)]
pub struct ConservativeUpscaleParams {
    pub(crate) image: ImageRef,
    pub(crate) prompt: String,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl ConservativeUpscaleParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(CONSERVATIVE_FIELDS, args)?;
        Ok(Self {
            image: fields.image("image")?,
            prompt: fields.text("prompt")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// `upscale_fast`
#[derive(Debug, Clone, PartialEq)]
pub struct FastUpscaleParams {
    pub(crate) image: ImageRef,
    pub(crate) output_format: OutputFormat,
}

impl FastUpscaleParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(FAST_FIELDS, args)?;
        Ok(Self {
            image: fields.image("image")?,
            output_format: fields.choice("output_format")?,
        })
    }
}
