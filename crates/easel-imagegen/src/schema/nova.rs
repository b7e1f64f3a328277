//! Amazon Nova Canvas text-to-image parameters

use serde_json::{Map, Value};
use strum::VariantNames;

use super::field::{self, FieldSpec, Fields, ValidationError};
use crate::types::Quality;

pub const SEED_MAX: u64 = 858_993_459;
pub const PROMPT_MAX: usize = 1024;

const PROMPT: FieldSpec = FieldSpec::text("prompt", 1, PROMPT_MAX)
    .required()
    .describe("Image caption describing the subject, setting, and style");
const NEGATIVE_PROMPT: FieldSpec =
    FieldSpec::text("negative_prompt", 1, PROMPT_MAX).describe("Elements to keep out of the image");
const COLORS: FieldSpec = FieldSpec::colors(10).describe("Palette guiding the image");
const WIDTH: FieldSpec = FieldSpec::integer("width", 320, 4096, 1024)
    .step(16)
    .describe("Image width in pixels");
const HEIGHT: FieldSpec = FieldSpec::integer("height", 320, 4096, 1024)
    .step(16)
    .describe("Image height in pixels");
const QUALITY: FieldSpec =
    FieldSpec::choice("quality", Quality::VARIANTS, Some("standard")).describe("Rendering quality");
const CFG_SCALE: FieldSpec =
    FieldSpec::float("cfg_scale", 1.1, 10.0, 6.5).describe("How strictly the image follows the prompt");
const SEED: FieldSpec = FieldSpec::seed(SEED_MAX).describe("Seed for reproducible results; random when unset");
const NUMBER_OF_IMAGES: FieldSpec =
    FieldSpec::integer("number_of_images", 1, 5, 1).describe("How many images to generate");

pub(crate) const TEXT_FIELDS: &[FieldSpec] = &[
    PROMPT,
    NEGATIVE_PROMPT,
    WIDTH,
    HEIGHT,
    QUALITY,
    CFG_SCALE,
    SEED,
    NUMBER_OF_IMAGES,
];

pub(crate) const COLOR_FIELDS: &[FieldSpec] = &[
    PROMPT,
    COLORS,
    NEGATIVE_PROMPT,
    WIDTH,
    HEIGHT,
    QUALITY,
    CFG_SCALE,
    SEED,
    NUMBER_OF_IMAGES,
];

/// Image generation settings shared in shape by both Nova tasks
#[derive(Debug, Clone, PartialEq)]
pub struct NovaGeneration {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) quality: Quality,
    pub(crate) cfg_scale: f64,
    pub(crate) seed: u64,
    pub(crate) number_of_images: u32,
}

impl NovaGeneration {
    fn take(fields: &mut Fields) -> Result<Self, ValidationError> {
        Ok(Self {
            width: fields.integer("width")?,
            height: fields.integer("height")?,
            quality: fields.choice("quality")?,
            cfg_scale: fields.float("cfg_scale")?,
            seed: fields.seed()?,
            number_of_images: fields.integer("number_of_images")?,
        })
    }
}

/// `generate_image`
#[derive(Debug, Clone, PartialEq)]
pub struct NovaTextParams {
    pub(crate) prompt: String,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) generation: NovaGeneration,
}

impl NovaTextParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(TEXT_FIELDS, args)?;
        Ok(Self {
            prompt: fields.text("prompt")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            generation: NovaGeneration::take(&mut fields)?,
        })
    }
}

/// `generate_image_with_colors`
#[derive(Debug, Clone, PartialEq)]
pub struct NovaColorParams {
    pub(crate) prompt: String,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) colors: Vec<String>,
    pub(crate) generation: NovaGeneration,
}

impl NovaColorParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(COLOR_FIELDS, args)?;
        Ok(Self {
            prompt: fields.text("prompt")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            colors: fields.colors()?,
            generation: NovaGeneration::take(&mut fields)?,
        })
    }
}
