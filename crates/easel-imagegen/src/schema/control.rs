//! Stability control and style parameters
//!
//! Sketch, structure and style-guide inputs carry a descriptive name on the
//! tool surface but travel as `image` on the wire; both names are accepted.

use easel_imaging::ImageRef;
use serde_json::{Map, Value};

use super::field::{self, FieldSpec, ValidationError};
use super::{NEGATIVE_PROMPT, OUTPUT_FORMAT, PROMPT, SEED};
use crate::types::OutputFormat;

const CONTROL_IMAGE: FieldSpec = FieldSpec::image("control_image")
    .aliases(&["image"])
    .describe("Sketch, edge map or depth map guiding the layout");
const CONTROL_STRENGTH: FieldSpec =
    FieldSpec::float("control_strength", 0.0, 1.0, 0.7).describe("How strictly to follow the control image");
const REFERENCE_IMAGE: FieldSpec = FieldSpec::image("reference_image")
    .aliases(&["image"])
    .describe("Image whose style is matched");
const FIDELITY: FieldSpec =
    FieldSpec::float("fidelity", 0.0, 1.0, 0.5).describe("How closely to match the reference style");
const INIT_IMAGE: FieldSpec = FieldSpec::image("init_image").describe("Content image to restyle");
const STYLE_IMAGE: FieldSpec = FieldSpec::image("style_image").describe("Image supplying the style");
const COMPOSITION_FIDELITY: FieldSpec = FieldSpec::float("composition_fidelity", 0.0, 1.0, 0.9)
    .describe("How closely to keep the content image's composition");
const STYLE_STRENGTH: FieldSpec =
    FieldSpec::float("style_strength", 0.0, 1.0, 1.0).describe("How strongly the style is applied");
const CHANGE_STRENGTH: FieldSpec =
    FieldSpec::float("change_strength", 0.0, 1.0, 0.9).describe("How much the content image may change");

pub(crate) const CONTROL_FIELDS: &[FieldSpec] =
    &[CONTROL_IMAGE, PROMPT, CONTROL_STRENGTH, NEGATIVE_PROMPT, SEED, OUTPUT_FORMAT];
pub(crate) const STYLE_GUIDE_FIELDS: &[FieldSpec] =
    &[REFERENCE_IMAGE, PROMPT, FIDELITY, NEGATIVE_PROMPT, SEED, OUTPUT_FORMAT];
pub(crate) const STYLE_TRANSFER_FIELDS: &[FieldSpec] = &[
    INIT_IMAGE,
    STYLE_IMAGE,
    PROMPT,
    COMPOSITION_FIDELITY,
    STYLE_STRENGTH,
    CHANGE_STRENGTH,
    NEGATIVE_PROMPT,
    SEED,
    OUTPUT_FORMAT,
];

/// `sketch_to_image` and `structure_control`
#[derive(Debug, Clone, PartialEq)]
pub struct ControlParams {
    pub(crate) control_image: ImageRef,
    pub(crate) prompt: String,
    pub(crate) control_strength: f64,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl ControlParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(CONTROL_FIELDS, args)?;
        Ok(Self {
            control_image: fields.image("control_image")?,
            prompt: fields.text("prompt")?,
            control_strength: fields.float("control_strength")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// `style_guide`
#[derive(Debug, Clone, PartialEq)]
pub struct StyleGuideParams {
    pub(crate) reference_image: ImageRef,
    pub(crate) prompt: String,
    pub(crate) fidelity: f64,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl StyleGuideParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(STYLE_GUIDE_FIELDS, args)?;
        Ok(Self {
            reference_image: fields.image("reference_image")?,
            prompt: fields.text("prompt")?,
            fidelity: fields.float("fidelity")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}

/// `style_transfer`
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTransferParams {
    pub(crate) init_image: ImageRef,
    pub(crate) style_image: ImageRef,
    pub(crate) prompt: String,
    pub(crate) composition_fidelity: f64,
    pub(crate) style_strength: f64,
    pub(crate) change_strength: f64,
    pub(crate) negative_prompt: Option<String>,
    pub(crate) seed: u64,
    pub(crate) output_format: OutputFormat,
}

impl StyleTransferParams {
    pub(crate) fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut fields = field::validate(STYLE_TRANSFER_FIELDS, args)?;
        Ok(Self {
            init_image: fields.image("init_image")?,
            style_image: fields.image("style_image")?,
            prompt: fields.text("prompt")?,
            composition_fidelity: fields.float("composition_fidelity")?,
            style_strength: fields.float("style_strength")?,
            change_strength: fields.float("change_strength")?,
            negative_prompt: fields.optional_text("negative_prompt"),
            seed: fields.seed()?,
            output_format: fields.choice("output_format")?,
        })
    }
}
