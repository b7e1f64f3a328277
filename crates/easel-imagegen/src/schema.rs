//! Per-operation parameter validation
//!
//! Each operation declares a field table. Parsing checks caller arguments
//! against the table, reports every violation at once, and only then builds
//! the typed parameters, so a value of [`OperationParams`] is always valid.

pub(crate) mod control;
pub(crate) mod edit;
pub(crate) mod field;
pub(crate) mod nova;
pub(crate) mod sd35;
pub(crate) mod upscale;

use serde_json::{Map, Value};
use strum::VariantNames;

pub use self::control::{ControlParams, StyleGuideParams, StyleTransferParams};
pub use self::edit::{
    Expansion, InpaintParams, OutpaintParams, RemoveBackgroundParams, RemoveObjectParams, SearchRecolorParams,
    SearchReplaceParams,
};
pub use self::field::{FieldKind, FieldSpec, ValidationError, Violation};
pub use self::nova::{NovaColorParams, NovaGeneration, NovaTextParams};
pub use self::sd35::{Sd35ImageParams, Sd35TextParams};
pub use self::upscale::{ConservativeUpscaleParams, CreativeUpscaleParams, FastUpscaleParams};

use crate::operation::Operation;
use crate::types::{OutputFormat, StylePreset};

/// Upper bound for Stability seeds
pub const STABILITY_SEED_MAX: u64 = 4_294_967_294;
/// Prompt length limit for Stability models
pub const STABILITY_PROMPT_MAX: usize = 10_000;

pub(crate) const PROMPT: FieldSpec = FieldSpec::text("prompt", 1, STABILITY_PROMPT_MAX)
    .required()
    .describe("Description of the desired result");
pub(crate) const NEGATIVE_PROMPT: FieldSpec = FieldSpec::text("negative_prompt", 1, STABILITY_PROMPT_MAX)
    .describe("Elements to keep out of the result");
pub(crate) const SEED: FieldSpec =
    FieldSpec::seed(STABILITY_SEED_MAX).describe("Seed for reproducible results; random when unset");
pub(crate) const OUTPUT_FORMAT: FieldSpec =
    FieldSpec::choice("output_format", OutputFormat::VARIANTS, Some("png")).describe("Saved image format");
pub(crate) const IMAGE: FieldSpec = FieldSpec::image("image").describe("Input image as a file path or base64 data");
pub(crate) const STYLE_PRESET: FieldSpec =
    FieldSpec::choice("style_preset", StylePreset::VARIANTS, None).describe("Optional aesthetic preset");

/// Validated parameters for exactly one operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationParams {
    GenerateImage(NovaTextParams),
    GenerateImageWithColors(NovaColorParams),
    GenerateImageSd35(Sd35TextParams),
    TransformImageSd35(Sd35ImageParams),
    UpscaleCreative(CreativeUpscaleParams),
    UpscaleConservative(ConservativeUpscaleParams),
    UpscaleFast(FastUpscaleParams),
    InpaintImage(InpaintParams),
    OutpaintImage(OutpaintParams),
    SearchAndReplace(SearchReplaceParams),
    SearchAndRecolor(SearchRecolorParams),
    RemoveObject(RemoveObjectParams),
    RemoveBackground(RemoveBackgroundParams),
    SketchToImage(ControlParams),
    StructureControl(ControlParams),
    StyleGuide(StyleGuideParams),
    StyleTransfer(StyleTransferParams),
}

impl OperationParams {
    /// Validate caller arguments for `operation`
    ///
    /// Unknown keys are ignored; every constraint violation is reported together.
    pub fn parse(operation: Operation, args: &Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(match operation {
            Operation::GenerateImage => Self::GenerateImage(NovaTextParams::from_args(args)?),
            Operation::GenerateImageWithColors => Self::GenerateImageWithColors(NovaColorParams::from_args(args)?),
            Operation::GenerateImageSd35 => Self::GenerateImageSd35(Sd35TextParams::from_args(args)?),
            Operation::TransformImageSd35 => Self::TransformImageSd35(Sd35ImageParams::from_args(args)?),
            Operation::UpscaleCreative => Self::UpscaleCreative(CreativeUpscaleParams::from_args(args)?),
            Operation::UpscaleConservative => Self::UpscaleConservative(ConservativeUpscaleParams::from_args(args)?),
            Operation::UpscaleFast => Self::UpscaleFast(FastUpscaleParams::from_args(args)?),
            Operation::InpaintImage => Self::InpaintImage(InpaintParams::from_args(args)?),
            Operation::OutpaintImage => Self::OutpaintImage(OutpaintParams::from_args(args)?),
            Operation::SearchAndReplace => Self::SearchAndReplace(SearchReplaceParams::from_args(args)?),
            Operation::SearchAndRecolor => Self::SearchAndRecolor(SearchRecolorParams::from_args(args)?),
            Operation::RemoveObject => Self::RemoveObject(RemoveObjectParams::from_args(args)?),
            Operation::RemoveBackground => Self::RemoveBackground(RemoveBackgroundParams::from_args(args)?),
            Operation::SketchToImage => Self::SketchToImage(ControlParams::from_args(args)?),
            Operation::StructureControl => Self::StructureControl(ControlParams::from_args(args)?),
            Operation::StyleGuide => Self::StyleGuide(StyleGuideParams::from_args(args)?),
            Operation::StyleTransfer => Self::StyleTransfer(StyleTransferParams::from_args(args)?),
        })
    }

    pub const fn operation(&self) -> Operation {
        match self {
            Self::GenerateImage(_) => Operation::GenerateImage,
            Self::GenerateImageWithColors(_) => Operation::GenerateImageWithColors,
            Self::GenerateImageSd35(_) => Operation::GenerateImageSd35,
            Self::TransformImageSd35(_) => Operation::TransformImageSd35,
            Self::UpscaleCreative(_) => Operation::UpscaleCreative,
            Self::UpscaleConservative(_) => Operation::UpscaleConservative,
            Self::UpscaleFast(_) => Operation::UpscaleFast,
            Self::InpaintImage(_) => Operation::InpaintImage,
            Self::OutpaintImage(_) => Operation::OutpaintImage,
            Self::SearchAndReplace(_) => Operation::SearchAndReplace,
            Self::SearchAndRecolor(_) => Operation::SearchAndRecolor,
            Self::RemoveObject(_) => Operation::RemoveObject,
            Self::RemoveBackground(_) => Operation::RemoveBackground,
            Self::SketchToImage(_) => Operation::SketchToImage,
            Self::StructureControl(_) => Operation::StructureControl,
            Self::StyleGuide(_) => Operation::StyleGuide,
            Self::StyleTransfer(_) => Operation::StyleTransfer,
        }
    }

    /// Prompt echoed back in the response
    pub fn prompt(&self) -> Option<&str> {
        match self {
            Self::GenerateImage(p) => Some(&p.prompt),
            Self::GenerateImageWithColors(p) => Some(&p.prompt),
            Self::GenerateImageSd35(p) => Some(&p.prompt),
            Self::TransformImageSd35(p) => Some(&p.prompt),
            Self::UpscaleCreative(p) => Some(&p.prompt),
            Self::UpscaleConservative(p) => Some(&p.prompt),
            Self::InpaintImage(p) => Some(&p.prompt),
            Self::OutpaintImage(p) => Some(&p.prompt),
            Self::SearchAndReplace(p) => Some(&p.prompt),
            Self::SearchAndRecolor(p) => Some(&p.prompt),
            Self::SketchToImage(p) | Self::StructureControl(p) => Some(&p.prompt),
            Self::StyleGuide(p) => Some(&p.prompt),
            Self::StyleTransfer(p) => Some(&p.prompt),
            Self::UpscaleFast(_) | Self::RemoveObject(_) | Self::RemoveBackground(_) => None,
        }
    }

    /// Seed sent to the model, when the operation takes one
    pub const fn seed(&self) -> Option<u64> {
        match self {
            Self::GenerateImage(p) => Some(p.generation.seed),
            Self::GenerateImageWithColors(p) => Some(p.generation.seed),
            Self::GenerateImageSd35(p) => Some(p.seed),
            Self::TransformImageSd35(p) => Some(p.seed),
            Self::UpscaleCreative(p) => Some(p.seed),
            Self::UpscaleConservative(p) => Some(p.seed),
            Self::InpaintImage(p) => Some(p.seed),
            Self::OutpaintImage(p) => Some(p.seed),
            Self::SearchAndReplace(p) => Some(p.seed),
            Self::SearchAndRecolor(p) => Some(p.seed),
            Self::RemoveObject(p) => Some(p.seed),
            Self::SketchToImage(p) | Self::StructureControl(p) => Some(p.seed),
            Self::StyleGuide(p) => Some(p.seed),
            Self::StyleTransfer(p) => Some(p.seed),
            Self::UpscaleFast(_) | Self::RemoveBackground(_) => None,
        }
    }

    /// Format the artifacts are saved in
    pub const fn output_format(&self) -> OutputFormat {
        match self {
            Self::GenerateImage(_) | Self::GenerateImageWithColors(_) | Self::RemoveBackground(_) => OutputFormat::Png,
            Self::GenerateImageSd35(p) => p.output_format,
            Self::TransformImageSd35(p) => p.output_format,
            Self::UpscaleCreative(p) => p.output_format,
            Self::UpscaleConservative(p) => p.output_format,
            Self::UpscaleFast(p) => p.output_format,
            Self::InpaintImage(p) => p.output_format,
            Self::OutpaintImage(p) => p.output_format,
            Self::SearchAndReplace(p) => p.output_format,
            Self::SearchAndRecolor(p) => p.output_format,
            Self::RemoveObject(p) => p.output_format,
            Self::SketchToImage(p) | Self::StructureControl(p) => p.output_format,
            Self::StyleGuide(p) => p.output_format,
            Self::StyleTransfer(p) => p.output_format,
        }
    }
}
