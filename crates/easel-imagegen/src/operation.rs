use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::schema::{FieldSpec, control, edit, nova, sd35, upscale};

const NOVA_CANVAS: &str = "amazon.nova-canvas-v1:0";
const SD35_LARGE: &str = "stability.sd3-5-large-v1:0";

/// Every remote image operation, named as exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    GenerateImage,
    GenerateImageWithColors,
    #[strum(serialize = "generate_image_sd35")]
    GenerateImageSd35,
    #[strum(serialize = "transform_image_sd35")]
    TransformImageSd35,
    UpscaleCreative,
    UpscaleConservative,
    UpscaleFast,
    InpaintImage,
    OutpaintImage,
    SearchAndReplace,
    SearchAndRecolor,
    RemoveObject,
    RemoveBackground,
    SketchToImage,
    StructureControl,
    StyleGuide,
    StyleTransfer,
}

impl Operation {
    /// Stable tool name
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Bedrock model identifier invoked for this operation
    pub const fn model_id(self) -> &'static str {
        match self {
            Self::GenerateImage | Self::GenerateImageWithColors => NOVA_CANVAS,
            Self::GenerateImageSd35 | Self::TransformImageSd35 => SD35_LARGE,
            Self::UpscaleCreative => "us.stability.stable-creative-upscale-v1:0",
            Self::UpscaleConservative => "us.stability.stable-conservative-upscale-v1:0",
            Self::UpscaleFast => "us.stability.stable-fast-upscale-v1:0",
            Self::InpaintImage => "us.stability.stable-image-inpaint-v1:0",
            Self::OutpaintImage => "us.stability.stable-outpaint-v1:0",
            Self::SearchAndReplace => "us.stability.stable-image-search-replace-v1:0",
            Self::SearchAndRecolor => "us.stability.stable-image-search-recolor-v1:0",
            Self::RemoveObject => "us.stability.stable-image-erase-object-v1:0",
            Self::RemoveBackground => "us.stability.stable-image-remove-background-v1:0",
            Self::SketchToImage => "us.stability.stable-image-control-sketch-v1:0",
            Self::StructureControl => "us.stability.stable-image-control-structure-v1:0",
            Self::StyleGuide => "us.stability.stable-image-style-guide-v1:0",
            Self::StyleTransfer => "us.stability.stable-style-transfer-v1:0",
        }
    }

    /// Default stem for saved files
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::GenerateImage => "nova_canvas",
            Self::GenerateImageWithColors => "nova_canvas_color",
            Self::GenerateImageSd35 => "sd35",
            Self::TransformImageSd35 => "sd35_transform",
            Self::UpscaleCreative => "creative_upscale",
            Self::UpscaleConservative => "conservative_upscale",
            Self::UpscaleFast => "fast_upscale",
            Self::InpaintImage => "inpaint",
            Self::OutpaintImage => "outpaint",
            Self::SearchAndReplace => "search_replace",
            Self::SearchAndRecolor => "search_recolor",
            Self::RemoveObject => "erase_object",
            Self::RemoveBackground => "remove_bg",
            Self::SketchToImage => "sketch",
            Self::StructureControl => "structure",
            Self::StyleGuide => "style_guide",
            Self::StyleTransfer => "style_transfer",
        }
    }

    /// Declared input fields
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::GenerateImage => nova::TEXT_FIELDS,
            Self::GenerateImageWithColors => nova::COLOR_FIELDS,
            Self::GenerateImageSd35 => sd35::TEXT_FIELDS,
            Self::TransformImageSd35 => sd35::IMAGE_FIELDS,
            Self::UpscaleCreative => upscale::CREATIVE_FIELDS,
            Self::UpscaleConservative => upscale::CONSERVATIVE_FIELDS,
            Self::UpscaleFast => upscale::FAST_FIELDS,
            Self::InpaintImage => edit::INPAINT_FIELDS,
            Self::OutpaintImage => edit::OUTPAINT_FIELDS,
            Self::SearchAndReplace => edit::SEARCH_REPLACE_FIELDS,
            Self::SearchAndRecolor => edit::SEARCH_RECOLOR_FIELDS,
            Self::RemoveObject => edit::REMOVE_OBJECT_FIELDS,
            Self::RemoveBackground => edit::REMOVE_BACKGROUND_FIELDS,
            Self::SketchToImage | Self::StructureControl => control::CONTROL_FIELDS,
            Self::StyleGuide => control::STYLE_GUIDE_FIELDS,
            Self::StyleTransfer => control::STYLE_TRANSFER_FIELDS,
        }
    }

    /// Caller-facing description
    pub const fn description(self) -> &'static str {
        match self {
            Self::GenerateImage => {
                "Generate images from a text prompt with Amazon Nova Canvas. Write the prompt as an image \
                 caption; put exclusions in negative_prompt rather than using negation in the prompt."
            }
            Self::GenerateImageWithColors => {
                "Generate images with Amazon Nova Canvas guided by a palette of up to 10 hex colors."
            }
            Self::GenerateImageSd35 => {
                "Generate an image from a text prompt with Stable Diffusion 3.5 Large, framed by an aspect ratio."
            }
            Self::TransformImageSd35 => {
                "Transform an existing image with Stable Diffusion 3.5 Large. strength controls how far the \
                 result departs from the input (0 keeps it, 1 ignores it)."
            }
            Self::UpscaleCreative => {
                "Upscale a low-resolution or degraded image to 4K while adding detail. Best for inputs up to \
                 1 megapixel."
            }
            Self::UpscaleConservative => {
                "Upscale an image to 4K while preserving its original character. Accepts up to 9.4 megapixels."
            }
            Self::UpscaleFast => "Quickly upscale an image 4x without creative enhancement. Accepts up to 1 megapixel.",
            Self::InpaintImage => {
                "Replace the masked region of an image with generated content. White mask pixels are regenerated."
            }
            Self::OutpaintImage => "Extend an image beyond its borders in any direction.",
            Self::SearchAndReplace => "Find an object described by search_prompt and replace it with the prompt.",
            Self::SearchAndRecolor => "Find an object described by select_prompt and recolor it per the prompt.",
            Self::RemoveObject => "Erase the masked object and fill the area to match its surroundings.",
            Self::RemoveBackground => "Remove the background, leaving the subject on transparency. Always saves PNG.",
            Self::SketchToImage => "Render a finished image from a sketch that guides composition.",
            Self::StructureControl => "Generate an image that keeps the structure of a reference image.",
            Self::StyleGuide => "Generate an image in the style of a reference image.",
            Self::StyleTransfer => "Apply the style of style_image to the content of init_image.",
        }
    }
}
