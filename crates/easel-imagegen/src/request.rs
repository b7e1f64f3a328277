//! Mapping from validated parameters to provider wire bodies
//!
//! Nothing here validates or touches the network. Image inputs arrive
//! already resolved and base64-encoded in [`WireImages`].

use serde_json::{Map, Value, json};

use crate::schema::{NovaGeneration, OperationParams};
use crate::types::OutputFormat;

/// Base64 image payloads resolved from an operation's inputs
#[derive(Debug, Clone, Default)]
pub struct WireImages {
    /// The main input: `image`, `control_image`, `reference_image` or `init_image`
    pub image: Option<String>,
    pub mask: Option<String>,
    pub style_image: Option<String>,
}

/// Flat JSON object that drops unset optionals
#[derive(Debug, Default)]
struct WireBody(Map<String, Value>);

impl WireBody {
    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    fn set_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    fn format(self, format: OutputFormat) -> Self {
        self.set("output_format", format.as_ref())
    }

    fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Build the request body for one operation
pub fn build(params: &OperationParams, images: &WireImages) -> Value {
    let image = images.image.clone();

    match params {
        OperationParams::GenerateImage(p) => {
            let text = WireBody::default()
                .set("text", p.prompt.as_str())
                .set_opt("negativeText", p.negative_prompt.as_deref());
            json!({
                "taskType": "TEXT_IMAGE",
                "textToImageParams": text.into_value(),
                "imageGenerationConfig": generation_config(&p.generation),
            })
        }
        OperationParams::GenerateImageWithColors(p) => {
            let guided = WireBody::default()
                .set("colors", p.colors.clone())
                .set("text", p.prompt.as_str())
                .set_opt("negativeText", p.negative_prompt.as_deref());
            json!({
                "taskType": "COLOR_GUIDED_GENERATION",
                "colorGuidedGenerationParams": guided.into_value(),
                "imageGenerationConfig": generation_config(&p.generation),
            })
        }
        OperationParams::GenerateImageSd35(p) => WireBody::default()
            .set("prompt", p.prompt.as_str())
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .set("mode", "text-to-image")
            .set("aspect_ratio", p.aspect_ratio.as_ref())
            .into_value(),
        OperationParams::TransformImageSd35(p) => WireBody::default()
            .set("prompt", p.prompt.as_str())
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .set("mode", "image-to-image")
            .set_opt("image", image)
            .set("strength", p.strength)
            .into_value(),
        OperationParams::UpscaleCreative(p) => WireBody::default()
            .set_opt("image", image)
            .set("prompt", p.prompt.as_str())
            .set("creativity", p.creativity)
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .set_opt("style_preset", p.style_preset.map(|s| s.as_ref().to_owned()))
            .into_value(),
        OperationParams::UpscaleConservative(p) => WireBody::default()
            .set_opt("image", image)
            .set("prompt", p.prompt.as_str())
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .into_value(),
        OperationParams::UpscaleFast(p) => WireBody::default()
            .set_opt("image", image)
            .format(p.output_format)
            .into_value(),
        OperationParams::InpaintImage(p) => WireBody::default()
            .set_opt("image", image)
            .set_opt("mask", images.mask.clone())
            .set("prompt", p.prompt.as_str())
            .set("grow_mask", p.grow_mask)
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .into_value(),
        OperationParams::OutpaintImage(p) => WireBody::default()
            .set_opt("image", image)
            .set("prompt", p.prompt.as_str())
            .set("left", p.expansion.left)
            .set("right", p.expansion.right)
            .set("up", p.expansion.up)
            .set("down", p.expansion.down)
            .set("creativity", p.creativity)
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .into_value(),
        OperationParams::SearchAndReplace(p) => WireBody::default()
            .set_opt("image", image)
            .set("search_prompt", p.search_prompt.as_str())
            .set("prompt", p.prompt.as_str())
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .into_value(),
        OperationParams::SearchAndRecolor(p) => WireBody::default()
            .set_opt("image", image)
            .set("select_prompt", p.select_prompt.as_str())
            .set("prompt", p.prompt.as_str())
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .into_value(),
        OperationParams::RemoveObject(p) => WireBody::default()
            .set_opt("image", image)
            .set_opt("mask", images.mask.clone())
            .set("grow_mask", p.grow_mask)
            .set("seed", p.seed)
            .format(p.output_format)
            .into_value(),
        OperationParams::RemoveBackground(_) => WireBody::default()
            .set_opt("image", image)
            .format(OutputFormat::Png)
            .into_value(),
        OperationParams::SketchToImage(p) | OperationParams::StructureControl(p) => WireBody::default()
            .set_opt("image", image)
            .set("prompt", p.prompt.as_str())
            .set("control_strength", p.control_strength)
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .into_value(),
        OperationParams::StyleGuide(p) => WireBody::default()
            .set_opt("image", image)
            .set("prompt", p.prompt.as_str())
            .set("fidelity", p.fidelity)
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .into_value(),
        OperationParams::StyleTransfer(p) => WireBody::default()
            .set_opt("init_image", image)
            .set_opt("style_image", images.style_image.clone())
            .set("prompt", p.prompt.as_str())
            .set("composition_fidelity", p.composition_fidelity)
            .set("style_strength", p.style_strength)
            .set("change_strength", p.change_strength)
            .set("seed", p.seed)
            .format(p.output_format)
            .set_opt("negative_prompt", p.negative_prompt.as_deref())
            .into_value(),
    }
}

fn generation_config(generation: &NovaGeneration) -> Value {
    json!({
        "width": generation.width,
        "height": generation.height,
        "quality": generation.quality.as_ref(),
        "cfgScale": generation.cfg_scale,
        "seed": generation.seed,
        "numberOfImages": generation.number_of_images,
    })
}
