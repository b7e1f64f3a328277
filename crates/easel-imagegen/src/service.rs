//! Operation orchestration
//!
//! Every operation runs the same sequence: resolve and check image inputs,
//! build the wire body, invoke the model once, save what came back. Expected
//! failures become error responses; nothing past this point returns `Err`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use easel_config::{Config, OutputConfig};
use easel_imaging::{Dimensions, MaskShape};
use easel_telemetry::OperationMetrics;
use serde_json::{Map, Value, json};

use crate::error::ImageGenError;
use crate::invoker::RemoteInvoker;
use crate::mask_tool::MaskTool;
use crate::operation::Operation;
use crate::schema::OperationParams;
use crate::transport::{BedrockTransport, ModelTransport};
use crate::types::{OperationResponse, OutputFormat, Status};
use crate::{precondition, request, store};

/// Model id reported by tools that never call a model
const LOCAL_MODEL_ID: &str = "local";

/// Per-call overrides for where artifacts land
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTarget {
    /// Replaces the configured workspace root
    pub workspace_dir: Option<String>,
    /// Replaces the operation's file stem prefix
    pub filename: Option<String>,
}

impl OutputTarget {
    /// Pull the target fields out of tool arguments
    pub fn from_args(args: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            args.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        Self {
            workspace_dir: text("workspace_dir"),
            filename: text("filename"),
        }
    }
}

/// Runs image operations against a model transport
#[derive(Clone)]
pub struct ImageService {
    invoker: RemoteInvoker,
    output: OutputConfig,
    metrics: OperationMetrics,
}

impl ImageService {
    pub fn new(output: OutputConfig, transport: Arc<dyn ModelTransport>) -> Self {
        Self {
            invoker: RemoteInvoker::new(transport),
            output,
            metrics: OperationMetrics::new(),
        }
    }

    /// Service backed by Bedrock, configured from `config`
    pub async fn from_config(config: &Config) -> Self {
        let transport = BedrockTransport::new(&config.bedrock).await;
        Self::new(config.output.clone(), Arc::new(transport))
    }

    /// Validate raw arguments and run the operation
    pub async fn call(&self, operation: Operation, args: &Map<String, Value>, target: &OutputTarget) -> OperationResponse {
        match OperationParams::parse(operation, args) {
            Ok(params) => self.execute(&params, target).await,
            Err(e) => {
                tracing::debug!(operation = %operation, error = %e, "parameter validation failed");
                self.metrics.record(operation.name(), Instant::now(), Some("validation_error"));
                failure(operation.model_id(), None, None, &ImageGenError::Validation(e))
            }
        }
    }

    /// Run an operation with validated parameters
    #[tracing::instrument(name = "image_operation", skip_all, fields(operation = %params.operation()))]
    pub async fn execute(&self, params: &OperationParams, target: &OutputTarget) -> OperationResponse {
        let start = Instant::now();
        let operation = params.operation();
        let prompt = params.prompt().map(str::to_owned);

        let (response, error_kind) = match self.run(params, target).await {
            Ok((paths, metadata)) => (
                OperationResponse {
                    status: Status::Success,
                    message: format!("Generated {} image(s) with {operation}", paths.len()),
                    paths: display_paths(&paths),
                    model_id: operation.model_id().to_owned(),
                    prompt,
                    seed: params.seed(),
                    metadata,
                },
                None,
            ),
            Err(e) => (failure(operation.model_id(), prompt, params.seed(), &e), Some(e.kind())),
        };

        self.metrics.record(operation.name(), start, error_kind);
        response
    }

    async fn run(
        &self,
        params: &OperationParams,
        target: &OutputTarget,
    ) -> Result<(Vec<PathBuf>, Map<String, Value>), ImageGenError> {
        let operation = params.operation();

        let prepared = precondition::prepare(params)?;
        let dir = self
            .output
            .resolve(target.workspace_dir.as_deref())
            .map_err(ImageGenError::Storage)?;

        let body = request::build(params, &prepared.images);
        tracing::debug!(model_id = operation.model_id(), "request built");

        let generation = self.invoker.invoke(operation.model_id(), &body).await.into_result()?;

        let prefix = target.filename.as_deref().unwrap_or(operation.file_prefix());
        let paths = store::save(&generation.images, &dir, prefix, params.output_format()).await?;

        let mut metadata = echo_parameters(params);
        metadata.extend(prepared.metadata);
        metadata.insert("finish_reasons".to_owned(), json!(generation.finish_reasons));
        Ok((paths, metadata))
    }

    /// Validate raw arguments and write a synthesized mask
    pub async fn call_mask_tool(&self, tool: MaskTool, args: &Map<String, Value>, target: &OutputTarget) -> OperationResponse {
        match tool.parse(args) {
            Ok((shape, canvas)) => self.create_mask(tool, shape, canvas, target).await,
            Err(e) => {
                self.metrics.record(tool.name(), Instant::now(), Some("validation_error"));
                failure(LOCAL_MODEL_ID, None, None, &ImageGenError::Validation(e))
            }
        }
    }

    /// Render a mask and save it as a single-channel PNG
    async fn create_mask(&self, tool: MaskTool, shape: MaskShape, canvas: Dimensions, target: &OutputTarget) -> OperationResponse {
        let start = Instant::now();

        let result: Result<Vec<PathBuf>, ImageGenError> = async {
            let bytes = shape.render(canvas)?;
            let dir = self
                .output
                .resolve(target.workspace_dir.as_deref())
                .map_err(ImageGenError::Storage)?;
            let prefix = target.filename.as_deref().unwrap_or("mask");
            store::save(&[bytes], &dir, prefix, OutputFormat::Png).await
        }
        .await;

        let (response, error_kind) = match result {
            Ok(paths) => (
                OperationResponse {
                    status: Status::Success,
                    message: format!("Created {canvas} mask"),
                    paths: display_paths(&paths),
                    model_id: LOCAL_MODEL_ID.to_owned(),
                    prompt: None,
                    seed: None,
                    metadata: shape_metadata(shape, canvas),
                },
                None,
            ),
            Err(e) => (failure(LOCAL_MODEL_ID, None, None, &e), Some(e.kind())),
        };

        self.metrics.record(tool.name(), start, error_kind);
        response
    }
}

fn failure(model_id: &str, prompt: Option<String>, seed: Option<u64>, error: &ImageGenError) -> OperationResponse {
    let mut metadata = Map::new();
    metadata.insert("error_kind".to_owned(), json!(error.kind()));
    metadata.insert("retryable".to_owned(), json!(error.is_retryable()));
    if let ImageGenError::Validation(validation) = error {
        let violations: Vec<Value> = validation
            .violations
            .iter()
            .map(|v| json!({ "field": v.field, "constraint": v.constraint, "value": v.value }))
            .collect();
        metadata.insert("violations".to_owned(), Value::Array(violations));
    }

    OperationResponse {
        status: Status::Error,
        message: error.to_string(),
        paths: Vec::new(),
        model_id: model_id.to_owned(),
        prompt,
        seed,
        metadata,
    }
}

fn display_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

/// Tuning parameters reported back on success
fn echo_parameters(params: &OperationParams) -> Map<String, Value> {
    let value = match params {
        OperationParams::GenerateImage(p) => json!({
            "width": p.generation.width,
            "height": p.generation.height,
            "quality": p.generation.quality.as_ref(),
            "cfg_scale": p.generation.cfg_scale,
            "number_of_images": p.generation.number_of_images,
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::GenerateImageWithColors(p) => json!({
            "colors": p.colors,
            "width": p.generation.width,
            "height": p.generation.height,
            "quality": p.generation.quality.as_ref(),
            "cfg_scale": p.generation.cfg_scale,
            "number_of_images": p.generation.number_of_images,
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::GenerateImageSd35(p) => json!({
            "mode": "text-to-image",
            "aspect_ratio": p.aspect_ratio.as_ref(),
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::TransformImageSd35(p) => json!({
            "mode": "image-to-image",
            "strength": p.strength,
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::UpscaleCreative(p) => json!({
            "creativity": p.creativity,
            "style_preset": p.style_preset.map(|s| s.as_ref().to_owned()),
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::UpscaleConservative(p) => json!({
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::UpscaleFast(p) => json!({
            "upscale_factor": "4x",
            "output_format": p.output_format.as_ref(),
        }),
        OperationParams::InpaintImage(p) => json!({
            "grow_mask": p.grow_mask,
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::OutpaintImage(p) => json!({
            "left": p.expansion.left,
            "right": p.expansion.right,
            "up": p.expansion.up,
            "down": p.expansion.down,
            "creativity": p.creativity,
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::SearchAndReplace(p) => json!({
            "search_prompt": p.search_prompt,
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::SearchAndRecolor(p) => json!({
            "select_prompt": p.select_prompt,
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::RemoveObject(p) => json!({
            "grow_mask": p.grow_mask,
            "output_format": p.output_format.as_ref(),
        }),
        OperationParams::RemoveBackground(p) => json!({
            "output_format": "png",
            "requested_format": p.requested_format.as_ref(),
        }),
        OperationParams::SketchToImage(p) | OperationParams::StructureControl(p) => json!({
            "control_strength": p.control_strength,
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::StyleGuide(p) => json!({
            "fidelity": p.fidelity,
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
        OperationParams::StyleTransfer(p) => json!({
            "composition_fidelity": p.composition_fidelity,
            "style_strength": p.style_strength,
            "change_strength": p.change_strength,
            "output_format": p.output_format.as_ref(),
            "negative_prompt": p.negative_prompt,
        }),
    };

    match value {
        Value::Object(map) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => Map::new(),
    }
}

fn shape_metadata(shape: MaskShape, canvas: Dimensions) -> Map<String, Value> {
    let value = match shape {
        MaskShape::Rectangle {
            x,
            y,
            width,
            height,
            feather,
        } => json!({ "shape": "rectangle", "x": x, "y": y, "mask_width": width, "mask_height": height, "feather": feather }),
        MaskShape::Ellipse {
            center_x,
            center_y,
            radius_x,
            radius_y,
            feather,
        } => json!({
            "shape": "ellipse",
            "center_x": center_x,
            "center_y": center_y,
            "radius_x": radius_x,
            "radius_y": radius_y,
            "feather": feather,
        }),
        MaskShape::Full => json!({ "shape": "full" }),
    };

    let mut metadata = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    metadata.insert("dimensions".to_owned(), json!(canvas.to_string()));
    metadata
}
