//! End-to-end tests through the image service with an in-process transport

mod harness;

use std::sync::Arc;

use easel_imagegen::{ImageService, Operation, OutputTarget, Status, TransportError};
use harness::config::ConfigBuilder;
use harness::fixtures;
use harness::mock_transport::MockTransport;
use serde_json::{Map, Value, json};

/// Largest seed Nova Canvas accepts
const NOVA_SEED_MAX: u64 = 858_993_459;

fn service(workspace: &std::path::Path, transport: &Arc<MockTransport>) -> ImageService {
    let config = ConfigBuilder::new(workspace).build();
    ImageService::new(config.output, Arc::clone(transport) as _)
}

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// -- Scenario 1: plain text-to-image --

#[tokio::test]
async fn text_to_image_saves_one_artifact_with_random_seed() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let service = service(dir.path(), &transport);

    let prompt = "a lighthouse on a basalt cliff at dusk, oil paint";
    assert_eq!(prompt.len(), 50);

    let response = service
        .call(Operation::GenerateImage, &args(json!({ "prompt": prompt })), &OutputTarget::default())
        .await;

    assert_eq!(response.status, Status::Success, "{}", response.message);
    assert_eq!(response.paths.len(), 1);
    assert!(std::path::Path::new(&response.paths[0]).is_file());
    let seed = response.seed.expect("seed is reported");
    assert!(seed <= NOVA_SEED_MAX);

    let body = transport.last_body();
    assert_eq!(body["taskType"], "TEXT_IMAGE");
    assert_eq!(body["imageGenerationConfig"]["seed"], seed);
}

// -- Scenario 2: mask size mismatch never reaches the model --

#[tokio::test]
async fn inpaint_with_mismatched_mask_fails_before_invoking() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let service = service(dir.path(), &transport);

    let response = service
        .call(
            Operation::InpaintImage,
            &args(json!({
                "image": fixtures::png_b64(256, 256),
                "mask": fixtures::mask_b64(128, 128),
                "prompt": "a red door",
            })),
            &OutputTarget::default(),
        )
        .await;

    assert_eq!(response.status, Status::Error);
    assert!(response.message.contains("do not match"), "{}", response.message);
    assert_eq!(response.error_kind(), Some("mask_mismatch"));
    assert_eq!(transport.calls(), 0);
    assert!(fixtures::saved_files(&dir.path().join("output")).is_empty());
}

#[tokio::test]
async fn inpaint_from_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let service = service(dir.path(), &transport);
    let image = fixtures::write_png(dir.path(), "room.png", 128, 96);

    let response = service
        .call(
            Operation::InpaintImage,
            &args(json!({
                "image": image.display().to_string(),
                "mask": { "shape": "rectangle", "x": 10, "y": 10, "width": 40, "height": 30 },
                "prompt": "a window",
            })),
            &OutputTarget::default(),
        )
        .await;

    assert!(response.is_success(), "{}", response.message);
    assert_eq!(response.metadata["mask_generated"], true);
    let body = transport.last_body();
    assert!(body["mask"].is_string());
    assert_eq!(body["grow_mask"], 5);
}

// -- Scenario 3: one of two images filtered --

#[tokio::test]
async fn partially_filtered_batch_saves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::scripted(vec![Ok(MockTransport::generation(
        2,
        &[None, Some("Filter reason: output image")],
    ))]));
    let service = service(dir.path(), &transport);

    let response = service
        .call(
            Operation::GenerateImage,
            &args(json!({ "prompt": "two foxes", "number_of_images": 2 })),
            &OutputTarget::default(),
        )
        .await;

    assert_eq!(response.status, Status::Error);
    assert_eq!(response.error_kind(), Some("content_filtered"));
    assert!(response.message.contains("Content filtered"), "{}", response.message);
    assert!(response.paths.is_empty());
    assert!(!response.is_retryable());
    assert_eq!(transport.calls(), 1);
    assert!(fixtures::saved_files(&dir.path().join("output")).is_empty());
}

// -- Scenario 4: throttling surfaces as retryable --

#[tokio::test]
async fn throttling_is_reported_as_retryable() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::failing("ThrottlingException", "Too many requests"));
    let service = service(dir.path(), &transport);

    let response = service
        .call(Operation::GenerateImageSd35, &args(json!({ "prompt": "a tide pool" })), &OutputTarget::default())
        .await;

    assert_eq!(response.status, Status::Error);
    assert_eq!(response.error_kind(), Some("rate_limited"));
    assert!(response.is_retryable());
    assert_eq!(response.metadata["retryable"], true);
    assert_eq!(response.model_id, "stability.sd3-5-large-v1:0");
}

#[tokio::test]
async fn invalid_parameters_are_not_retryable() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::failing("ValidationException", "width must be a multiple of 16"));
    let service = service(dir.path(), &transport);

    let response = service
        .call(Operation::GenerateImage, &args(json!({ "prompt": "a kite" })), &OutputTarget::default())
        .await;

    assert_eq!(response.error_kind(), Some("invalid_parameters"));
    assert!(response.message.contains("width must be a multiple of 16"));
    assert!(!response.is_retryable());
}

#[tokio::test]
async fn transient_failure_then_success_across_calls() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::scripted(vec![
        Err(TransportError::NoResponse("connection reset".to_owned())),
        Ok(MockTransport::generation(1, &[])),
    ]));
    let service = service(dir.path(), &transport);
    let input = args(json!({ "prompt": "a quiet harbour", "seed": 7 }));

    let first = service.call(Operation::GenerateImage, &input, &OutputTarget::default()).await;
    assert!(first.is_retryable());
    assert_eq!(first.error_kind(), Some("service_unavailable"));

    let second = service.call(Operation::GenerateImage, &input, &OutputTarget::default()).await;
    assert!(second.is_success(), "{}", second.message);
    assert_eq!(second.seed, Some(7));
    assert_eq!(transport.calls(), 2);
}

// -- Aliases --

#[tokio::test]
async fn control_image_alias_is_emitted_as_image() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let service = service(dir.path(), &transport);
    let sketch = fixtures::png_b64(128, 128);

    for key in ["control_image", "image"] {
        let response = service
            .call(
                Operation::SketchToImage,
                &args(json!({ key: sketch, "prompt": "a castle" })),
                &OutputTarget::default(),
            )
            .await;
        assert!(response.is_success(), "{key}: {}", response.message);

        let body = transport.last_body();
        assert_eq!(body["image"], sketch);
        assert!(body.get("control_image").is_none());
        assert_eq!(body["control_strength"], 0.7);
    }
}

#[tokio::test]
async fn style_guide_accepts_reference_image_or_image() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let service = service(dir.path(), &transport);
    let reference = fixtures::png_b64(96, 96);

    let response = service
        .call(
            Operation::StyleGuide,
            &args(json!({ "image": reference, "prompt": "a tram in the rain" })),
            &OutputTarget::default(),
        )
        .await;

    assert!(response.is_success(), "{}", response.message);
    assert_eq!(transport.last_body()["image"], reference);
}

#[tokio::test]
async fn missing_aliased_input_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let service = service(dir.path(), &transport);

    let response = service
        .call(Operation::StructureControl, &args(json!({ "prompt": "a bridge" })), &OutputTarget::default())
        .await;

    assert_eq!(response.error_kind(), Some("validation_error"));
    assert!(response.message.contains("control_image"), "{}", response.message);
    assert_eq!(transport.calls(), 0);
}

// -- Background removal --

#[tokio::test]
async fn background_removal_always_saves_png() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let service = service(dir.path(), &transport);

    let response = service
        .call(
            Operation::RemoveBackground,
            &args(json!({ "image": fixtures::png_b64(128, 128), "output_format": "jpeg" })),
            &OutputTarget::default(),
        )
        .await;

    assert!(response.is_success(), "{}", response.message);
    assert!(response.paths[0].ends_with(".png"), "{}", response.paths[0]);
    assert_eq!(transport.last_body()["output_format"], "png");
    assert_eq!(transport.requests()[0].0, "us.stability.stable-image-remove-background-v1:0");
}

// -- Output target --

#[tokio::test]
async fn per_call_workspace_and_filename_are_honoured() {
    let configured = tempfile::tempdir().unwrap();
    let per_call = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(2));
    let service = service(configured.path(), &transport);

    let target = OutputTarget::from_args(&args(json!({
        "workspace_dir": per_call.path().display().to_string(),
        "filename": "poster",
    })));
    let response = service
        .call(
            Operation::GenerateImage,
            &args(json!({ "prompt": "a poster", "number_of_images": 2 })),
            &target,
        )
        .await;

    assert!(response.is_success(), "{}", response.message);
    let saved = fixtures::saved_files(&per_call.path().join("output"));
    assert_eq!(saved.len(), 2);
    for path in &response.paths {
        let name = std::path::Path::new(path).file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("poster_"), "{name}");
    }
    assert!(fixtures::saved_files(&configured.path().join("output")).is_empty());
}
