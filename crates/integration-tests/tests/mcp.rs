//! Tool dispatch through the MCP server handler

mod harness;

use std::sync::Arc;

use easel_imagegen::ImageService;
use easel_mcp::EaselServer;
use harness::config::ConfigBuilder;
use harness::fixtures;
use harness::mock_transport::MockTransport;
use rmcp::model::RawContent;
use serde_json::{Value, json};

fn server(workspace: &std::path::Path, transport: &Arc<MockTransport>) -> EaselServer {
    let config = ConfigBuilder::new(workspace).build();
    EaselServer::new(ImageService::new(config.output, Arc::clone(transport) as _))
}

fn payload(result: &rmcp::model::CallToolResult) -> Value {
    match &result.content[0].raw {
        RawContent::Text(text) => serde_json::from_str(&text.text).unwrap(),
        other => panic!("expected text content, got {other:?}"),
    }
}

fn object(value: Value) -> Option<serde_json::Map<String, Value>> {
    value.as_object().cloned()
}

#[tokio::test]
async fn catalogue_lists_every_tool() {
    let names: Vec<String> = easel_mcp::tools::catalogue().into_iter().map(|t| t.name.into_owned()).collect();

    assert_eq!(names.len(), 20);
    for name in ["generate_image", "upscale_fast", "style_transfer", "create_full_mask"] {
        assert!(names.iter().any(|n| n == name), "{name}");
    }
}

#[tokio::test]
async fn successful_call_returns_response_json() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let server = server(dir.path(), &transport);

    let result = server
        .dispatch(
            "upscale_fast",
            object(json!({ "image": fixtures::png_b64(64, 64), "output_format": "webp" })),
        )
        .await
        .unwrap();

    assert_ne!(result.is_error, Some(true));
    let body = payload(&result);
    assert_eq!(body["status"], "success");
    assert_eq!(body["metadata"]["input_dimensions"], "64x64");
    assert!(body["paths"][0].as_str().unwrap().ends_with(".webp"));
}

#[tokio::test]
async fn failures_are_tool_errors_not_protocol_errors() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let server = server(dir.path(), &transport);

    let result = server
        .dispatch("generate_image", object(json!({ "prompt": "" })))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let body = payload(&result);
    assert_eq!(body["status"], "error");
    assert_eq!(body["metadata"]["error_kind"], "validation_error");
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn mask_tool_writes_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::images(1));
    let server = server(dir.path(), &transport);

    let result = server
        .dispatch(
            "create_rectangular_mask",
            object(json!({
                "width": 128, "height": 64, "x": 8, "y": 8, "mask_width": 32, "mask_height": 16,
                "filename": "door",
            })),
        )
        .await
        .unwrap();

    let body = payload(&result);
    assert_eq!(body["status"], "success", "{body}");
    let path = body["paths"][0].as_str().unwrap();
    let name = std::path::Path::new(path).file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("door_") && name.ends_with(".png"), "{name}");
    assert!(std::path::Path::new(path).is_file());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn unknown_tool_is_invalid_params() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path(), &Arc::new(MockTransport::images(1)));

    let err = server.dispatch("paint_fence", None).await.unwrap_err();

    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
}
