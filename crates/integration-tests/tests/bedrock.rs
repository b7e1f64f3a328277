//! The real Bedrock SDK transport against a local mock endpoint

mod harness;

use axum::http::StatusCode;
use easel_imagegen::{BedrockTransport, ImageService, ModelTransport, Operation, OutputTarget, TransportError};
use harness::config::ConfigBuilder;
use harness::fixtures;
use harness::mock_bedrock::{MockBedrock, Reply};
use harness::mock_transport::MockTransport;
use serde_json::{Map, Value, json};

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[tokio::test]
async fn invoke_round_trips_raw_json() {
    let mock = MockBedrock::start(Reply::Body(json!({ "images": ["aGVsbG8="] }))).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path()).with_endpoint(&mock.base_url()).build();
    let transport = BedrockTransport::new(&config.bedrock).await;

    let reply = transport
        .invoke("amazon.nova-canvas-v1:0", br#"{"taskType":"TEXT_IMAGE"}"#.to_vec())
        .await
        .unwrap();

    let reply: Value = serde_json::from_slice(&reply).unwrap();
    assert_eq!(reply["images"][0], "aGVsbG8=");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model_id, "amazon.nova-canvas-v1:0");
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(requests[0].body["taskType"], "TEXT_IMAGE");
}

#[tokio::test]
async fn service_errors_carry_their_code() {
    let mock = MockBedrock::start(Reply::error(
        StatusCode::BAD_REQUEST,
        "ValidationException",
        "height must be between 320 and 4096",
    ))
    .await
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path()).with_endpoint(&mock.base_url()).build();
    let transport = BedrockTransport::new(&config.bedrock).await;

    let err = transport.invoke("amazon.nova-canvas-v1:0", b"{}".to_vec()).await.unwrap_err();

    assert_eq!(
        err,
        TransportError::Service {
            code: "ValidationException".to_owned(),
            message: "height must be between 320 and 4096".to_owned(),
        }
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_no_response() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path()).with_endpoint(&format!("http://{addr}")).build();
    let transport = BedrockTransport::new(&config.bedrock).await;

    let err = transport.invoke("amazon.nova-canvas-v1:0", b"{}".to_vec()).await.unwrap_err();

    assert!(matches!(err, TransportError::NoResponse(_)), "{err:?}");
}

#[tokio::test]
async fn generation_through_the_sdk_saves_images() {
    let generation = MockTransport::generation(1, &[]);
    let mock = MockBedrock::start(Reply::Body(generation)).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path()).with_endpoint(&mock.base_url()).build();
    let service = ImageService::from_config(&config).await;

    let response = service
        .call(
            Operation::GenerateImageSd35,
            &args(json!({ "prompt": "a glass greenhouse", "seed": 11 })),
            &OutputTarget::default(),
        )
        .await;

    assert!(response.is_success(), "{}", response.message);
    assert_eq!(fixtures::saved_files(&dir.path().join("output")).len(), 1);

    let request = &mock.requests()[0];
    assert_eq!(request.model_id, "stability.sd3-5-large-v1:0");
    assert_eq!(request.body["mode"], "text-to-image");
    assert_eq!(request.body["seed"], 11);
}

#[tokio::test]
async fn remote_errors_are_classified() {
    let cases = [
        (StatusCode::BAD_REQUEST, "ValidationException", "invalid_parameters", false),
        (StatusCode::FORBIDDEN, "AccessDeniedException", "access_denied", false),
        (StatusCode::TOO_MANY_REQUESTS, "ThrottlingException", "rate_limited", true),
        (StatusCode::TOO_MANY_REQUESTS, "ModelNotReadyException", "temporarily_not_ready", true),
        (StatusCode::SERVICE_UNAVAILABLE, "ServiceUnavailableException", "service_unavailable", true),
        (StatusCode::INTERNAL_SERVER_ERROR, "InternalServerException", "internal_remote_error", true),
        (StatusCode::BAD_REQUEST, "ModelErrorException", "unclassified", false),
    ];

    for (status, code, kind, retryable) in cases {
        let mock = MockBedrock::start(Reply::error(status, code, "scripted failure")).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new(dir.path()).with_endpoint(&mock.base_url()).build();
        let service = ImageService::from_config(&config).await;

        let response = service
            .call(Operation::GenerateImage, &args(json!({ "prompt": "a compass" })), &OutputTarget::default())
            .await;

        assert_eq!(response.error_kind(), Some(kind), "{code}: {}", response.message);
        assert_eq!(response.is_retryable(), retryable, "{code}");
        assert!(response.paths.is_empty());
        assert_eq!(mock.request_count(), 1, "{code}");
    }
}

#[tokio::test]
async fn throttling_is_retried_up_to_the_configured_attempts() {
    let mock = MockBedrock::start(Reply::error(StatusCode::TOO_MANY_REQUESTS, "ThrottlingException", "slow down"))
        .await
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path())
        .with_endpoint(&mock.base_url())
        .with_max_retries(1)
        .build();
    let service = ImageService::from_config(&config).await;

    let response = service
        .call(Operation::GenerateImage, &args(json!({ "prompt": "a compass" })), &OutputTarget::default())
        .await;

    assert_eq!(response.error_kind(), Some("rate_limited"));
    assert!(response.is_retryable());
    assert_eq!(mock.request_count(), 2);
}
