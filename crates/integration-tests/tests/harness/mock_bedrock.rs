//! Mock Bedrock runtime server for integration tests
//!
//! Emulates `POST /model/{modelId}/invoke` closely enough for the AWS SDK:
//! raw JSON bodies on success, `x-amzn-errortype` plus a JSON message on failure.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Canned behaviour for every invocation
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with this JSON body
    Body(Value),
    /// Error status with an `x-amzn-errortype` code
    Error { status: StatusCode, code: String, message: String },
}

impl Reply {
    pub fn error(status: StatusCode, code: &str, message: &str) -> Self {
        Self::Error {
            status,
            code: code.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// Mock Bedrock endpoint bound to an ephemeral port
pub struct MockBedrock {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    reply: Reply,
    request_count: AtomicU32,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// One invocation as the server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model_id: String,
    pub content_type: Option<String>,
    pub body: Value,
}

impl MockBedrock {
    /// Start the mock server, returning immediately
    pub async fn start(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            request_count: AtomicU32::new(0),
            requests: Mutex::default(),
        });

        let app = Router::new()
            .route("/model/{model_id}/invoke", routing::post(handle_invoke))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for `bedrock.endpoint_url`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of invocations received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Every invocation received, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockBedrock {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_invoke(
    State(state): State<Arc<MockState>>,
    Path(model_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    state.requests.lock().unwrap().push(RecordedRequest {
        model_id,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match &state.reply {
        Reply::Body(value) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            value.to_string(),
        )
            .into_response(),
        Reply::Error { status, code, message } => (
            *status,
            [
                (header::CONTENT_TYPE.as_str(), "application/json"),
                ("x-amzn-errortype", code.as_str()),
            ],
            json!({ "message": message }).to_string(),
        )
            .into_response(),
    }
}
