//! In-process model transport that replays scripted responses

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use easel_imagegen::{ModelTransport, TransportError};
use serde_json::{Value, json};

use super::fixtures;

/// Transport double that counts calls and records request bodies
///
/// Replies are consumed in order; the last one repeats once the script runs out.
pub struct MockTransport {
    script: Mutex<VecDeque<Result<Value, TransportError>>>,
    last: Mutex<Option<Result<Value, TransportError>>>,
    calls: AtomicU32,
    requests: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    /// Reply with the given responses in order
    pub fn scripted(replies: Vec<Result<Value, TransportError>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: AtomicU32::new(0),
            requests: Mutex::default(),
        }
    }

    /// Always answer with `count` small PNGs
    pub fn images(count: usize) -> Self {
        Self::scripted(vec![Ok(Self::generation(count, &[]))])
    }

    /// Always fail with a service error code
    pub fn failing(code: &str, message: &str) -> Self {
        Self::scripted(vec![Err(TransportError::Service {
            code: code.to_owned(),
            message: message.to_owned(),
        })])
    }

    /// Model response body carrying `count` images and optional finish reasons
    pub fn generation(count: usize, finish_reasons: &[Option<&str>]) -> Value {
        let image = fixtures::png_b64(16, 16);
        let mut body = json!({ "images": vec![image; count] });
        if !finish_reasons.is_empty() {
            body["finish_reasons"] = json!(finish_reasons);
        }
        body
    }

    /// Number of invocations received
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Model ids and bodies of every invocation, oldest first
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    /// Body of the most recent invocation
    pub fn last_body(&self) -> Value {
        self.requests().pop().map(|(_, body)| body).expect("at least one invocation")
    }
}

#[async_trait]
impl ModelTransport for MockTransport {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let parsed: Value = serde_json::from_slice(&body).expect("request body is JSON");
        self.requests.lock().unwrap().push((model_id.to_owned(), parsed));

        let reply = {
            let mut script = self.script.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(next) = script.pop_front() {
                *last = Some(next);
            }
            last.clone().expect("script has at least one reply")
        };

        reply.map(|value| serde_json::to_vec(&value).unwrap())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
