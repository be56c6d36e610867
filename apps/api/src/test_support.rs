//! Fixtures shared by handler tests: a scripted gateway, test state and request builders.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};

use crate::analysis::models::AnalysisSchema;
use crate::config::Config;
use crate::llm_client::{AiGateway, Document, LlmError};
use crate::rate_limit::InMemoryRateLimiter;
use crate::state::AppState;

const BOUNDARY: &str = "X-ATS-RADAR-TEST-BOUNDARY";

/// Gateway that returns a canned reply (or fails) and records how it was called.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    reply: Option<String>,
    calls: Arc<AtomicUsize>,
    saw_document: Arc<AtomicBool>,
    last_prompt: Arc<Mutex<String>>,
}

impl ScriptedGateway {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn saw_document(&self) -> bool {
        self.saw_document.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> String {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiGateway for ScriptedGateway {
    async fn complete(
        &self,
        prompt: &str,
        document: Option<&Document>,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.saw_document
            .store(document.is_some(), Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = prompt.to_string();

        self.reply.clone().ok_or(LlmError::Api {
            status: 429,
            message: "quota exceeded for project 1234".to_string(),
        })
    }
}

pub fn test_config() -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        gemini_api_base: "http://127.0.0.1:9".to_string(),
        redis_url: None,
        redis_token: None,
        analysis_schema: AnalysisSchema::V2,
        max_upload_bytes: 1024 * 1024,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(gateway: ScriptedGateway) -> AppState {
    AppState {
        llm: Arc::new(gateway),
        rate_limiter: Arc::new(InMemoryRateLimiter::new()),
        config: test_config(),
    }
}

/// Builds a multipart POST. Each field is (name, optional filename, bytes).
pub fn multipart_request(
    uri: &str,
    fields: &[(&str, Option<&str>, &[u8])],
    client_ip: &str,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, data) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("x-forwarded-for", client_ip)
        .body(Body::from(body))
        .unwrap()
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
