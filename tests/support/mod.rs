#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use formula_insight::api_connection::endpoints::{
    ImageGenerationRequest, ImageGenerationResponse,
};
use formula_insight::api_connection::{
    ApiConnectionError, ChatCompletionRequest, ChatCompletionResponse, ChatTransport,
};
use formula_insight::{AiProvider, RetryPolicy, StructuredCaller};

type ChatResult = Result<ChatCompletionResponse, ApiConnectionError>;
type ImageResult = Result<ImageGenerationResponse, ApiConnectionError>;
type ChatResponder = dyn Fn(&ChatCompletionRequest, usize) -> ChatResult + Send + Sync;
type ImageResponder = dyn Fn(&ImageGenerationRequest) -> ImageResult + Send + Sync;

/// In-memory transport answering from a closure and recording every request.
#[derive(Clone)]
pub struct ScriptedTransport {
    chat: Arc<ChatResponder>,
    image: Arc<ImageResponder>,
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
    pub image_requests: Arc<Mutex<Vec<ImageGenerationRequest>>>,
    calls: Arc<AtomicUsize>,
    latency: Duration,
}

impl ScriptedTransport {
    pub fn new<F>(chat: F) -> Self
    where
        F: Fn(&ChatCompletionRequest, usize) -> ChatResult + Send + Sync + 'static,
    {
        Self {
            chat: Arc::new(chat),
            image: Arc::new(|_| Ok(image_response("https://images.example.com/mockup.png"))),
            requests: Arc::new(Mutex::new(Vec::new())),
            image_requests: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            latency: Duration::ZERO,
        }
    }

    /// Always answers with the same completion text.
    pub fn replying(content: &str) -> Self {
        let content = content.to_string();
        Self::new(move |_, _| Ok(completion(&content)))
    }

    /// Always fails with the given HTTP status.
    pub fn failing(status: StatusCode) -> Self {
        Self::new(move |_, _| Err(api_error(status)))
    }

    /// Answers by schema name found in the system prompt.
    pub fn by_schema(routes: Vec<(&'static str, String)>) -> Self {
        Self::new(move |request, _| {
            let system = &request.messages[0].content;
            routes
                .iter()
                .find(|(schema, _)| system.contains(&format!("named '{schema}'")))
                .map(|(_, content)| completion(content))
                .ok_or_else(|| api_error(StatusCode::NOT_FOUND))
        })
    }

    pub fn with_images<F>(mut self, image: F) -> Self
    where
        F: Fn(&ImageGenerationRequest) -> ImageResult + Send + Sync + 'static,
    {
        self.image = Arc::new(image);
        self
    }

    /// Every chat completion sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> ChatCompletionRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> ChatResult {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        (self.chat)(&request, attempt)
    }

    async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> ImageResult {
        self.image_requests.lock().unwrap().push(request.clone());
        (self.image)(&request)
    }
}

pub fn completion(content: &str) -> ChatCompletionResponse {
    serde_json::from_value(serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000u64,
        "model": "gpt-4-turbo",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {"role": "assistant", "content": content}
        }]
    }))
    .expect("valid completion fixture")
}

pub fn image_response(url: &str) -> ImageGenerationResponse {
    serde_json::from_value(serde_json::json!({
        "created": 1_700_000_000u64,
        "data": [{"url": url}]
    }))
    .expect("valid image fixture")
}

pub fn api_error(status: StatusCode) -> ApiConnectionError {
    ApiConnectionError::Api {
        status,
        body: format!("scripted {status}"),
    }
}

pub fn caller(transport: ScriptedTransport) -> StructuredCaller<ScriptedTransport> {
    StructuredCaller::new(transport, "gpt-4-turbo", RetryPolicy::immediate(3))
}

pub fn provider(transport: ScriptedTransport) -> AiProvider<ScriptedTransport> {
    AiProvider::new(caller(transport), "gpt-4", "dall-e-3")
}
