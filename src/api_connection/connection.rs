use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageGenerationResponse,
};

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("API error {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("API returned an empty response: {0}")]
    EmptyResponse(String),
}

impl ApiConnectionError {
    /// Whether the same request may succeed if sent again: unreachable host,
    /// timeouts, rate limiting and server-side failures.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiConnectionError::Network(_) => true,
            ApiConnectionError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS
                    || *status == StatusCode::REQUEST_TIMEOUT
                    || status.is_server_error()
            }
            ApiConnectionError::MissingApiKey(_)
            | ApiConnectionError::Serialization(_)
            | ApiConnectionError::EmptyResponse(_) => false,
        }
    }
}

/// Outbound boundary to the language-model service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError>;

    async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ApiConnectionError>;
}

/// OpenAI-compatible HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    api_key_env_var: String,
}

impl HttpProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_key_env_var: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            api_key_env_var: api_key_env_var.into(),
        }
    }

    fn api_key(&self) -> Result<&str, ApiConnectionError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ApiConnectionError::MissingApiKey(self.api_key_env_var.clone()))
    }

    async fn post_json<Req, Resp>(&self, path: &str, payload: &Req) -> Result<Resp, ApiConnectionError>
    where
        Req: serde::Serialize + Sync,
        Resp: serde::de::DeserializeOwned,
    {
        let api_key = self.api_key()?;
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "sending request to model API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            Err(ApiConnectionError::Api { status, body })
        }
    }
}

#[async_trait]
impl ChatTransport for HttpProvider {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        self.post_json("chat/completions", &request).await
    }

    async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ApiConnectionError> {
        self.post_json("images/generations", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        let rate_limited = ApiConnectionError::Api {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        let unavailable = ApiConnectionError::Api {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        };
        assert!(rate_limited.is_transient());
        assert!(unavailable.is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        let unauthorized = ApiConnectionError::Api {
            status: StatusCode::UNAUTHORIZED,
            body: "bad key".to_string(),
        };
        assert!(!unauthorized.is_transient());
        assert!(!ApiConnectionError::MissingApiKey("OPENAI_API_KEY".to_string()).is_transient());
        assert!(!ApiConnectionError::EmptyResponse("no choices".to_string()).is_transient());
    }
}
