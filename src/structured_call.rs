use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api_connection::endpoints::{ImageGenerationRequest, ResponseFormat};
use crate::api_connection::{ApiConnectionError, ChatCompletionRequest, ChatMessage, ChatTransport};
use crate::error::AiProviderError;
use crate::schemas::StructuredResponse;

const STRUCTURED_TEMPERATURE: f32 = 0.2;
const IMAGE_SIZE: &str = "1024x1024";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Retries without waiting in between.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay after the failed `attempt` (1-based) before the next one.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Result of one attempt, tagged by whether another attempt could help.
#[derive(Debug)]
pub enum AttemptOutcome<V> {
    Ok(V),
    Transient(ApiConnectionError),
    Permanent(AiProviderError),
}

impl<V> From<ApiConnectionError> for AttemptOutcome<V> {
    fn from(err: ApiConnectionError) -> Self {
        if err.is_transient() {
            AttemptOutcome::Transient(err)
        } else {
            AttemptOutcome::Permanent(AiProviderError::Transport(err))
        }
    }
}

/// Strips a surrounding markdown code fence, if the model added one.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if !(trimmed.starts_with("```") && trimmed.ends_with("```") && trimmed.len() >= 6) {
        return trimmed;
    }
    let inner = &trimmed[3..trimmed.len() - 3];
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

/// Parses completion text and checks it against `R`'s contract.
pub fn parse_structured<R: StructuredResponse>(content: &str) -> Result<R, AiProviderError> {
    let json = strip_code_fence(content);
    if json.is_empty() {
        return Err(AiProviderError::schema_violation(R::NAME, "empty response content"));
    }
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|source| AiProviderError::InvalidJson {
            schema: R::NAME,
            source,
        })?;
    let parsed: R = serde_json::from_value(value)
        .map_err(|e| AiProviderError::schema_violation(R::NAME, e.to_string()))?;
    parsed
        .validate()
        .map_err(|message| AiProviderError::schema_violation(R::NAME, message))?;
    Ok(parsed)
}

pub fn structured_system_prompt<R: StructuredResponse>(instruction: &str) -> String {
    let schema = serde_json::to_string_pretty(&R::schema()).unwrap_or_default();
    format!(
        "{instruction}\n\nRespond with a JSON object that conforms to the following JSON schema named '{}'. \
The JSON object must be the only content in your response.\n{schema}",
        R::NAME
    )
}

/// Sends one instruction to the model and returns a typed, validated answer.
pub struct StructuredCaller<T> {
    transport: T,
    model: String,
    policy: RetryPolicy,
}

impl<T: ChatTransport> StructuredCaller<T> {
    pub fn new(transport: T, model: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            model: model.into(),
            policy,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_request<R: StructuredResponse>(
        &self,
        instruction: &str,
        user_content: &str,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(structured_system_prompt::<R>(instruction)),
                ChatMessage::user(user_content),
            ],
            response_format: Some(ResponseFormat::json_object()),
            temperature: Some(STRUCTURED_TEMPERATURE),
            max_tokens: None,
        }
    }

    /// Runs `attempt` until it succeeds, fails permanently or runs out of
    /// attempts.
    async fn with_retry<V, F, Fut>(&self, label: &str, attempt: F) -> Result<V, AiProviderError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AttemptOutcome<V>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut number = 1;
        loop {
            match attempt().await {
                AttemptOutcome::Ok(value) => {
                    debug!(call = label, attempt = number, "model call succeeded");
                    return Ok(value);
                }
                AttemptOutcome::Permanent(err) => {
                    warn!(call = label, attempt = number, error = %err, "model call failed permanently");
                    return Err(err);
                }
                AttemptOutcome::Transient(err) if number >= max_attempts => {
                    warn!(call = label, attempts = number, error = %err, "model call retries exhausted");
                    return Err(AiProviderError::RetriesExhausted {
                        attempts: number,
                        last: err,
                    });
                }
                AttemptOutcome::Transient(err) => {
                    let delay = self.policy.backoff_for(number);
                    warn!(
                        call = label,
                        attempt = number,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient model error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    number += 1;
                }
            }
        }
    }

    pub async fn call<R: StructuredResponse>(
        &self,
        instruction: &str,
        user_content: &str,
    ) -> Result<R, AiProviderError> {
        let request = &self.build_request::<R>(instruction, user_content);
        self.with_retry(R::NAME, move || async move {
            match self.transport.chat_completion(request.clone()).await {
                Ok(response) => {
                    let content = response.first_content().unwrap_or_default();
                    debug!(schema = R::NAME, content, "raw model response");
                    match parse_structured::<R>(content) {
                        Ok(parsed) => AttemptOutcome::Ok(parsed),
                        Err(err) => AttemptOutcome::Permanent(err),
                    }
                }
                Err(err) => err.into(),
            }
        })
        .await
    }

    /// Free-form completion, used for conversational replies.
    pub async fn complete_text(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, AiProviderError> {
        let request = &ChatCompletionRequest {
            model: model.to_string(),
            messages,
            response_format: None,
            temperature: None,
            max_tokens: None,
        };
        self.with_retry("chat_reply", move || async move {
            match self.transport.chat_completion(request.clone()).await {
                Ok(response) => match response.first_content() {
                    Some(text) if !text.trim().is_empty() => AttemptOutcome::Ok(text.to_string()),
                    _ => AttemptOutcome::Permanent(AiProviderError::Transport(
                        ApiConnectionError::EmptyResponse("no reply content".to_string()),
                    )),
                },
                Err(err) => err.into(),
            }
        })
        .await
    }

    /// Generates one image and returns its URL.
    pub async fn generate_image(&self, model: &str, prompt: &str) -> Result<String, AiProviderError> {
        let request = &ImageGenerationRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            n: 1,
            size: IMAGE_SIZE.to_string(),
        };
        self.with_retry("image", move || async move {
            match self.transport.generate_image(request.clone()).await {
                Ok(response) => match response.data.into_iter().find_map(|image| image.url) {
                    Some(url) => AttemptOutcome::Ok(url),
                    None => AttemptOutcome::Permanent(AiProviderError::Transport(
                        ApiConnectionError::EmptyResponse("no image URL returned".to_string()),
                    )),
                },
                Err(err) => err.into(),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{IngredientEnrichment, SummaryAndSentiment};

    #[test]
    fn backoff_doubles_from_two_seconds_and_caps_at_ten() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(8));
        assert_eq!(policy.backoff_for(4), Duration::from_secs(10));
        assert_eq!(policy.backoff_for(40), Duration::from_secs(10));
    }

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn parse_distinguishes_bad_json_from_wrong_shape() {
        let bad_json = parse_structured::<SummaryAndSentiment>("{not json").unwrap_err();
        assert!(matches!(bad_json, AiProviderError::InvalidJson { .. }));

        let wrong_shape = parse_structured::<SummaryAndSentiment>(r#"{"summary": "s"}"#).unwrap_err();
        assert!(matches!(wrong_shape, AiProviderError::SchemaViolation { .. }));
        assert!(wrong_shape.to_string().contains("sentiment"));

        let empty = parse_structured::<SummaryAndSentiment>("   ").unwrap_err();
        assert!(empty.is_schema_error());
    }

    #[test]
    fn non_finite_weight_is_a_schema_violation() {
        let err = parse_structured::<IngredientEnrichment>(r#"{"weight": "NaN"}"#).unwrap_err();
        assert!(matches!(
            err,
            AiProviderError::SchemaViolation { schema: "ingredient_enrichment", .. }
        ));
    }

    #[test]
    fn system_prompt_embeds_schema() {
        let prompt = structured_system_prompt::<SummaryAndSentiment>("Summarize.");
        assert!(prompt.starts_with("Summarize."));
        assert!(prompt.contains("summary_and_sentiment"));
        assert!(prompt.contains("\"sentiment\""));
    }
}
