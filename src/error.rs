use thiserror::Error;

use crate::api_connection::ApiConnectionError;

/// The single error surfacing from the AI core. Every variant maps to a
/// "service unavailable" response at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AiProviderError {
    #[error("AI provider request failed: {0}")]
    Transport(#[source] ApiConnectionError),
    #[error("AI provider unavailable after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: ApiConnectionError,
    },
    #[error("AI response for '{schema}' is not valid JSON: {source}")]
    InvalidJson {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("AI response for '{schema}' does not match the schema: {message}")]
    SchemaViolation { schema: &'static str, message: String },
}

impl AiProviderError {
    pub fn schema_violation(schema: &'static str, message: impl Into<String>) -> Self {
        AiProviderError::SchemaViolation {
            schema,
            message: message.into(),
        }
    }

    /// Permanent response-shape failures (parse or validation).
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            AiProviderError::InvalidJson { .. } | AiProviderError::SchemaViolation { .. }
        )
    }

    /// HTTP status a caller should answer with.
    pub fn status_hint(&self) -> u16 {
        503
    }
}
