pub mod connection;
pub mod endpoints;

pub use connection::{ApiConnectionError, ChatTransport, HttpProvider};
pub use endpoints::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat};
