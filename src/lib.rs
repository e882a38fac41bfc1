pub mod ai_provider;
pub mod api_connection;
pub mod cli;
pub mod commercialization;
pub mod config;
pub mod error;
pub mod inputs;
pub mod marketing;
pub mod prompts;
pub mod schemas;
pub mod structured_call;
pub mod timeline;

pub use ai_provider::AiProvider;
pub use error::AiProviderError;
pub use structured_call::{RetryPolicy, StructuredCaller};
