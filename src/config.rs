use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::ai_provider::AiProvider;
use crate::api_connection::endpoints::{
    DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_MODEL, DEFAULT_JSON_MODEL,
};
use crate::api_connection::HttpProvider;
use crate::structured_call::{RetryPolicy, StructuredCaller};
use crate::timeline::UnmatchedStagePolicy;

pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub chat_model: String,
    pub image_model: String,
    pub retry: RetryPolicy,
    pub unmatched_stage_policy: UnmatchedStagePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_JSON_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            retry: RetryPolicy::default(),
            unmatched_stage_policy: UnmatchedStagePolicy::default(),
        }
    }
}

fn parse_var<V>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<V>>
where
    V: FromStr,
    V::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<V>()
            .map(Some)
            .map_err(|e| anyhow!("invalid value '{raw}' for {name}: {e}")),
    }
}

impl Settings {
    /// Reads settings from the environment, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .context("failed to load settings from the environment")
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let max_attempts: u32 =
            parse_var(&lookup, "AI_MAX_ATTEMPTS")?.unwrap_or(defaults.retry.max_attempts);
        if max_attempts == 0 {
            return Err(anyhow!("AI_MAX_ATTEMPTS must be at least 1"));
        }
        let initial_backoff = parse_var::<u64>(&lookup, "AI_BACKOFF_INITIAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.retry.initial_backoff);
        let max_backoff = parse_var::<u64>(&lookup, "AI_BACKOFF_MAX_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.retry.max_backoff);

        Ok(Self {
            api_key: lookup(API_KEY_ENV_VAR),
            base_url: lookup("AI_BASE_URL").unwrap_or(defaults.base_url),
            model: lookup("AI_MODEL").unwrap_or(defaults.model),
            chat_model: lookup("AI_CHAT_MODEL").unwrap_or(defaults.chat_model),
            image_model: lookup("AI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            retry: RetryPolicy {
                max_attempts,
                initial_backoff,
                max_backoff,
            },
            unmatched_stage_policy: parse_var(&lookup, "TIMELINE_UNMATCHED")?
                .unwrap_or(defaults.unmatched_stage_policy),
        })
    }

    pub fn build_provider(&self) -> AiProvider<HttpProvider> {
        let transport = HttpProvider::new(&self.base_url, self.api_key.clone(), API_KEY_ENV_VAR);
        let caller = StructuredCaller::new(transport, &self.model, self.retry);
        AiProvider::new(caller, &self.chat_model, &self.image_model)
    }
}
