//! Runtime configuration for the webhook client and entry store.

use std::env;

pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 5_000;

/// Connection settings shared by the optimization client and the entry store.
///
/// Constructed explicitly or from the environment via [`from_env`](Self::from_env).
#[derive(Debug, Clone)]
pub struct Config {
    /// Optimization webhook endpoint. The client POSTs submissions here.
    pub webhook_url: String,
    /// Base URL of the remote table store (no trailing slash).
    pub store_url: String,
    /// Bearer token attached to every outbound request.
    pub auth_token: String,
    /// Wall-clock budget for one optimization call.
    pub timeout_ms: u64,
    /// Advisory upper bound on documentation text length.
    pub max_text_length: usize,
}

impl Config {
    pub fn new(webhook_url: impl Into<String>, store_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            store_url: store_url.into(),
            auth_token: auth_token.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }

    /// Read configuration from `PFLEGEDOC_*` environment variables.
    ///
    /// URLs and the token default to empty strings when unset; numeric
    /// options fall back to their defaults when unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            webhook_url: env::var("PFLEGEDOC_WEBHOOK_URL").unwrap_or_default(),
            store_url: env::var("PFLEGEDOC_STORE_URL").unwrap_or_default(),
            auth_token: env::var("PFLEGEDOC_API_TOKEN").unwrap_or_default(),
            timeout_ms: env_parse("PFLEGEDOC_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
            max_text_length: env_parse("PFLEGEDOC_MAX_TEXT_LENGTH", DEFAULT_MAX_TEXT_LENGTH),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
