use std::time::Duration;

/// Model requested when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Upper bound on generated tokens per completion.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Messages API endpoint root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.anthropic.com";

/// Value of the `anthropic-version` header.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Deadline for a single completion request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Instruction used when a request carries no `systemPrompt`.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a flexible LinkedIn communication partner. \
Help the user read, understand and answer professional messages and posts. \
Match the tone of the conversation, keep replies concise and natural, \
and answer in the language of the text you are given.";

/// Per-exchange settings for the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Model identifier sent with every completion.
    pub model: String,
    /// Maximum output size per completion.
    pub max_tokens: u32,
    /// Instruction substituted for an absent or empty `systemPrompt`.
    pub default_system_prompt: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            default_system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Connection settings for [`MessagesClient`](crate::MessagesClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and host, without the `/v1/messages` path.
    pub base_url: String,
    pub api_version: String,
    /// Deadline for the whole request, connect through body.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Full URL of the messages endpoint.
    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
