//! Blocking client for the Anthropic Messages API.

use serde::{Deserialize, Serialize};

use crate::collaborator::{Collaborator, Completion, CompletionRequest};
use crate::config::ClientConfig;
use crate::error::CollaboratorError;

/// Longest slice of an unparseable error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    message: String,
}

/// [`Collaborator`] backed by `POST /v1/messages`.
///
/// The credential travels with each request, so one client serves any
/// number of keys.
#[derive(Debug, Clone)]
pub struct MessagesClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl MessagesClient {
    /// Create a client; `config.timeout` bounds every request.
    pub fn new(config: ClientConfig) -> Result<Self, CollaboratorError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("nativebridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| CollaboratorError::Network(err.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn transport_error(&self, err: reqwest::Error) -> CollaboratorError {
        if err.is_timeout() {
            CollaboratorError::Timeout(self.config.timeout)
        } else if err.is_builder() {
            CollaboratorError::InvalidRequest {
                status: 0,
                message: format!("request could not be built: {err}"),
            }
        } else {
            CollaboratorError::Network(err.to_string())
        }
    }
}

impl Collaborator for MessagesClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CollaboratorError> {
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: [UserMessage {
                role: "user",
                content: &request.text,
            }],
        };

        let response = self
            .http
            .post(self.config.messages_url())
            .header("x-api-key", &request.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let text = response.text().map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            let err = classify_status(status.as_u16(), &text);
            tracing::warn!(status = status.as_u16(), error = %err, "completion request rejected");
            return Err(err);
        }

        serde_json::from_str(&text)
            .map_err(|err| CollaboratorError::MalformedResponse(err.to_string()))
    }
}

/// Map a non-success status and body to an error.
fn classify_status(status: u16, body: &str) -> CollaboratorError {
    let message = error_message(body);
    match status {
        401 | 403 => CollaboratorError::Authentication { status, message },
        429 => CollaboratorError::RateLimited { status, message },
        400 | 404 | 413 | 422 => CollaboratorError::InvalidRequest { status, message },
        _ => CollaboratorError::Service { status, message },
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            error: ApiErrorDetail {
                kind: Some(kind),
                message,
            },
        }) => format!("{kind}: {message}"),
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "no error details".to_string(),
        Err(_) => body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}
