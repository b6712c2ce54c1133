use serde::{Deserialize, Serialize};

use crate::error::{ExchangeError, Result};

/// A request frame sent by the browser extension.
///
/// Every field is optional at the wire level; which ones are required is
/// decided during validation, not parsing. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Request {
    /// Decode a frame payload as UTF-8 JSON.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload)?;
        serde_json::from_str(text).map_err(ExchangeError::InvalidJson)
    }
}

/// A response frame sent back to the browser extension.
///
/// Serializes as `{"result": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Result(String),
    Error(String),
}

impl Response {
    /// An error response describing `err`.
    pub fn error(err: &impl std::fmt::Display) -> Self {
        Self::Error(err.to_string())
    }

    /// Encode as UTF-8 JSON.
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(ExchangeError::EncodeResponse)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
