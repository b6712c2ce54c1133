use serde::Deserialize;

use crate::error::CollaboratorError;

/// Everything a collaborator needs for one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub api_key: String,
    pub model: String,
    pub system: String,
    pub max_tokens: u32,
    /// The single user message.
    pub text: String,
}

/// One block of generated content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Any block kind the bridge does not relay.
    #[serde(other)]
    Other,
}

/// A finished, non-streaming completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl Completion {
    /// A completion holding a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Result<&str, CollaboratorError> {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => Ok(text),
            Some(ContentBlock::Other) => Err(CollaboratorError::MalformedResponse(
                "first content block is not text".to_string(),
            )),
            None => Err(CollaboratorError::MalformedResponse(
                "response contained no content".to_string(),
            )),
        }
    }
}

/// A blocking text-generation service.
///
/// Implementations own their transport, deadline and error mapping; the
/// exchange loop only sees a [`Completion`] or a [`CollaboratorError`].
pub trait Collaborator {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CollaboratorError>;
}

impl<C: Collaborator + ?Sized> Collaborator for &C {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CollaboratorError> {
        (**self).complete(request)
    }
}

impl<C: Collaborator + ?Sized> Collaborator for Box<C> {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CollaboratorError> {
        (**self).complete(request)
    }
}
