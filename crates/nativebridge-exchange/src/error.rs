use std::time::Duration;

use nativebridge_frame::FrameError;

/// Errors raised by a text-generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// The credential was rejected.
    #[error("authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    /// The service is throttling this credential.
    #[error("rate limited ({status}): {message}")]
    RateLimited { status: u16, message: String },

    /// The service rejected the request itself.
    #[error("invalid request ({status}): {message}")]
    InvalidRequest { status: u16, message: String },

    /// The service failed or is overloaded.
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// No response arrived before the configured deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be delivered.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with something that is not a usable completion.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Broad classes of exchange failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedFrame,
    PayloadDecode,
    MissingCredential,
    Collaborator,
    Encoding,
}

/// Errors that end an exchange session.
///
/// End of input is not an error; it is reported as a successful
/// [`SessionSummary`](crate::SessionSummary).
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The input did not contain a well-formed frame.
    #[error("malformed frame: {0}")]
    MalformedFrame(#[source] FrameError),

    /// Reading from the input stream failed.
    #[error("failed to read request frame: {0}")]
    Input(#[source] FrameError),

    /// The payload is not UTF-8 text.
    #[error("request payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The payload is not a JSON request object.
    #[error("request payload is not a valid request object: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The request carried no usable `apiKey`.
    #[error("missing credential: no apiKey found in message")]
    MissingCredential,

    /// The text-generation service failed the request.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// The response could not be serialized.
    #[error("failed to encode response: {0}")]
    EncodeResponse(#[source] serde_json::Error),

    /// The response frame could not be written.
    #[error("failed to send response frame: {0}")]
    SendResponse(#[source] FrameError),
}

impl ExchangeError {
    /// Map a frame read failure.
    pub fn from_read(err: FrameError) -> Self {
        if err.is_malformed() {
            Self::MalformedFrame(err)
        } else {
            Self::Input(err)
        }
    }

    /// The class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedFrame(_) | Self::Input(_) => ErrorKind::MalformedFrame,
            Self::InvalidUtf8(_) | Self::InvalidJson(_) => ErrorKind::PayloadDecode,
            Self::MissingCredential => ErrorKind::MissingCredential,
            Self::Collaborator(_) => ErrorKind::Collaborator,
            Self::EncodeResponse(_) | Self::SendResponse(_) => ErrorKind::Encoding,
        }
    }

    /// Whether an error frame can still be attempted after this failure.
    ///
    /// Only a broken output stream rules it out; an oversized or
    /// unserializable response leaves the stream untouched.
    pub fn output_writable(&self) -> bool {
        !matches!(
            self,
            Self::SendResponse(FrameError::Io(_) | FrameError::ConnectionClosed)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
