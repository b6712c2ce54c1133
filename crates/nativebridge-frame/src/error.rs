/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream ended after 1-3 bytes of a length prefix.
    #[error("stream ended after {received} of 4 length-prefix bytes")]
    TruncatedHeader { received: usize },

    /// The stream ended before the announced payload was complete.
    #[error("stream ended after {received} of {expected} payload bytes")]
    TruncatedPayload { expected: usize, received: usize },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output stream accepted zero bytes.
    #[error("connection closed (output accepted no bytes)")]
    ConnectionClosed,
}

impl FrameError {
    /// Whether the error describes bad framing on the input side rather than
    /// an I/O failure.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::TruncatedHeader { .. }
                | Self::TruncatedPayload { .. }
                | Self::PayloadTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
