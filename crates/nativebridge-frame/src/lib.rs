//! Length-prefixed message framing for browser native messaging.
//!
//! Every message on the wire is a 4-byte little-endian payload length
//! followed by exactly that many payload bytes. The same format is used in
//! both directions over the host's stdin and stdout.
//!
//! The reader never consumes bytes past the end of the current frame, so the
//! underlying stream stays positioned on the next length prefix.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, decode_length, encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD,
    HEADER_SIZE, HOST_TO_BROWSER_MAX_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
