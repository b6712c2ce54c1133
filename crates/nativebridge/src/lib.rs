//! Browser native messaging host for a text-generation API.
//!
//! The browser starts the host, writes length-prefixed JSON requests to its
//! stdin and reads length-prefixed JSON responses from its stdout.
//!
//! # Crate Structure
//!
//! - [`frame`]: 4-byte little-endian length-prefixed framing
//! - [`exchange`]: request/response loop and the text-generation client

/// Re-export frame types.
pub mod frame {
    pub use nativebridge_frame::*;
}

/// Re-export exchange types.
pub mod exchange {
    pub use nativebridge_exchange::*;
}
