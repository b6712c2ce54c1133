use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{decode_length, Frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames.
/// Reads are bounded by the announced length, so no bytes belonging to the
/// next frame are ever consumed.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Ok(None)` when the stream ends cleanly before a length
    /// prefix starts. A stream that ends inside a frame is an error.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut header = [0u8; HEADER_SIZE];
        let received = self.fill(&mut header)?;

        if received == 0 {
            tracing::debug!("input stream closed");
            return Ok(None);
        }
        if received < HEADER_SIZE {
            return Err(FrameError::TruncatedHeader { received });
        }

        let payload_len = decode_length(header);
        if payload_len > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload_len,
                max: self.config.max_payload_size,
            });
        }

        let mut payload = BytesMut::with_capacity(payload_len.min(READ_CHUNK_SIZE));
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        while payload.len() < payload_len {
            let want = (payload_len - payload.len()).min(READ_CHUNK_SIZE);
            let read = self.fill(&mut chunk[..want])?;
            payload.extend_from_slice(&chunk[..read]);
            if read < want {
                return Err(FrameError::TruncatedPayload {
                    expected: payload_len,
                    received: payload.len(),
                });
            }
        }

        tracing::trace!(size = payload_len, "frame read");
        Ok(Some(Frame::new(payload.freeze())))
    }

    /// Fill `buf` until it is full or the stream ends. Returns bytes filled.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(filled)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame decoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
