//! Common types shared by both decoder backends
//!
//! This module defines the error taxonomy, the crate-wide `Result` alias and
//! the [`Decompressor`] contract every backend satisfies.

use thiserror::Error;

/// Error type for decompression operations
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The underlying decode primitive could not be constructed
    #[error("Failed to initialize decode primitive: {0}")]
    PrimitiveInitFailed(String),

    /// The primitive reported an explicit decode error
    #[error("Malformed input at offset {offset}: {reason}")]
    MalformedInput {
        /// Absolute input offset the failing step started from
        offset: usize,
        /// Reason reported by the primitive
        reason: String,
    },

    /// A step made no forward progress while input remained unconsumed
    #[error("Stalled stream at offset {offset} ({remaining} bytes unconsumed)")]
    StalledStream {
        /// Absolute input offset where progress stopped
        offset: usize,
        /// Number of input bytes left behind
        remaining: usize,
    },

    /// Growing the output buffer failed
    #[error("Failed to grow output buffer to {requested} bytes")]
    AllocationFailed {
        /// Capacity that was requested
        requested: usize,
    },

    /// I/O-level fault in the stream-adapter backend
    #[error("Stream failure: {0}")]
    StreamFailure(#[from] std::io::Error),

    /// The context was used after `close`
    #[error("Decoder is closed")]
    Closed,
}

impl DecodeError {
    /// True for errors caused by the compressed data itself
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            DecodeError::MalformedInput { .. } | DecodeError::StalledStream { .. }
        )
    }
}

/// Result type alias for decompression operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Whole-buffer decompression contract
///
/// Both the step backend ([`crate::StepDecoder`]) and the stream backend
/// implement this, so callers can swap one for the other.
pub trait Decompressor {
    /// Decompress a complete buffer and return the decoded bytes
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>>;

    /// Release the underlying primitive; calling it again is a no-op
    fn close(&mut self);
}

impl<D: Decompressor + ?Sized> Decompressor for Box<D> {
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        (**self).decompress(data)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
