//! oneshot-decode - whole-buffer decompression over incremental primitives
//!
//! Decode engines such as zstd only advance in bounded steps: they may stall,
//! may need more output space than was handed to them, and signal the end of
//! a frame through a combination of consumed/produced byte counts. This crate
//! turns such a primitive into a single `decompress(bytes) -> bytes` call that
//! always terminates and never returns partial output.
//!
//! Two interchangeable backends implement the [`Decompressor`] contract:
//!
//! - [`StepDecoder`] drives a step-style primitive ([`StepPrimitive`]) and
//!   classifies every step as continue, done, malformed or stalled.
//! - [`StreamDecoder`] (feature `stream`, on by default) bridges a primitive
//!   that only offers a blocking reader, using a producer thread, a bounded
//!   pipe and cooperative cancellation.
//!
//! # Example
//!
//! ```no_run
//! use oneshot_decode::{decompress_bytes, Decompressor, StepDecoder, ZstdStep};
//!
//! let frame = std::fs::read("data.zst")?;
//!
//! // One-shot helper
//! let data = decompress_bytes(&frame)?;
//!
//! // Or keep a context around for many buffers
//! let mut decoder = StepDecoder::new(ZstdStep::new()?)?;
//! let again = decoder.decompress(&frame)?;
//! decoder.close();
//! assert_eq!(data, again);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod common;
pub mod config;
pub mod error;
pub mod step;

#[cfg(feature = "stream")]
pub mod stream;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;
#[cfg(feature = "async")]
pub mod async_decode;

// Re-export commonly used types
pub use common::{DecodeError, Decompressor, Result};
pub use config::{debug_enabled, set_debug, set_shrink, shrink_enabled, DecoderOptions};
pub use step::{
    decompress_bytes, OutputBuffer, ReturnSignal, StepDecoder, StepPrimitive, StepReport,
    ZstdStep,
};

#[cfg(feature = "stream")]
pub use stream::{CloseHandle, StreamDecoder, StreamOptions, StreamPrimitive, ZstdStream};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchDecoder;
#[cfg(feature = "async")]
pub use async_decode::{decompress_async, AsyncDecoder};
