//! Step backend
//!
//! Drives a step-style decode primitive (one bounded call over an input
//! cursor and an output window) until a frame is complete, and turns that
//! into a whole-buffer decompression.

mod buffer;
mod classify;
mod decoder;
mod zstd;

pub use buffer::OutputBuffer;
pub use classify::{classify, Fault, Outcome, StepOutcome};
pub use decoder::StepDecoder;
pub use self::zstd::ZstdStep;

use crate::Result;

/// Return signal of a single primitive step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnSignal {
    /// The frame is fully decoded and flushed
    Complete,
    /// More work remains; the value is the primitive's size hint (0 = none)
    Pending(usize),
    /// The primitive reported a decode error
    Error(String),
}

/// What a primitive reports after one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Absolute input position after the step
    pub input_pos: usize,
    /// Bytes written to the start of the output window
    pub produced: usize,
    /// Raw return signal
    pub signal: ReturnSignal,
}

/// A stateful decode primitive that advances in bounded steps
///
/// The primitive is always handed the whole input buffer together with an
/// absolute offset, and writes from the start of `window`. Internal decode
/// state (window, dictionary) persists across steps and across calls.
pub trait StepPrimitive {
    /// Recommended output window size for streaming
    fn recommended_output_size(&self) -> usize;

    /// Decode from `input[offset..]` into `window`
    fn step(&mut self, input: &[u8], offset: usize, window: &mut [u8]) -> StepReport;

    /// Drop any half-decoded frame so the next call starts clean
    ///
    /// Called after every failed call. Stateless primitives need nothing.
    fn reset(&mut self) {}
}

impl<P: StepPrimitive + ?Sized> StepPrimitive for Box<P> {
    fn recommended_output_size(&self) -> usize {
        (**self).recommended_output_size()
    }

    fn step(&mut self, input: &[u8], offset: usize, window: &mut [u8]) -> StepReport {
        (**self).step(input, offset, window)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Convenience function to decompress a zstd frame in memory
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = StepDecoder::new(ZstdStep::new()?)?;
    decoder.decompress(data)
}
