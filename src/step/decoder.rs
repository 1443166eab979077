//! Incremental decode loop
//!
//! [`StepDecoder`] owns one primitive and one output buffer. Each call to
//! [`StepDecoder::decompress`] keeps its own input offset; only the
//! primitive's internal state survives between calls.

use super::classify::{classify, Outcome};
use super::{OutputBuffer, ReturnSignal, StepPrimitive};
use crate::config::{trace, DecoderOptions};
use crate::{DecodeError, Decompressor, Result};

/// Whole-buffer decoder driving a step-style primitive
#[derive(Debug)]
pub struct StepDecoder<P: StepPrimitive> {
    primitive: Option<P>,
    buffer: Option<OutputBuffer>,
    options: DecoderOptions,
}

impl<P: StepPrimitive> StepDecoder<P> {
    /// Create a decoder configured from the global switches
    pub fn new(primitive: P) -> Result<Self> {
        Self::with_options(primitive, DecoderOptions::from_globals())
    }

    /// Create a decoder with explicit options
    pub fn with_options(primitive: P, options: DecoderOptions) -> Result<Self> {
        let baseline = options
            .baseline
            .unwrap_or_else(|| primitive.recommended_output_size());
        let buffer = OutputBuffer::with_baseline(baseline)?;

        trace!(
            "step decoder created with {} byte output buffer",
            buffer.capacity()
        );

        Ok(Self {
            primitive: Some(primitive),
            buffer: Some(buffer),
            options,
        })
    }

    /// Options this context was created with
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Current output buffer capacity, `None` once closed
    pub fn capacity(&self) -> Option<usize> {
        self.buffer.as_ref().map(OutputBuffer::capacity)
    }

    /// The wrapped primitive, `None` once closed
    pub fn primitive(&self) -> Option<&P> {
        self.primitive.as_ref()
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.primitive.is_none()
    }

    /// Decompress one complete buffer
    ///
    /// Partial output is discarded on any fault.
    pub fn decompress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let (Some(primitive), Some(buffer)) = (self.primitive.as_mut(), self.buffer.as_mut())
        else {
            return Err(DecodeError::Closed);
        };

        let total = input.len();
        if total == 0 {
            trace!("empty input, nothing to decode");
            return Ok(Vec::new());
        }

        let mut offset = 0;
        let mut steps = 0usize;
        let mut accumulated = Vec::new();

        loop {
            let capacity = buffer.capacity();
            let report = primitive.step(input, offset, buffer.window());
            steps += 1;

            if report.produced > capacity {
                let err = DecodeError::MalformedInput {
                    offset,
                    reason: format!(
                        "primitive reported {} bytes written into a {} byte window",
                        report.produced, capacity
                    ),
                };
                return Err(abort(primitive, steps, err));
            }

            let step = classify(&report, offset, total);
            trace!(
                "step {}: produced {} bytes, input offset {}/{}, outcome {:?}",
                steps,
                step.produced,
                report.input_pos,
                total,
                step.outcome
            );

            match step.outcome {
                Outcome::Fault(fault) => {
                    return Err(abort(primitive, steps, fault.into_error(offset, total)));
                }
                Outcome::Done => {
                    accumulated.extend_from_slice(buffer.filled(step.produced));
                    if self.options.shrink_after_complete {
                        buffer.shrink_to_baseline();
                    }
                    return Ok(accumulated);
                }
                Outcome::Continue => {
                    accumulated.extend_from_slice(buffer.filled(step.produced));
                    offset = report.input_pos;
                    if let ReturnSignal::Pending(hint) = report.signal {
                        buffer
                            .ensure_capacity_for(step.produced, hint)
                            .map_err(|err| abort(primitive, steps, err))?;
                    }
                }
            }
        }
    }

    /// Release the primitive and the output buffer
    pub fn close(&mut self) {
        if self.primitive.take().is_some() {
            trace!("step decoder closed");
        }
        self.buffer = None;
    }
}

/// Reset the primitive after a failed call and log the failure
fn abort<P: StepPrimitive>(primitive: &mut P, steps: usize, err: DecodeError) -> DecodeError {
    primitive.reset();
    log::warn!("decompression failed after {} steps: {}", steps, err);
    err
}

impl<P: StepPrimitive> Decompressor for StepDecoder<P> {
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        StepDecoder::decompress(self, data)
    }

    fn close(&mut self) {
        StepDecoder::close(self)
    }
}
