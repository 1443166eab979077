//! zstd step primitive
//!
//! Wraps a `ZSTD_DCtx` and exposes `ZSTD_decompressStream` as a single
//! bounded step.

use super::{ReturnSignal, StepPrimitive, StepReport};
use crate::{DecodeError, Result};
use zstd::zstd_safe::{self, DCtx, InBuffer, OutBuffer};

/// Step primitive backed by a native zstd decompression context
pub struct ZstdStep {
    dctx: DCtx<'static>,
}

impl ZstdStep {
    /// Allocate a new decompression context
    pub fn new() -> Result<Self> {
        let dctx = DCtx::try_create().ok_or_else(|| {
            DecodeError::PrimitiveInitFailed("ZSTD_createDCtx returned null".to_string())
        })?;
        Ok(Self { dctx })
    }
}

impl std::fmt::Debug for ZstdStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZstdStep").finish_non_exhaustive()
    }
}

impl StepPrimitive for ZstdStep {
    fn recommended_output_size(&self) -> usize {
        DCtx::out_size()
    }

    fn step(&mut self, input: &[u8], offset: usize, window: &mut [u8]) -> StepReport {
        let mut src = InBuffer {
            src: input,
            pos: offset,
        };
        let mut dst = OutBuffer::around(window);

        let signal = match self.dctx.decompress_stream(&mut dst, &mut src) {
            Ok(0) => ReturnSignal::Complete,
            Ok(hint) => ReturnSignal::Pending(hint),
            Err(code) => ReturnSignal::Error(zstd_safe::get_error_name(code).to_string()),
        };

        StepReport {
            input_pos: src.pos,
            produced: dst.pos(),
            signal,
        }
    }

    fn reset(&mut self) {
        // Resetting the session never fails; parameters are kept
        let _ = self.dctx.reset(zstd_safe::ResetDirective::SessionOnly);
    }
}
