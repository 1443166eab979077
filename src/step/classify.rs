//! Step classification
//!
//! The numeric hint alone cannot tell "input exhausted, nothing left to
//! flush" apart from "stuck on corrupt framing": both report a nonzero
//! hint. Byte-count evidence of forward progress decides.

use super::{ReturnSignal, StepReport};
use crate::DecodeError;

/// Why a step ended the decode loop with an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The primitive reported a decode error
    MalformedInput(String),
    /// No forward progress while input remains
    StalledStream,
}

impl Fault {
    /// Convert into the public error for a step that started at `offset`
    pub fn into_error(self, offset: usize, total: usize) -> DecodeError {
        match self {
            Fault::MalformedInput(reason) => DecodeError::MalformedInput { offset, reason },
            Fault::StalledStream => DecodeError::StalledStream {
                offset,
                remaining: total.saturating_sub(offset),
            },
        }
    }
}

/// Classification of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Progress was made and more work remains
    Continue,
    /// The frame is complete
    Done,
    /// The loop must stop with an error
    Fault(Fault),
}

/// Result of classifying one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Input bytes consumed by the step
    pub consumed: usize,
    /// Output bytes produced by the step
    pub produced: usize,
    /// What the loop should do next
    pub outcome: Outcome,
}

/// Classify a step that started at absolute input offset `before`
pub fn classify(report: &StepReport, before: usize, total: usize) -> StepOutcome {
    let after = report.input_pos;
    let produced = report.produced;

    if after < before || after > total {
        return StepOutcome {
            consumed: 0,
            produced,
            outcome: Outcome::Fault(Fault::MalformedInput(format!(
                "primitive moved input cursor from {before} to {after} (input length {total})"
            ))),
        };
    }

    let consumed = after - before;
    let made_progress = consumed > 0 || produced > 0;
    let input_exhausted = after == total;

    let outcome = match &report.signal {
        ReturnSignal::Error(reason) => Outcome::Fault(Fault::MalformedInput(reason.clone())),
        ReturnSignal::Complete => Outcome::Done,
        ReturnSignal::Pending(_) if !made_progress && input_exhausted => Outcome::Done,
        ReturnSignal::Pending(_) if !made_progress => Outcome::Fault(Fault::StalledStream),
        ReturnSignal::Pending(_) => Outcome::Continue,
    };

    StepOutcome {
        consumed,
        produced,
        outcome,
    }
}
