//! Process-wide switches and per-context options
//!
//! The two global switches are cheap debug knobs: they are read when a
//! context is created (shrink) or at each trace point (debug).

use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG: AtomicBool = AtomicBool::new(false);
static SHRINK: AtomicBool = AtomicBool::new(false);

/// Enable or disable verbose internal tracing
pub fn set_debug(enabled: bool) {
    DEBUG.store(enabled, Ordering::Relaxed);
}

/// Whether verbose internal tracing is enabled
pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

/// Enable or disable shrink-after-complete for contexts created afterwards
pub fn set_shrink(enabled: bool) {
    SHRINK.store(enabled, Ordering::Relaxed);
}

/// Whether newly created contexts shrink their buffer after each frame
pub fn shrink_enabled() -> bool {
    SHRINK.load(Ordering::Relaxed)
}

/// Emit a `log::debug!` record while the global debug switch is on
macro_rules! trace {
    ($($arg:tt)*) => {
        if $crate::config::debug_enabled() {
            log::debug!($($arg)*);
        }
    };
}
pub(crate) use trace;

/// Options fixed for the lifetime of a step-backend context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Reallocate the output buffer down to baseline after a completed frame
    pub shrink_after_complete: bool,
    /// Override the primitive's recommended output size
    pub baseline: Option<usize>,
}

impl DecoderOptions {
    /// Options as currently configured by the global switches
    pub fn from_globals() -> Self {
        Self {
            shrink_after_complete: shrink_enabled(),
            baseline: None,
        }
    }

    /// Set shrink-after-complete for this context only
    pub fn with_shrink(mut self, enabled: bool) -> Self {
        self.shrink_after_complete = enabled;
        self
    }

    /// Use a fixed baseline capacity instead of the primitive's recommendation
    pub fn with_baseline(mut self, baseline: usize) -> Self {
        self.baseline = Some(baseline);
        self
    }
}
