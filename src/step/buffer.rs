//! Output buffer management
//!
//! The output buffer is the write target of every step. Its write position
//! starts at zero on each step, so growing it never has to preserve data;
//! growth only gives the next step more room.

use crate::config::trace;
use crate::{DecodeError, Result};

/// Growable output window with a fixed baseline capacity
#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
    baseline: usize,
}

impl OutputBuffer {
    /// Allocate a buffer of `baseline` bytes
    pub fn with_baseline(baseline: usize) -> Result<Self> {
        let baseline = baseline.max(1);
        let mut buffer = Self {
            data: Vec::new(),
            baseline,
        };
        buffer.grow_to(baseline)?;
        Ok(buffer)
    }

    /// Current capacity of the write window
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Baseline capacity the buffer was created with
    pub fn baseline(&self) -> usize {
        self.baseline
    }

    /// The full window a step writes into
    pub fn window(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The first `produced` bytes written by the last step
    pub fn filled(&self, produced: usize) -> &[u8] {
        &self.data[..produced.min(self.data.len())]
    }

    /// Grow after a step that filled the window while output is pending
    ///
    /// New capacity is `max(capacity * 2, capacity + hint)`. Returns whether
    /// the buffer grew.
    pub fn ensure_capacity_for(&mut self, produced: usize, hint: usize) -> Result<bool> {
        let capacity = self.capacity();
        if produced < capacity || hint == 0 {
            return Ok(false);
        }

        let target = capacity
            .saturating_mul(2)
            .max(capacity.saturating_add(hint));
        self.grow_to(target)?;
        Ok(true)
    }

    /// Reallocate to at least `capacity` bytes
    pub fn grow_to(&mut self, capacity: usize) -> Result<()> {
        let current = self.data.len();
        if capacity <= current {
            return Ok(());
        }

        self.data
            .try_reserve_exact(capacity - current)
            .map_err(|_| DecodeError::AllocationFailed {
                requested: capacity,
            })?;
        self.data.resize(capacity, 0);

        trace!("output buffer resized {} -> {} bytes", current, capacity);
        Ok(())
    }

    /// Release everything above the baseline capacity
    ///
    /// Only valid between top-level calls.
    pub fn shrink_to_baseline(&mut self) -> bool {
        if self.data.len() <= self.baseline {
            return false;
        }

        let previous = self.data.len();
        self.data.truncate(self.baseline);
        self.data.shrink_to_fit();

        trace!("output buffer shrunk {} -> {} bytes", previous, self.baseline);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_allocation() {
        let buffer = OutputBuffer::with_baseline(4).unwrap();
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.baseline(), 4);

        // A zero baseline would leave the primitive nowhere to write
        let buffer = OutputBuffer::with_baseline(0).unwrap();
        assert_eq!(buffer.capacity(), 1);
    }

    #[test]
    fn test_growth_requires_full_window_and_hint() {
        let mut buffer = OutputBuffer::with_baseline(4).unwrap();

        assert!(!buffer.ensure_capacity_for(3, 100).unwrap());
        assert!(!buffer.ensure_capacity_for(4, 0).unwrap());
        assert_eq!(buffer.capacity(), 4);
    }

    #[test]
    fn test_growth_policy() {
        // Hint dominates: 4 + 6 > 4 * 2
        let mut buffer = OutputBuffer::with_baseline(4).unwrap();
        assert!(buffer.ensure_capacity_for(4, 6).unwrap());
        assert_eq!(buffer.capacity(), 10);

        // Doubling dominates: 10 * 2 > 10 + 3
        assert!(buffer.ensure_capacity_for(10, 3).unwrap());
        assert_eq!(buffer.capacity(), 20);
    }

    #[test]
    fn test_allocation_failure_is_reported() {
        let mut buffer = OutputBuffer::with_baseline(4).unwrap();
        let err = buffer.ensure_capacity_for(4, usize::MAX).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::AllocationFailed {
                requested: usize::MAX
            }
        ));
        // The buffer is untouched and still usable
        assert_eq!(buffer.capacity(), 4);
    }

    #[test]
    fn test_shrink_to_baseline() {
        let mut buffer = OutputBuffer::with_baseline(4).unwrap();
        assert!(!buffer.shrink_to_baseline());

        buffer.grow_to(64).unwrap();
        assert!(buffer.shrink_to_baseline());
        assert_eq!(buffer.capacity(), 4);
    }

    #[test]
    fn test_filled_is_clamped() {
        let mut buffer = OutputBuffer::with_baseline(4).unwrap();
        buffer.window().copy_from_slice(b"abcd");
        assert_eq!(buffer.filled(2), b"ab");
        assert_eq!(buffer.filled(9), b"abcd");
    }
}
