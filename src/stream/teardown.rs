//! Run-exactly-once release guard
//!
//! Explicit close, cancellation of the parent token and `Drop` all funnel
//! into [`Teardown::run`]. The first caller releases; the rest are no-ops.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub(crate) struct Teardown<P> {
    released: AtomicBool,
    token: CancellationToken,
    closed_tx: Mutex<Option<Sender<()>>>,
    primitive: Mutex<Option<P>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<P> Teardown<P> {
    /// Wrap `primitive`; the returned receiver disconnects on release
    pub(crate) fn new(primitive: P, token: CancellationToken) -> (Self, Receiver<()>) {
        let (closed_tx, closed_rx) = bounded(0);
        let teardown = Self {
            released: AtomicBool::new(false),
            token,
            closed_tx: Mutex::new(Some(closed_tx)),
            primitive: Mutex::new(Some(primitive)),
        };
        (teardown, closed_rx)
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Run `f` against the primitive unless it has been released
    pub(crate) fn with_primitive<R>(&self, f: impl FnOnce(&mut P) -> R) -> Option<R> {
        lock(&self.primitive).as_mut().map(f)
    }

    /// Release everything; returns whether this call did the work
    pub(crate) fn run(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.token.cancel();
        drop(lock(&self.closed_tx).take());
        drop(lock(&self.primitive).take());
        true
    }
}
