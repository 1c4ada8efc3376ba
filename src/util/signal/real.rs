use crate::error::Result;
use crate::sync::{Condvar, MutexGuard};
use std::time::Instant;

/// Wait/notify primitive paired with the state behind a queue's mutex.
///
/// Waiters always re-check their predicate after returning: both
/// [`wait`](Signal::wait) and [`wait_until`](Signal::wait_until) may
/// return spuriously.
pub(crate) struct Signal {
    condvar: Condvar,
}

impl Signal {
    pub(crate) const fn new() -> Self {
        Self {
            condvar: Condvar::new(),
        }
    }

    /// Releases `guard` and sleeps until notified.
    #[inline]
    pub(crate) fn wait<'a, T>(&self, guard: MutexGuard<'a, T>) -> Result<MutexGuard<'a, T>> {
        Ok(self.condvar.wait(guard)?)
    }

    /// Releases `guard` and sleeps until notified or until `deadline` passes.
    ///
    /// Returns immediately if `deadline` already passed.
    pub(crate) fn wait_until<'a, T>(
        &self,
        guard: MutexGuard<'a, T>,
        deadline: Instant,
    ) -> Result<MutexGuard<'a, T>> {
        let now = Instant::now();
        if deadline <= now {
            return Ok(guard);
        }
        let (guard, _timed_out) = self.condvar.wait_timeout(guard, deadline - now)?;
        Ok(guard)
    }

    #[inline]
    pub(crate) fn notify_one(&self) {
        self.condvar.notify_one();
    }

    #[inline]
    pub(crate) fn notify_all(&self) {
        self.condvar.notify_all();
    }
}
