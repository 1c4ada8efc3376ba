use crate::error::Result;
use crate::sync::{Condvar, MutexGuard};
use std::time::Instant;

/// loom mock implementation of [`Signal`](crate::util::signal::real::Signal)
///
/// loom has no notion of elapsed time, so deadlines are ignored and
/// timed waits only return on a notification.
pub(crate) struct Signal {
    condvar: Condvar,
}

impl Signal {
    pub(crate) fn new() -> Self {
        Self {
            condvar: Condvar::new(),
        }
    }

    pub(crate) fn wait<'a, T>(&self, guard: MutexGuard<'a, T>) -> Result<MutexGuard<'a, T>> {
        Ok(self.condvar.wait(guard)?)
    }

    pub(crate) fn wait_until<'a, T>(
        &self,
        guard: MutexGuard<'a, T>,
        _deadline: Instant,
    ) -> Result<MutexGuard<'a, T>> {
        self.wait(guard)
    }

    pub(crate) fn notify_one(&self) {
        self.condvar.notify_one();
    }

    pub(crate) fn notify_all(&self) {
        self.condvar.notify_all();
    }
}
