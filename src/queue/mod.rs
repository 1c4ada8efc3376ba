use crate::error::{Error, Result};
use crate::sync::{Mutex, MutexGuard};
use crate::util::signal::Signal;
use std::fmt;
use std::time::{Duration, Instant};

mod inner;
use inner::Inner;

mod typed;
#[doc(inline)]
pub use typed::{Record, TypedQueue};

/// A fixed-capacity FIFO queue of fixed-size byte records, shared between threads.
///
/// Every item is exactly [`item_size`](BoundedQueue::item_size) bytes and is
/// copied in and out of an internal ring buffer. Producers never wait:
/// [`send`](BoundedQueue::send) fails with [`Error::Full`] when there's no
/// room. Consumers block in [`receive`](BoundedQueue::receive), optionally
/// with a timeout, until an item is available.
///
/// Share it between threads by reference, e.g. through an [`Arc`](std::sync::Arc)
/// or a scoped thread.
///
/// # Example
///
/// ```
/// use bounded_fifo::{BoundedQueue, Error};
/// use std::time::Duration;
///
/// let queue = BoundedQueue::new(2, 4)?;
/// queue.send(b"ping")?;
/// queue.send(b"pong")?;
/// assert_eq!(queue.send(b"full"), Err(Error::Full));
///
/// assert_eq!(&*queue.receive(None)?, b"ping");
/// assert_eq!(&*queue.receive(Some(Duration::from_millis(10)))?, b"pong");
/// assert_eq!(
///     queue.receive(Some(Duration::from_millis(10))),
///     Err(Error::Timeout)
/// );
/// queue.destroy()?;
/// # Ok::<(), bounded_fifo::Error>(())
/// ```
pub struct BoundedQueue {
    state: Mutex<Inner>,
    //an item was queued or the queue was closed
    items: Signal,
    //a slot was freed or the queue was closed
    space: Signal,
    capacity: usize,
    item_size: usize,
}

impl BoundedQueue {
    /// Creates a queue holding at most `capacity` items of `item_size` bytes each.
    ///
    /// The storage is allocated up front and zeroed.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `capacity` or `item_size` is zero.
    /// - [`Error::ResourceExhausted`] if the storage couldn't be allocated.
    pub fn new(capacity: usize, item_size: usize) -> Result<Self> {
        let inner = Inner::new(capacity, item_size)?;
        fifo_trace!(capacity, item_size, "queue created");
        Ok(Self {
            state: Mutex::new(inner),
            items: Signal::new(),
            space: Signal::new(),
            capacity,
            item_size,
        })
    }

    /// Copies `item` into the queue without blocking.
    ///
    /// Wakes at most one receiver waiting for an item.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `item` isn't exactly `item_size` bytes long.
    /// - [`Error::Full`] if the queue already holds `capacity` items.
    /// - [`Error::Closed`] if the queue was closed.
    pub fn send(&self, item: &[u8]) -> Result<()> {
        self.check_item_len(item.len())?;
        self.send_with(|slot| slot.copy_from_slice(item))
    }

    /// Copies `item` into the queue, waiting for a free slot if it's full.
    ///
    /// `None` waits for as long as it takes. This is the only sending
    /// operation that blocks; [`send`](BoundedQueue::send) never does.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `item` isn't exactly `item_size` bytes long.
    /// - [`Error::Timeout`] if no slot freed up within `timeout`.
    /// - [`Error::Closed`] if the queue was closed before the item was queued.
    pub fn send_timeout(&self, item: &[u8], timeout: Option<Duration>) -> Result<()> {
        self.check_item_len(item.len())?;
        self.send_timeout_with(timeout, |slot| slot.copy_from_slice(item))
    }

    /// Removes the oldest item, waiting up to `timeout` for one to arrive.
    ///
    /// `None` waits indefinitely. A timed out call doesn't change the queue.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if nothing arrived within `timeout`.
    /// - [`Error::Closed`] if the queue is closed and empty.
    pub fn receive(&self, timeout: Option<Duration>) -> Result<Box<[u8]>> {
        self.receive_with(timeout, |slot| Box::from(slot))
    }

    /// Like [`receive`](BoundedQueue::receive), but copies the item into `out`.
    ///
    /// # Errors
    ///
    /// As [`receive`](BoundedQueue::receive), plus [`Error::InvalidArgument`]
    /// if `out` isn't exactly `item_size` bytes long.
    pub fn receive_into(&self, out: &mut [u8], timeout: Option<Duration>) -> Result<()> {
        self.check_item_len(out.len())?;
        self.receive_with(timeout, |slot| out.copy_from_slice(slot))
    }

    /// Removes the oldest item if there is one, without blocking.
    ///
    /// Fails with [`Error::Timeout`] on an empty open queue.
    #[inline]
    pub fn try_receive(&self) -> Result<Box<[u8]>> {
        self.receive(Some(Duration::ZERO))
    }

    /// Closes the queue and wakes every blocked sender and receiver.
    ///
    /// Items already queued can still be received; once they're gone,
    /// receivers get [`Error::Closed`] instead of blocking. Sends fail with
    /// [`Error::Closed`]. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.lock()?;
        if !state.closed {
            state.closed = true;
            fifo_trace!(len = state.len(), "queue closed");
        }
        drop(state);
        self.items.notify_all();
        self.space.notify_all();
        Ok(())
    }

    /// Checks if [`close`](BoundedQueue::close) was called.
    pub fn is_closed(&self) -> Result<bool> {
        Ok(self.state.lock()?.closed)
    }

    /// Returns the number of queued items.
    ///
    /// # Note
    ///
    /// The value may be stale by the time it's returned if other threads
    /// are sending or receiving.
    pub fn len(&self) -> Result<usize> {
        Ok(self.state.lock()?.len())
    }

    /// Checks if the queue holds no items. Subject to the same staleness as [`len`](BoundedQueue::len).
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.state.lock()?.is_empty())
    }

    /// Checks if the queue holds `capacity` items. Subject to the same staleness as [`len`](BoundedQueue::len).
    pub fn is_full(&self) -> Result<bool> {
        Ok(self.state.lock()?.is_full())
    }

    /// The maximum number of items the queue holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The size of every item in bytes.
    #[inline]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Tears the queue down and releases its storage.
    ///
    /// Taking `self` by value means no other thread can still be using the
    /// queue; join every producer and consumer (or unwrap the `Arc`) first.
    /// Dropping the queue releases the same resources without reporting errors.
    ///
    /// # Errors
    ///
    /// [`Error::Poisoned`] if a thread panicked while holding the lock.
    /// The storage is released either way.
    pub fn destroy(self) -> Result<()> {
        let inner = self.state.into_inner()?;
        fifo_trace!(len = inner.len(), "queue destroyed");
        drop(inner);
        Ok(())
    }

    pub(crate) fn send_with(&self, write: impl FnOnce(&mut [u8])) -> Result<()> {
        let mut state = self.state.lock()?;
        if state.closed {
            return Err(Error::Closed);
        }
        if state.push_with(write).is_none() {
            return Err(Error::Full);
        }
        fifo_trace!(len = state.len(), "item sent");
        drop(state);
        self.items.notify_one();
        Ok(())
    }

    pub(crate) fn send_timeout_with(
        &self,
        timeout: Option<Duration>,
        mut write: impl FnMut(&mut [u8]),
    ) -> Result<()> {
        let deadline = deadline_after(timeout);
        let mut state = self.state.lock()?;
        loop {
            if state.closed {
                return Err(Error::Closed);
            }
            if state.push_with(&mut write).is_some() {
                fifo_trace!(len = state.len(), "item sent");
                drop(state);
                self.items.notify_one();
                return Ok(());
            }
            state = Self::wait(&self.space, state, deadline)?;
        }
    }

    pub(crate) fn receive_with<R>(
        &self,
        timeout: Option<Duration>,
        mut read: impl FnMut(&[u8]) -> R,
    ) -> Result<R> {
        let deadline = deadline_after(timeout);
        let mut state = self.state.lock()?;
        loop {
            if let Some(item) = state.pop_with(&mut read) {
                fifo_trace!(len = state.len(), "item received");
                drop(state);
                self.space.notify_one();
                return Ok(item);
            }
            if state.closed {
                return Err(Error::Closed);
            }
            state = Self::wait(&self.items, state, deadline)?;
        }
    }

    /// Sleeps on `signal`, failing with [`Error::Timeout`] once `deadline` passed.
    fn wait<'a>(
        signal: &Signal,
        state: MutexGuard<'a, Inner>,
        deadline: Option<Instant>,
    ) -> Result<MutexGuard<'a, Inner>> {
        match deadline {
            None => signal.wait(state),
            Some(deadline) if Instant::now() >= deadline => Err(Error::Timeout),
            Some(deadline) => signal.wait_until(state, deadline),
        }
    }

    #[inline]
    fn check_item_len(&self, len: usize) -> Result<()> {
        if len != self.item_size {
            return Err(Error::InvalidArgument("buffer length doesn't match the item size"));
        }
        Ok(())
    }
}

impl fmt::Debug for BoundedQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("item_size", &self.item_size)
            .finish_non_exhaustive()
    }
}

// A deadline too far out to represent is the same as no deadline.
fn deadline_after(timeout: Option<Duration>) -> Option<Instant> {
    timeout.and_then(|timeout| Instant::now().checked_add(timeout))
}
