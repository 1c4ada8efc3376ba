use crate::error::{Error, Result};
use std::ops::Range;

/// Ring storage of a [`BoundedQueue`](super::BoundedQueue).
///
/// Not synchronised on its own, it always lives behind the queue's mutex.
/// Full/empty is decided by `len` alone; `head == tail` holds both when
/// empty and when full.
pub(super) struct Inner {
    buffer: Box<[u8]>,
    item_size: usize,
    capacity: usize,
    //index of the oldest item, meaningful only while len > 0
    head: usize,
    //index of the next free slot
    tail: usize,
    len: usize,
    pub(super) closed: bool,
}

impl Inner {
    pub(super) fn new(capacity: usize, item_size: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be greater than zero"));
        }
        if item_size == 0 {
            return Err(Error::InvalidArgument("item size must be greater than zero"));
        }

        let bytes = capacity
            .checked_mul(item_size)
            .ok_or(Error::ResourceExhausted(usize::MAX))?;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(bytes)
            .map_err(|_| Error::ResourceExhausted(bytes))?;
        buffer.resize(bytes, 0u8);

        Ok(Self {
            buffer: buffer.into_boxed_slice(),
            item_size,
            capacity,
            head: 0,
            tail: 0,
            len: 0,
            closed: false,
        })
    }

    /// Writes the next item in place through `write`.
    ///
    /// Returns `None` without calling `write` if the ring is full.
    pub(super) fn push_with<R>(&mut self, write: impl FnOnce(&mut [u8]) -> R) -> Option<R> {
        if self.is_full() {
            return None;
        }
        let slot = self.slot(self.tail);
        let ret = write(&mut self.buffer[slot]);
        self.tail = self.advance(self.tail);
        self.len += 1;
        Some(ret)
    }

    /// Hands the oldest item to `read` and releases its slot.
    ///
    /// Returns `None` without calling `read` if the ring is empty.
    pub(super) fn pop_with<R>(&mut self, read: impl FnOnce(&[u8]) -> R) -> Option<R> {
        if self.is_empty() {
            return None;
        }
        let slot = self.slot(self.head);
        let ret = read(&self.buffer[slot]);
        self.head = self.advance(self.head);
        self.len -= 1;
        Some(ret)
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(super) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(super) fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    #[inline]
    fn advance(&self, index: usize) -> usize {
        debug_assert!(index < self.capacity, "cursor out of range");
        if index + 1 == self.capacity {
            0
        } else {
            index + 1
        }
    }

    #[inline]
    fn slot(&self, index: usize) -> Range<usize> {
        let start = index * self.item_size;
        start..start + self.item_size
    }
}
