use super::BoundedQueue;
use crate::error::Result;
use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;
use std::time::Duration;

/// A fixed-size value that can be copied byte for byte through a queue.
///
/// `write_bytes` and `read_bytes` are always handed exactly [`SIZE`](Record::SIZE)
/// bytes, and `read_bytes` must rebuild the value `write_bytes` wrote.
pub trait Record: Sized {
    /// Encoded size in bytes. Must not be zero.
    const SIZE: usize;

    /// Encodes `self` into `slot`.
    fn write_bytes(&self, slot: &mut [u8]);

    /// Decodes a value from `slot`.
    fn read_bytes(slot: &[u8]) -> Self;
}

macro_rules! impl_record_for_primitives {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                const SIZE: usize = size_of::<$ty>();

                #[inline]
                fn write_bytes(&self, slot: &mut [u8]) {
                    slot.copy_from_slice(&self.to_ne_bytes());
                }

                #[inline]
                fn read_bytes(slot: &[u8]) -> Self {
                    let mut bytes = [0u8; size_of::<$ty>()];
                    bytes.copy_from_slice(slot);
                    <$ty>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

impl_record_for_primitives!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl<const N: usize> Record for [u8; N] {
    const SIZE: usize = N;

    #[inline]
    fn write_bytes(&self, slot: &mut [u8]) {
        slot.copy_from_slice(self);
    }

    #[inline]
    fn read_bytes(slot: &[u8]) -> Self {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(slot);
        bytes
    }
}

/// A [`BoundedQueue`] carrying values of one [`Record`] type.
///
/// Values are encoded straight into the ring slot while the lock is held,
/// so sending and receiving don't allocate.
///
/// # Example
///
/// ```
/// use bounded_fifo::TypedQueue;
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(TypedQueue::<u64>::new(8)?);
/// let producer = {
///     let queue = queue.clone();
///     thread::spawn(move || {
///         for i in 0..4u64 {
///             queue.send(&i).unwrap();
///         }
///     })
/// };
///
/// for i in 0..4u64 {
///     assert_eq!(queue.receive(None)?, i);
/// }
/// producer.join().unwrap();
/// # Ok::<(), bounded_fifo::Error>(())
/// ```
pub struct TypedQueue<T> {
    raw: BoundedQueue,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T: Record> TypedQueue<T> {
    /// Creates a queue holding at most `capacity` values.
    ///
    /// # Errors
    ///
    /// Same as [`BoundedQueue::new`] with an item size of `T::SIZE`.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            raw: BoundedQueue::new(capacity, T::SIZE)?,
            _marker: PhantomData,
        })
    }

    /// Sends `item` without blocking. See [`BoundedQueue::send`].
    #[inline]
    pub fn send(&self, item: &T) -> Result<()> {
        self.raw.send_with(|slot| item.write_bytes(slot))
    }

    /// Sends `item`, waiting for room. See [`BoundedQueue::send_timeout`].
    #[inline]
    pub fn send_timeout(&self, item: &T, timeout: Option<Duration>) -> Result<()> {
        self.raw.send_timeout_with(timeout, |slot| item.write_bytes(slot))
    }

    /// Receives the oldest value. See [`BoundedQueue::receive`].
    #[inline]
    pub fn receive(&self, timeout: Option<Duration>) -> Result<T> {
        self.raw.receive_with(timeout, T::read_bytes)
    }

    /// Receives the oldest value without blocking. See [`BoundedQueue::try_receive`].
    #[inline]
    pub fn try_receive(&self) -> Result<T> {
        self.receive(Some(Duration::ZERO))
    }

    /// See [`BoundedQueue::close`].
    #[inline]
    pub fn close(&self) -> Result<()> {
        self.raw.close()
    }

    /// See [`BoundedQueue::is_closed`].
    #[inline]
    pub fn is_closed(&self) -> Result<bool> {
        self.raw.is_closed()
    }

    /// See [`BoundedQueue::len`].
    #[inline]
    pub fn len(&self) -> Result<usize> {
        self.raw.len()
    }

    /// See [`BoundedQueue::is_empty`].
    #[inline]
    pub fn is_empty(&self) -> Result<bool> {
        self.raw.is_empty()
    }

    /// See [`BoundedQueue::is_full`].
    #[inline]
    pub fn is_full(&self) -> Result<bool> {
        self.raw.is_full()
    }

    /// The maximum number of values the queue holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Borrows the underlying byte queue.
    #[inline]
    pub fn as_bytes(&self) -> &BoundedQueue {
        &self.raw
    }

    /// See [`BoundedQueue::destroy`].
    pub fn destroy(self) -> Result<()> {
        self.raw.destroy()
    }
}

impl<T> fmt::Debug for TypedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedQueue").field(&self.raw).finish()
    }
}
