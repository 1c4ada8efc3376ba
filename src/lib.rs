#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

// loom integration
#[doc(hidden)]
macro_rules! cfg_loom {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "loom")]
            $item
        )*
    };
}
#[doc(hidden)]
macro_rules! cfg_not_loom {
    ($($item:item)*) => {
        $(
            #[cfg(not(feature = "loom"))]
            $item
        )*
    };
}

#[doc(hidden)]
mod sync;
//loom integration finished.

#[macro_use]
mod trace;

/// The error type shared by every queue operation.
pub mod error;
#[doc(inline)]
pub use error::{Error, Result};

/// Fixed-capacity blocking FIFO queues.
pub mod queue;
#[doc(inline)]
pub use queue::{BoundedQueue, Record, TypedQueue};

mod util;
