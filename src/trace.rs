// Queue events are compiled in only with the `trace` feature.
#[cfg(feature = "trace")]
macro_rules! fifo_trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "trace"))]
macro_rules! fifo_trace {
    ($($arg:tt)*) => {};
}
