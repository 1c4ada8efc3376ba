#[cfg(feature = "loom")]
mod loom;
#[cfg(feature = "loom")]
pub(crate) use loom::Signal;

#[cfg(not(feature = "loom"))]
mod real;
#[cfg(not(feature = "loom"))]
pub(crate) use real::Signal;
