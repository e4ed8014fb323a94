//! Structured logging that compiles away unless the `tracing` feature is on.
//!
//! With the feature enabled the macros are `tracing`'s own. Without it they
//! expand to nothing, so forking and racing tasks costs no logging overhead.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {debug, trace};
