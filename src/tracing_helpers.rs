//! Logging macros that cost nothing unless the `tracing` feature is enabled.
//!
//! With the feature on they forward to the `tracing` crate. The crate never
//! installs a subscriber itself; events only show up once the application
//! sets one up (for example with `tracing-subscriber`), filtered on the
//! `avlg_tree` target.
//!
//! Without it they expand to nothing and their arguments are not evaluated.

#![allow(unused_macros, unused_imports)]

/// Trace-level event, used for per-rotation detail.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level event, used for construction and bulk operations.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

/// Warn-level event, used when an argument is rejected.
#[cfg(feature = "tracing")]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
pub(crate) use warn_log;
