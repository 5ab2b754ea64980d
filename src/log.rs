//! Feature-gated logging macros.
//!
//! With the `tracing` feature these are the real `tracing` macros; without
//! it they expand to nothing, so traversal instrumentation costs zero in
//! release builds of consumers that never asked for logs.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
