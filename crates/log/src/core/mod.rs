//! Core components shared by the whole crate.
//!
//! ### [`error`] - Error handling
//! [`LogError`] covers configuration, sink I/O and unsupported operations.
//!
//! ### [`result`] - Result types
//! [`LogResult`] plus extension traits that route non-fatal failures to the
//! diagnostic channel.

pub mod error;
pub mod result;

// Re-export core types
pub use error::{ComponentKind, LogError, LogResult};
pub use result::{DIAGNOSTIC_TARGET, LogIoResultExt, LogResultExt, report};
