//! Core error types

use thiserror::Error;

/// Errors raised by the core runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The receiving side of a dispatcher has been dropped
    #[error("dispatch queue closed")]
    DispatcherClosed,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
