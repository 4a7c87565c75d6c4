//! Global error handling for collectfs
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

/// Global error type for collectfs operations
#[derive(Error, Debug)]
pub enum CollectFsError {
    /// A configuration storage location could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration resolution reached an invalid state
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more glob patterns failed to compile
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Specialized Result type for collectfs operations
pub type Result<T> = std::result::Result<T, CollectFsError>;

/// Creates a CollectFsError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CollectFsError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
