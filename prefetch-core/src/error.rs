// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the prefetch crates.
//!
//! Upstream sources report failures as [`StreamItem::Error`](crate::StreamItem::Error)
//! carrying a [`PrefetchError`]. The adapters never inspect or recover from these
//! errors; they pass them through unchanged and terminate the sequence.
//!
//! # Examples
//!
//! ```
//! use prefetch_core::{PrefetchError, Result};
//!
//! fn load_page() -> Result<Vec<u8>> {
//!     Err(PrefetchError::stream_error("page 3 unavailable"))
//! }
//! ```

/// Root error type for all prefetch operations.
#[derive(Debug, thiserror::Error)]
pub enum PrefetchError {
    /// The upstream source reported a failure.
    ///
    /// This is the general error for source failures that don't carry
    /// a typed error of their own.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong upstream
        context: String,
    },

    /// Custom error from user code
    ///
    /// Wraps the error type of a user-provided source or handler so it can
    /// travel through a `StreamItem` stream.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An upstream request was abandoned before it produced a result.
    ///
    /// Emitted when the background task driving a request disappears without
    /// delivering the source's answer, typically because the source panicked.
    #[error("Request aborted: {context}")]
    RequestAborted {
        /// Which request was lost
        context: String,
    },

    /// Multiple errors occurred
    ///
    /// Returned by consumers that collect handler failures instead of
    /// reporting them one by one.
    #[error("Multiple errors occurred: {count} errors")]
    MultipleErrors {
        /// Number of errors that occurred
        count: usize,
        /// The individual errors
        errors: Vec<PrefetchError>,
    },
}

impl PrefetchError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create a request-aborted error with the given context
    pub fn request_aborted(context: impl Into<String>) -> Self {
        Self::RequestAborted {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Aggregate multiple user errors into a `MultipleErrors` variant
    ///
    /// # Examples
    ///
    /// ```
    /// use prefetch_core::PrefetchError;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("write failed: {0}")]
    /// struct WriteError(u32);
    ///
    /// let result = PrefetchError::from_user_errors(vec![WriteError(1), WriteError(2)]);
    /// assert!(matches!(result, PrefetchError::MultipleErrors { count: 2, .. }));
    /// ```
    pub fn from_user_errors<E>(errors: Vec<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let count = errors.len();
        let errors = errors
            .into_iter()
            .map(|e| Self::UserError(Box::new(e)))
            .collect();

        Self::MultipleErrors { count, errors }
    }

    /// Check if this error indicates a permanent failure
    ///
    /// Nothing in this crate retries, so only an aborted request is considered
    /// transient: the source itself may still be healthy.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        !matches!(self, Self::RequestAborted { .. })
    }
}

/// Specialized Result type for prefetch operations
pub type Result<T> = std::result::Result<T, PrefetchError>;

/// Extension trait for converting errors into `PrefetchError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`.
pub trait IntoPrefetchError {
    /// Convert this error into a `PrefetchError` with additional context
    fn into_prefetch_error(self, context: &str) -> PrefetchError;

    /// Convert this error into a `PrefetchError` without additional context
    fn into_prefetch(self) -> PrefetchError
    where
        Self: Sized,
    {
        self.into_prefetch_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoPrefetchError for E {
    fn into_prefetch_error(self, context: &str) -> PrefetchError {
        if context.is_empty() {
            PrefetchError::user_error(self)
        } else {
            PrefetchError::stream_error(format!("{context}: {self}"))
        }
    }
}

impl Clone for PrefetchError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            // The boxed error can't be cloned, keep its rendered message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
            Self::RequestAborted { context } => Self::RequestAborted {
                context: context.clone(),
            },
            Self::MultipleErrors { count, errors } => Self::MultipleErrors {
                count: *count,
                errors: errors.clone(),
            },
        }
    }
}
