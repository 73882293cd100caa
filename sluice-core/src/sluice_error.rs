// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the sluice reactive streaming library.
//!
//! [`SluiceError`] is carried in-band by [`StreamItem::Error`](crate::StreamItem).
//! Operators that combine several upstreams tag the error with the upstream it
//! came from, so a consumer of a gated switch can tell a failing gate from a
//! failing payload.
//!
//! # Examples
//!
//! ```
//! use sluice_core::{Result, SluiceError};
//!
//! fn process_data() -> Result<()> {
//!     Err(SluiceError::stream_error("Stream not ready"))
//! }
//! ```

/// Root error type for all sluice operations.
#[derive(Debug, thiserror::Error)]
pub enum SluiceError {
    /// Stream processing encountered an error
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Custom error from user code
    ///
    /// Wraps errors produced by user-provided callbacks so they can be
    /// propagated through the stream.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The gate source failed before it opened.
    #[error("Gate error: {0}")]
    Gate(#[source] Box<SluiceError>),

    /// The payload source failed.
    #[error("Payload error: {0}")]
    Payload(#[source] Box<SluiceError>),
}

impl SluiceError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Tag an upstream error as coming from the gate source.
    #[must_use]
    pub fn gate(self) -> Self {
        Self::Gate(Box::new(self))
    }

    /// Tag an upstream error as coming from the payload source.
    #[must_use]
    pub fn payload(self) -> Self {
        Self::Payload(Box::new(self))
    }

    /// Returns `true` if the error was raised by a gate source.
    #[must_use]
    pub const fn is_gate_error(&self) -> bool {
        matches!(self, Self::Gate(_))
    }

    /// Returns `true` if the error was raised by a payload source.
    #[must_use]
    pub const fn is_payload_error(&self) -> bool {
        matches!(self, Self::Payload(_))
    }

    /// Strips gate/payload tags, returning the error the upstream produced.
    ///
    /// Nested gated switches stack tags; this walks through all of them.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Gate(inner) | Self::Payload(inner) => inner.root_cause(),
            other => other,
        }
    }
}

/// Specialized Result type for sluice operations
pub type Result<T> = std::result::Result<T, SluiceError>;

/// Extension trait for converting foreign errors into `SluiceError`
pub trait IntoSluiceError {
    /// Convert this error into a `SluiceError`, prefixing it with `context`
    fn into_sluice_error(self, context: &str) -> SluiceError;

    /// Convert this error into a `SluiceError` without additional context
    fn into_sluice(self) -> SluiceError
    where
        Self: Sized;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoSluiceError for E {
    fn into_sluice_error(self, context: &str) -> SluiceError {
        if context.is_empty() {
            SluiceError::user_error(self)
        } else {
            SluiceError::stream_error(format!("{context}: {self}"))
        }
    }

    fn into_sluice(self) -> SluiceError {
        SluiceError::user_error(self)
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(SluiceError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(SluiceError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SluiceError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.with_context(|| context.into())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            SluiceError::UserError(inner) => SluiceError::StreamProcessingError {
                context: format!("{}: {inner}", f()),
            },
            other => other,
        })
    }
}

impl From<crate::SubjectError> for SluiceError {
    fn from(error: crate::SubjectError) -> Self {
        Self::user_error(error)
    }
}

impl Clone for SluiceError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            // The boxed user error can't be cloned, keep its message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
            Self::Gate(inner) => Self::Gate(inner.clone()),
            Self::Payload(inner) => Self::Payload(inner.clone()),
        }
    }
}
