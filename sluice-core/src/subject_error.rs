// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Errors specific to subject lifecycle operations.
///
/// Distinct from [`SluiceError`](crate::SluiceError), which travels in-band
/// through streams.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// The subject has been closed and cannot accept new items or subscribers.
    #[error("Subject is closed")]
    Closed,
}
