// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// A type with an intrinsic timestamp that orders it against other items.
///
/// Operators that read from several upstreams use the timestamp to decide
/// which of two simultaneously ready items happened first.
///
/// # Examples
///
/// ```
/// use sluice_core::HasTimestamp;
///
/// #[derive(Clone, Debug)]
/// struct Event {
///     data: String,
///     seq: u64,
/// }
///
/// impl HasTimestamp for Event {
///     type Timestamp = u64;
///
///     fn timestamp(&self) -> u64 {
///         self.seq
///     }
/// }
/// ```
pub trait HasTimestamp {
    /// The type representing the timestamp
    type Timestamp: Ord + Copy + Send + Sync + std::fmt::Debug;

    /// Returns the timestamp value for this item.
    fn timestamp(&self) -> Self::Timestamp;
}
