// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{StreamItem, SubjectError};
use futures::Stream;

/// A producer that can be subscribed to any number of times.
///
/// Each call to [`subscribe`](EventSource::subscribe) attaches one independent
/// subscriber. The returned stream yields `StreamItem<T>` and ends on
/// completion; an in-band `StreamItem::Error` signals failure. Dropping the
/// stream detaches the subscriber.
///
/// Hot sources such as [`SluiceSubject`](crate::SluiceSubject) deliver only
/// items sent after subscription. Cold sources build fresh state per
/// subscriber.
pub trait EventSource<T> {
    /// The stream handed to each subscriber.
    type Stream: Stream<Item = StreamItem<T>>;

    /// Attach a new subscriber.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the source no longer accepts subscribers.
    fn subscribe(&self) -> Result<Self::Stream, SubjectError>;
}
