// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subject.
//!
//! A [`SluiceSubject`] broadcasts each [`StreamItem<T>`] to all active subscribers.
//!
//! ## Characteristics
//!
//! - **Hot**: Late subscribers do not receive past items, only items sent after subscribing.
//! - **Unbounded**: Uses unbounded mpsc channels internally (no backpressure).
//! - **Thread-safe**: Cheap to clone; all clones share the same internal state.
//! - **Error/close**: Errors are propagated to all subscribers and terminate the subject.
//!
//! ## Example
//!
//! ```
//! use sluice_core::{SluiceSubject, StreamItem};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = SluiceSubject::<i32>::new();
//!
//! let mut stream = subject.subscribe().unwrap();
//!
//! subject.send(StreamItem::Value(1)).unwrap();
//! subject.send(StreamItem::Value(2)).unwrap();
//! subject.close();
//!
//! assert_eq!(stream.next().await, Some(StreamItem::Value(1)));
//! assert_eq!(stream.next().await, Some(StreamItem::Value(2)));
//! assert_eq!(stream.next().await, None);
//! # }
//! ```

use crate::{EventSource, SluiceError, StreamItem, SubjectError};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::stream::FusedStream;
use futures::Stream;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

struct SubjectState<T> {
    closed: bool,
    senders: Vec<UnboundedSender<StreamItem<T>>>,
}

/// The receiving end of one subject subscription.
///
/// Dropping it detaches the subscriber; the subject stops counting it
/// immediately.
#[derive(Debug)]
pub struct SubjectStream<T> {
    rx: UnboundedReceiver<StreamItem<T>>,
}

impl<T> Stream for SubjectStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl<T> FusedStream for SubjectStream<T> {
    fn is_terminated(&self) -> bool {
        self.rx.is_terminated()
    }
}

/// A hot, unbounded subject that broadcasts items to all current subscribers.
///
/// `SluiceSubject` is the entry point for pushing values into a pipeline and
/// the reference [`EventSource`] implementation.
///
/// See the [module documentation](self) for examples.
pub struct SluiceSubject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone> SluiceSubject<T> {
    /// Creates a new open subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe to this subject and receive a stream of `StreamItem<T>`.
    /// Late subscribers do not receive previously sent items.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn subscribe(&self) -> Result<SubjectStream<T>, SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        state.senders.push(tx);
        trace!(subscribers = state.senders.len(), "subject subscribed");
        Ok(SubjectStream { rx })
    }

    /// Send an item to all active subscribers.
    ///
    /// Subscribers whose stream has been dropped are pruned.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn send(&self, item: StreamItem<T>) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        state
            .senders
            .retain(|tx| tx.unbounded_send(item.clone()).is_ok());
        Ok(())
    }

    /// Send a value to all active subscribers.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        self.send(StreamItem::Value(value))
    }

    /// Send an error to all subscribers and terminate the subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject was already closed.
    pub fn error(&self, err: SluiceError) -> Result<(), SubjectError> {
        let result = self.send(StreamItem::Error(err));
        self.close();
        result
    }

    /// Closes the subject, completing all subscriber streams.
    ///
    /// After closing, existing subscribers see the end of their stream and
    /// `send()`, `error()` and `subscribe()` return `SubjectError::Closed`.
    /// Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if !state.closed {
            debug!(subscribers = state.senders.len(), "subject closed");
        }
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` if the subject has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of currently attached subscribers.
    ///
    /// Subscribers whose stream has been dropped are not counted.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.state.lock();
        state.senders.retain(|tx| !tx.is_closed());
        state.senders.len()
    }
}

impl<T: Clone> Default for SluiceSubject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SluiceSubject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone> EventSource<T> for SluiceSubject<T> {
    type Stream = SubjectStream<T>;

    fn subscribe(&self) -> Result<Self::Stream, SubjectError> {
        Self::subscribe(self)
    }
}
