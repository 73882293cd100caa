// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Spawned subscriptions with an explicit cancellation handle.
//!
//! [`SinkExt::sink`] drives a stream on the tokio runtime, delivering each
//! value to one callback and exactly one [`Completion`] to another. The
//! returned [`Subscription`] owns the cancellation capability.
//!
//! # Example
//!
//! ```
//! use sluice_core::{SluiceSubject, StreamItem};
//! use sluice_exec::{Completion, SinkExt};
//! use std::sync::{Arc, Mutex};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = SluiceSubject::<i32>::new();
//! let received = Arc::new(Mutex::new(Vec::new()));
//! let completion = Arc::new(Mutex::new(None));
//!
//! let subscription = subject.subscribe().unwrap().sink(
//!     {
//!         let received = received.clone();
//!         move |value| received.lock().unwrap().push(value)
//!     },
//!     {
//!         let completion = completion.clone();
//!         move |done| *completion.lock().unwrap() = Some(done)
//!     },
//! );
//!
//! subject.next(7).unwrap();
//! subject.close();
//! subscription.join().await.unwrap();
//!
//! assert_eq!(*received.lock().unwrap(), vec![7]);
//! assert!(matches!(*completion.lock().unwrap(), Some(Completion::Finished)));
//! # }
//! ```

use core::sync::atomic::{AtomicU8, Ordering};
use futures::stream::{Stream, StreamExt};
use sluice_core::{CancellationToken, Result, SluiceError, StreamItem};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The terminal signal of a subscription.
#[derive(Debug, Clone)]
pub enum Completion {
    /// The stream completed, possibly without emitting any value.
    Finished,
    /// The stream emitted an error.
    Failed(SluiceError),
}

impl Completion {
    /// Returns `true` for [`Completion::Finished`].
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Returns the error of a failed completion.
    #[must_use]
    pub const fn error(&self) -> Option<&SluiceError> {
        match self {
            Self::Finished => None,
            Self::Failed(error) => Some(error),
        }
    }
}

const ACTIVE: u8 = 0;
const CANCELLED: u8 = 1;
const COMPLETED: u8 = 2;

/// Which terminal outcome claimed the subscription. Moves out of `ACTIVE` once.
#[derive(Debug)]
struct Outcome(AtomicU8);

impl Outcome {
    const fn new() -> Self {
        Self(AtomicU8::new(ACTIVE))
    }

    fn claim(&self, outcome: u8) -> bool {
        self.0
            .compare_exchange(ACTIVE, outcome, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn is(&self, outcome: u8) -> bool {
        self.0.load(Ordering::Acquire) == outcome
    }
}

/// One active attachment between a consumer and a stream.
///
/// Its lifetime ends on [`cancel`](Subscription::cancel), when the stream
/// completes, or when the stream fails. Dropping the handle cancels it.
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
    outcome: Arc<Outcome>,
    driver: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stops delivery and releases the stream.
    ///
    /// Returns `true` if this call cancelled the subscription. In that case
    /// no completion is ever delivered. Cancelling again, or after the
    /// completion has been claimed, has no effect and returns `false`.
    pub fn cancel(&self) -> bool {
        let cancelled = self.outcome.claim(CANCELLED);
        if cancelled {
            self.token.cancel();
            debug!("subscription cancelled");
        }
        cancelled
    }

    /// Returns `true` if [`cancel`](Self::cancel) won against completion.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.outcome.is(CANCELLED)
    }

    /// Returns `true` once the stream terminated and its completion was
    /// handed to the callback.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.outcome.is(COMPLETED)
    }

    /// Waits for the driver task to exit.
    ///
    /// The stream has been dropped, and with it every upstream it held, by
    /// the time this returns.
    ///
    /// # Errors
    ///
    /// Returns a stream processing error if a callback panicked.
    pub async fn join(mut self) -> Result<()> {
        match self.driver.take() {
            Some(driver) => driver
                .await
                .map_err(|error| SluiceError::stream_error(format!("subscription driver failed: {error}"))),
            None => Ok(()),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.driver.is_some() {
            self.cancel();
        }
    }
}

/// Extension trait spawning a [`Subscription`] for a stream.
pub trait SinkExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Spawns a task that feeds every value to `on_value` and the terminal
    /// signal to `on_completion`.
    ///
    /// `on_completion` runs at most once and nothing is delivered after it.
    /// Must be called from within a tokio runtime.
    fn sink<OnValue, OnCompletion>(self, on_value: OnValue, on_completion: OnCompletion) -> Subscription
    where
        OnValue: FnMut(T) + Send + 'static,
        OnCompletion: FnOnce(Completion) + Send + 'static;
}

impl<S, T> SinkExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    fn sink<OnValue, OnCompletion>(self, mut on_value: OnValue, on_completion: OnCompletion) -> Subscription
    where
        OnValue: FnMut(T) + Send + 'static,
        OnCompletion: FnOnce(Completion) + Send + 'static,
    {
        let token = CancellationToken::new();
        let outcome = Arc::new(Outcome::new());

        let driver = tokio::spawn({
            let token = token.clone();
            let outcome = Arc::clone(&outcome);
            async move {
                let mut stream = Box::pin(self);

                let completion = loop {
                    let next = tokio::select! {
                        biased;
                        () = token.cancelled() => {
                            trace!("subscription driver stopped by cancellation");
                            return;
                        }
                        next = stream.next() => next,
                    };

                    match next {
                        Some(StreamItem::Value(value)) => on_value(value),
                        Some(StreamItem::Error(error)) => break Completion::Failed(error),
                        None => break Completion::Finished,
                    }
                };

                // Release upstreams before reporting the terminal signal.
                drop(stream);

                if !outcome.claim(COMPLETED) {
                    trace!("completion dropped, subscription was cancelled");
                    return;
                }

                debug!(finished = completion.is_finished(), "subscription completed");
                on_completion(completion);
            }
        });

        Subscription {
            token,
            outcome,
            driver: Some(driver),
        }
    }
}
