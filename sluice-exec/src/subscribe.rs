// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use core::future::Future;
use futures::future::{select, Either};
use futures::stream::{Stream, StreamExt};
use sluice_core::{CancellationToken, Result, StreamItem};

/// Extension trait providing in-place async subscription for streams.
#[async_trait]
pub trait SubscribeExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Consumes the stream, running `on_next_func` for every value in order.
    ///
    /// Each handler call completes before the next value is pulled.
    ///
    /// # Behavior
    ///
    /// - Ends with `Ok(())` when the stream completes or the token is cancelled,
    ///   including while waiting for the next item; the stream is dropped first
    /// - Ends with `Err(..)` carrying the stream's error if it emits one
    /// - Handler failures go to `on_error_callback` and do not end the subscription
    ///
    /// # Arguments
    ///
    /// * `on_next_func` - Async function called for each value, receiving the
    ///   subscription's cancellation token.
    /// * `on_error_callback` - Called with every error returned by `on_next_func`.
    /// * `cancellation_token` - Optional token to stop processing. A fresh one
    ///   that is never cancelled is used if `None`.
    ///
    /// # Errors
    ///
    /// Returns the `SluiceError` emitted by the stream, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_core::StreamItem;
    /// use sluice_exec::SubscribeExt;
    /// use futures::stream;
    /// use std::sync::{Arc, Mutex};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = seen.clone();
    ///
    /// stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)])
    ///     .subscribe(
    ///         move |value, _token| {
    ///             let sink = sink.clone();
    ///             async move {
    ///                 sink.lock().unwrap().push(value);
    ///                 Ok::<(), std::io::Error>(())
    ///             }
    ///         },
    ///         |_error| {},
    ///         None,
    ///     )
    ///     .await
    ///     .unwrap();
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    /// # }
    /// ```
    async fn subscribe<F, Fut, E, OnError>(
        self,
        on_next_func: F,
        on_error_callback: OnError,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Send + Sync + 'static,
        T: Send + 'static,
        E: Send + 'static;
}

#[async_trait]
impl<S, T> SubscribeExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    async fn subscribe<F, Fut, E, OnError>(
        self,
        on_next_func: F,
        on_error_callback: OnError,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Send + Sync + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let cancellation_token = cancellation_token.unwrap_or_default();
        let mut stream = Box::pin(self);

        loop {
            // Biased towards cancellation so an idle stream is released promptly.
            let item = match select(cancellation_token.cancelled(), stream.next()).await {
                Either::Left(((), _)) => {
                    debug!("subscription cancelled");
                    break;
                }
                Either::Right((Some(item), _)) => item,
                Either::Right((None, _)) => break,
            };

            match item {
                StreamItem::Value(value) => {
                    if let Err(error) = on_next_func(value, cancellation_token.clone()).await {
                        on_error_callback(error);
                    }
                }
                StreamItem::Error(error) => {
                    debug!(%error, "subscription ended with error");
                    return Err(error);
                }
            }
        }

        drop(stream);
        Ok(())
    }
}
