// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the sluice workspace.
//!
//! Not meant for production code.
//!
//! # Key Types
//!
//! ## `Sequenced<T>`
//!
//! Wraps a test value with a globally increasing sequence number, so the
//! order in which a test *creates* values is the order operators see them
//! when several upstreams are ready at once:
//!
//! ```rust
//! use sluice_test_utils::Sequenced;
//! use sluice_core::HasTimestamp;
//!
//! let first = Sequenced::new(1);
//! let second = Sequenced::new(2);
//! assert!(first.timestamp() < second.timestamp());
//! ```
//!
//! ## Fixtures
//!
//! [`Banana`](fruit::Banana) and [`Apple`](fruit::Apple) model the classic
//! "apples after the first banana" scenario; [`Fruit`](test_data::Fruit)
//! lets both travel through one stream.
//!
//! # Module Organization
//!
//! - `sequenced` - `Sequenced<T>` wrapper
//! - `fruit`, `test_data` - fixtures
//! - `helpers` - assertion and polling helpers

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod fruit;
pub mod helpers;
pub mod sequenced;
pub mod test_data;

use futures::{Stream, StreamExt};
use sluice_core::StreamItem;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use helpers::{
    assert_no_element_emitted, assert_stream_ended, collect_values, unwrap_stream, unwrap_value,
};
pub use sequenced::Sequenced;
pub use test_data::Fruit;

/// Creates a test channel that wraps every sent value in `StreamItem::Value`.
///
/// Dropping the sender completes the stream.
///
/// # Example
///
/// ```rust
/// use sluice_test_utils::{test_channel, Sequenced};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut stream) = test_channel();
///
/// tx.send(Sequenced::new(42)).unwrap();
///
/// let item = stream.next().await.unwrap().unwrap();
/// assert_eq!(item.value, 42);
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>`, for sending errors.
///
/// # Example
///
/// ```rust
/// use sluice_test_utils::test_channel_with_errors;
/// use sluice_core::{SluiceError, StreamItem};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut stream) = test_channel_with_errors::<i32>();
///
/// tx.send(StreamItem::Value(42)).unwrap();
/// tx.send(StreamItem::Error(SluiceError::stream_error("test error"))).unwrap();
///
/// assert!(stream.next().await.unwrap().is_value());
/// assert!(stream.next().await.unwrap().is_error());
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
