// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{Stream, StreamExt};
use sluice_core::StreamItem;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Asserts that `stream` yields nothing within `timeout_ms`.
///
/// # Panics
///
/// Panics if the stream emits an item or ends.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected item or end of stream, expected no output.");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Asserts that `stream` ends within `timeout_ms` without emitting anything else.
///
/// # Panics
///
/// Panics if the stream emits an item or is still open after the timeout.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("Expected stream to end, but it emitted an item"),
        Err(_) => panic!("Expected stream to end within {timeout_ms}ms, but it is still open"),
    }
}

/// Waits up to `timeout_ms` for the next item of `stream`.
///
/// # Panics
///
/// Panics if the stream ends or nothing arrives in time.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected an item, but the stream ended"),
        Err(_) => panic!("Expected an item within {timeout_ms}ms, but none arrived"),
    }
}

/// Extracts the value of an item returned by [`unwrap_stream`].
///
/// # Panics
///
/// Panics on `None` or on `StreamItem::Error`.
pub fn unwrap_value<T>(item: Option<StreamItem<T>>) -> T {
    match item {
        Some(StreamItem::Value(value)) => value,
        Some(StreamItem::Error(error)) => panic!("Expected a value, got error: {error}"),
        None => panic!("Expected a value, got nothing"),
    }
}

/// Collects every value until the stream ends, failing on errors or timeout.
///
/// # Panics
///
/// Panics if the stream emits an error or does not end within `timeout_ms`.
pub async fn collect_values<S, T>(stream: &mut S, timeout_ms: u64) -> Vec<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    let mut values = Vec::new();
    loop {
        match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
            Ok(Some(StreamItem::Value(value))) => values.push(value),
            Ok(Some(StreamItem::Error(error))) => panic!("Unexpected error: {error}"),
            Ok(None) => return values,
            Err(_) => panic!("Stream did not end within {timeout_ms}ms"),
        }
    }
}
