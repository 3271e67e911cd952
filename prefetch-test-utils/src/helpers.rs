// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{Stream, StreamExt};
use prefetch_core::StreamItem;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Waits up to `timeout_ms` for the next item and returns it.
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
        Ok(None) => panic!("expected an item, but the stream ended"),
        Err(_) => panic!("timed out after {timeout_ms}ms waiting for an item"),
    }
}

/// Like [`unwrap_stream`], additionally panicking if the item is an error.
pub async fn unwrap_value<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    unwrap_stream(stream, timeout_ms)
        .await
        .expect("expected a value, got an error")
}

/// Asserts the stream ends (yields `None`) within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("expected the stream to end, but it emitted an item"),
        Err(_) => panic!("timed out after {timeout_ms}ms waiting for the stream to end"),
    }
}

/// Asserts nothing is emitted for `timeout_ms`.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _ = stream.next() => {
            panic!("unexpected emission, expected no output");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}
