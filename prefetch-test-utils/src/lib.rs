// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the prefetch workspace.
//!
//! Development and testing only, not for production code.
//!
//! # Timing harness
//!
//! Prefetching is a pure timing transform, so most tests assert on *when* things
//! happen rather than on values. A [`Timeline`] records the interleaving of
//! source requests and consumer work:
//!
//! - [`paced_source`] records `Request(i)` when it starts item *i*, waits, records
//!   `Produce(i)` and yields `i`.
//! - [`failing_source`] does the same but fails at a chosen index and ends;
//!   [`flaky_source`] fails at a chosen index and keeps answering.
//! - [`consume_with`] drains a stream, recording `Consume(i)` and `Finish(i)`
//!   around a per-item delay.
//!
//! Run these under `tokio::time::pause()` so the recorded order is deterministic.
//!
//! ```rust
//! use prefetch_test_utils::{consume_with, paced_source, Event, Timeline};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let timeline = Timeline::new();
//! let source = paced_source(2, Duration::from_millis(1), &timeline);
//!
//! consume_with(Box::pin(source), Duration::from_millis(1), &timeline).await;
//!
//! assert_eq!(
//!     timeline.events(),
//!     vec![
//!         Event::Request(0),
//!         Event::Produce(0),
//!         Event::Consume(0),
//!         Event::Finish(0),
//!         Event::Request(1),
//!         Event::Produce(1),
//!         Event::Consume(1),
//!         Event::Finish(1),
//!     ]
//! );
//! # }
//! ```
//!
//! # Channels
//!
//! [`test_channel`] and [`test_channel_with_errors`] give tests an imperative
//! handle to push items into a `StreamItem` stream.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod sources;
pub mod test_data;
pub mod timeline;

use futures::{Stream, StreamExt};
use prefetch_core::StreamItem;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use helpers::{assert_no_element_emitted, assert_stream_ended, unwrap_stream, unwrap_value};
pub use sources::{consume_with, failing_source, flaky_source, paced_source, RequestFailed};
pub use test_data::Page;
pub use timeline::{Event, Timeline};

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
///
/// # Example
///
/// ```rust
/// use prefetch_test_utils::test_channel;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel();
/// tx.send(42).unwrap();
///
/// let item = stream.next().await.unwrap().unwrap(); // Option -> StreamItem -> Value
/// assert_eq!(item, 42);
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>` for testing error propagation.
///
/// # Example
///
/// ```rust
/// use prefetch_test_utils::test_channel_with_errors;
/// use prefetch_core::{PrefetchError, StreamItem};
///
/// # async fn example() {
/// let (tx, stream) = test_channel_with_errors::<u32>();
///
/// tx.send(StreamItem::Value(42)).unwrap();
/// tx.send(StreamItem::Error(PrefetchError::stream_error("test error"))).unwrap();
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
