// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension methods for tokio `UnboundedReceiver` to feed a prefetching pipeline.

use futures::stream::{Stream, StreamExt};
use prefetch_core::StreamItem;
use prefetch_stream::{Prefetch, PrefetchExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Extension trait for `UnboundedReceiver` to create `StreamItem` streams.
pub trait UnboundedReceiverExt<T> {
    /// Converts the receiver into a stream of [`StreamItem::Value`]s.
    ///
    /// The stream ends once every sender has been dropped.
    fn into_item_stream(self) -> impl Stream<Item = StreamItem<T>> + Send + 'static;

    /// Converts the receiver into a prefetching stream, mapping every message
    /// with `mapper`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use prefetch_rx::prelude::*;
    /// use futures::StreamExt;
    /// use tokio::sync::mpsc;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let (tx, rx) = mpsc::unbounded_channel::<u32>();
    /// let mut pages = rx.prefetch_map(|n| format!("page {n}"));
    ///
    /// tx.send(1).unwrap();
    /// assert_eq!(pages.next().await.unwrap().unwrap(), "page 1");
    /// # }
    /// ```
    fn prefetch_map<U, F>(
        self,
        mapper: F,
    ) -> Prefetch<futures::stream::BoxStream<'static, StreamItem<U>>>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static;
}

impl<T: Send + 'static> UnboundedReceiverExt<T> for UnboundedReceiver<T> {
    fn into_item_stream(self) -> impl Stream<Item = StreamItem<T>> + Send + 'static {
        UnboundedReceiverStream::new(self).map(StreamItem::Value)
    }

    fn prefetch_map<U, F>(
        self,
        mut mapper: F,
    ) -> Prefetch<futures::stream::BoxStream<'static, StreamItem<U>>>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        UnboundedReceiverStream::new(self)
            .map(move |value| StreamItem::Value(mapper(value)))
            .boxed()
            .prefetch()
    }
}
