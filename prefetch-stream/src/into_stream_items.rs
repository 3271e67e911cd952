// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Conversions from plain streams into [`StreamItem`] streams.
//!
//! Sources usually come in one of two shapes: a stream of plain values (a channel,
//! an iterator) or a stream of `Result`s (a paginated API client, a database
//! cursor). These adapters bring both into the `StreamItem` shape [`prefetch`]
//! expects.
//!
//! ```
//! use futures::{stream, StreamExt};
//! use prefetch_stream::{PrefetchExt, TryIntoStreamItems};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pages = stream::iter(vec![Ok(1), Err(std::io::Error::other("timeout")), Ok(3)]);
//! let mut prefetched = pages.try_into_stream_items().prefetch();
//!
//! assert_eq!(prefetched.next().await.unwrap().unwrap(), 1);
//! assert!(prefetched.next().await.unwrap().is_error());
//! assert!(prefetched.next().await.is_none());
//! # }
//! ```
//!
//! [`prefetch`]: crate::PrefetchExt::prefetch

use futures::stream::{Map, Stream, StreamExt};
use prefetch_core::{IntoPrefetchError, StreamItem};

/// Wraps every value of a plain stream in [`StreamItem::Value`].
pub trait IntoStreamItems: Stream + Sized {
    /// Convert into a stream of `StreamItem<Self::Item>`.
    fn into_stream_items(self) -> Map<Self, fn(Self::Item) -> StreamItem<Self::Item>> {
        self.map(StreamItem::Value as fn(Self::Item) -> StreamItem<Self::Item>)
    }
}

impl<S: Stream> IntoStreamItems for S {}

/// Converts a stream of `Result<T, E>` into a stream of [`StreamItem<T>`].
///
/// `Ok` becomes [`StreamItem::Value`]; `Err` becomes [`StreamItem::Error`] carrying
/// [`PrefetchError::UserError`](prefetch_core::PrefetchError::UserError).
pub trait TryIntoStreamItems<T, E>: Stream<Item = Result<T, E>> + Sized
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Convert into a stream of `StreamItem<T>`.
    fn try_into_stream_items(self) -> Map<Self, fn(Result<T, E>) -> StreamItem<T>> {
        self.map(into_stream_item::<T, E> as fn(Result<T, E>) -> StreamItem<T>)
    }
}

impl<S, T, E> TryIntoStreamItems<T, E> for S
where
    S: Stream<Item = Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
}

fn into_stream_item<T, E>(result: Result<T, E>) -> StreamItem<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    match result {
        Ok(value) => StreamItem::Value(value),
        Err(error) => StreamItem::Error(error.into_prefetch()),
    }
}
