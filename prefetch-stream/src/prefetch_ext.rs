// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension trait exposing the [`prefetch`](PrefetchExt::prefetch) operator.
//!
//! # Lookahead depth
//!
//! One [`Prefetch`] adds exactly one item of lookahead. Deeper lookahead comes from
//! wrapping the adapter again; every layer keeps its own single request in flight
//! against the layer below, so the source still only ever sees one request at a
//! time. [`prefetch_depth`](PrefetchExt::prefetch_depth) does the wrapping for a
//! depth chosen at runtime.
//!
//! ```
//! use futures::{stream, StreamExt};
//! use prefetch_core::StreamItem;
//! use prefetch_stream::PrefetchExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let source = stream::iter(0..5).map(StreamItem::Value);
//!
//! // Same as `source.prefetch().prefetch().prefetch()`
//! let items: Vec<i32> = source
//!     .prefetch_depth(3)
//!     .map(StreamItem::unwrap)
//!     .collect()
//!     .await;
//!
//! assert_eq!(items, vec![0, 1, 2, 3, 4]);
//! # }
//! ```

use crate::prefetch::Prefetch;
use futures::stream::{BoxStream, Stream, StreamExt};
use prefetch_core::StreamItem;

/// Extension trait providing the prefetch operators.
///
/// Implemented for every `Send + 'static` stream of [`StreamItem<T>`].
pub trait PrefetchExt<T>: Stream<Item = StreamItem<T>> + Sized
where
    T: Send + 'static,
{
    /// Requests the next item from this stream while the current one is consumed.
    ///
    /// At most one request is outstanding at any time. The request for item *k+1*
    /// is issued before item *k* is returned, and runs in the background while the
    /// caller processes item *k*.
    ///
    /// # Errors
    ///
    /// Upstream errors are passed through on the pull that reads them and end the
    /// stream.
    ///
    /// # Panics
    ///
    /// With the default `runtime-tokio` feature, the returned stream must be
    /// polled inside a Tokio runtime: issuing a request that doesn't settle on its
    /// first poll spawns a Tokio task. See [`Prefetch`].
    fn prefetch(self) -> Prefetch<Self>;

    /// Composes `depth` independent [`Prefetch`] layers.
    ///
    /// `depth == 0` returns this stream unchanged (boxed).
    ///
    /// # Panics
    ///
    /// Same runtime requirement as [`prefetch`](PrefetchExt::prefetch).
    fn prefetch_depth(self, depth: usize) -> BoxStream<'static, StreamItem<T>>;
}

impl<S, T> PrefetchExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    fn prefetch(self) -> Prefetch<Self> {
        Prefetch::new(self)
    }

    fn prefetch_depth(self, depth: usize) -> BoxStream<'static, StreamItem<T>> {
        (0..depth).fold(self.boxed(), |stream, _| stream.prefetch().boxed())
    }
}
