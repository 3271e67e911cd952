// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::{debug, warn};
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use prefetch_core::{CancellationToken, PrefetchError, Result};
use std::error::Error;
use std::future::Future;

/// Extension trait providing sequential async subscription for streams.
#[async_trait]
pub trait SubscribeExt<T>: Stream<Item = T> + Sized {
    /// Subscribes to the stream with an async handler, processing items sequentially.
    ///
    /// Each item's handler runs to completion before the next item is pulled, so a
    /// prefetching stream underneath loads the next item while the handler works.
    ///
    /// # Behavior
    ///
    /// - Continues until the stream ends or `cancellation_token` is cancelled
    /// - The token is checked before each item is handed to the handler
    /// - Handler errors go to `on_error_callback` if provided; otherwise they are
    ///   collected and returned on completion
    ///
    /// # Arguments
    ///
    /// * `on_next_func` - Async function called for each item. Receives the item and
    ///   a clone of the cancellation token.
    /// * `on_error_callback` - Optional error handler. If `None`, errors are collected.
    /// * `cancellation_token` - Optional token to stop processing. If `None`, a token
    ///   that never cancels is used.
    ///
    /// # Errors
    ///
    /// Returns [`PrefetchError::MultipleErrors`] if any handler call failed and no
    /// error callback was provided.
    ///
    /// # Example
    ///
    /// ```
    /// use futures::stream;
    /// use prefetch_exec::SubscribeExt;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> prefetch_core::Result<()> {
    /// stream::iter(vec![1, 2, 3])
    ///     .subscribe(
    ///         |item, _token| async move {
    ///             assert!(item > 0);
    ///             Ok::<(), std::io::Error>(())
    ///         },
    ///         None::<fn(std::io::Error)>,
    ///         None,
    ///     )
    ///     .await
    /// # }
    /// ```
    async fn subscribe<F, Fut, E, OnError>(
        self,
        on_next_func: F,
        on_error_callback: Option<OnError>,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Send + Sync + 'static,
        E: Error + Send + Sync + 'static;
}

#[async_trait]
impl<S, T> SubscribeExt<T> for S
where
    S: Stream<Item = T> + Send + 'static,
    T: Send + 'static,
{
    async fn subscribe<F, Fut, E, OnError>(
        self,
        on_next_func: F,
        on_error_callback: Option<OnError>,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Send + Sync + 'static,
        E: Error + Send + Sync + 'static,
    {
        let cancellation_token = cancellation_token.unwrap_or_default();
        let mut stream = Box::pin(self);
        let mut collected_errors = Vec::new();

        while let Some(item) = stream.next().await {
            if cancellation_token.is_cancelled() {
                debug!("subscribe: cancelled, stopping");
                break;
            }

            if let Err(error) = on_next_func(item, cancellation_token.clone()).await {
                warn!("subscribe: handler failed: {}", error);
                match &on_error_callback {
                    Some(on_error_callback) => on_error_callback(error),
                    None => collected_errors.push(error),
                }
            }
        }

        if collected_errors.is_empty() {
            Ok(())
        } else {
            Err(PrefetchError::from_user_errors(collected_errors))
        }
    }
}
