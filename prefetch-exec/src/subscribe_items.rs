// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Page-in-then-write consumer for [`StreamItem`] streams.
//!
//! Unlike [`subscribe`](crate::SubscribeExt::subscribe), any failure ends the loop:
//! an upstream error means the source is done, and a failed write leaves nothing
//! sensible to continue with.

use crate::logging::{debug, warn};
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use prefetch_core::{CancellationToken, IntoPrefetchError, Result, StreamItem};
use std::error::Error;
use std::future::Future;

/// Extension trait for draining a `StreamItem` stream into an async handler.
#[async_trait]
pub trait SubscribeItemsExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Hands every value to `on_value`, one at a time, until the stream ends.
    ///
    /// # Errors
    ///
    /// - The first upstream [`StreamItem::Error`] is returned as-is.
    /// - A handler error is returned wrapped in [`PrefetchError::UserError`](prefetch_core::PrefetchError::UserError).
    ///
    /// Cancellation is not an error: the loop stops and returns `Ok(())`.
    async fn subscribe_items<F, Fut, E>(
        self,
        on_value: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Error + Send + Sync + 'static;
}

#[async_trait]
impl<S, T> SubscribeItemsExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    async fn subscribe_items<F, Fut, E>(
        self,
        on_value: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        let cancellation_token = cancellation_token.unwrap_or_default();
        let mut stream = Box::pin(self);

        while let Some(item) = stream.next().await {
            if cancellation_token.is_cancelled() {
                debug!("subscribe_items: cancelled, stopping");
                return Ok(());
            }

            match item {
                StreamItem::Value(value) => {
                    if let Err(error) = on_value(value, cancellation_token.clone()).await {
                        warn!("subscribe_items: handler failed: {}", error);
                        return Err(error.into_prefetch());
                    }
                }
                StreamItem::Error(error) => {
                    debug!("subscribe_items: upstream failure: {}", error);
                    return Err(error);
                }
            }
        }

        Ok(())
    }
}
