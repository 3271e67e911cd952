// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic detached spawning.
//!
//! In-flight upstream requests must keep making progress while the consumer is
//! busy with the previous item, so they are handed to the async runtime selected
//! through feature flags:
//!
//! - **Tokio**: `tokio::spawn` (default, `runtime-tokio`)
//! - **smol**: `smol::spawn(..).detach()` (`runtime-smol`)
//! - **async-std**: `async_std::task::spawn` (`runtime-async-std`)
//!
//! When several runtime features are enabled, Tokio wins over smol, and smol
//! wins over async-std.

use core::future::Future;

#[cfg(not(any(
    feature = "runtime-tokio",
    feature = "runtime-smol",
    feature = "runtime-async-std"
)))]
compile_error!(
    "prefetch-core needs a runtime: enable one of `runtime-tokio`, `runtime-smol` or `runtime-async-std`"
);

/// Spawn a future on the configured runtime and forget about it.
///
/// The future runs to completion even if nobody observes its result. Callers
/// that need the output send it through a channel from inside the future.
///
/// With `runtime-tokio` this must be called from within a Tokio runtime.
///
/// # Example
///
/// ```rust
/// use prefetch_core::spawn_detached;
/// use futures::channel::oneshot;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, rx) = oneshot::channel();
/// spawn_detached(async move {
///     let _ = tx.send(21 * 2);
/// });
/// assert_eq!(rx.await.unwrap(), 42);
/// # }
/// ```
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    #[cfg(feature = "runtime-tokio")]
    {
        tokio::spawn(future);
    }

    #[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
    {
        smol::spawn(future).detach();
    }

    #[cfg(all(
        feature = "runtime-async-std",
        not(feature = "runtime-tokio"),
        not(feature = "runtime-smol")
    ))]
    {
        async_std::task::spawn(future);
    }
}
