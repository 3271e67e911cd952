// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! # prefetch-rx
//!
//! One-ahead prefetching for async streams.
//!
//! Wrap a slow source with [`prefetch`](PrefetchExt::prefetch) and the request for
//! the next item starts before the current one reaches you. The source never sees
//! more than one request at a time, so cursors and page-token APIs that cannot
//! serve concurrent calls stay safe.
//!
//! ## Quick start
//!
//! ```
//! use prefetch_rx::prelude::*;
//! use futures::stream;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("disk full")]
//! struct DiskFull;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> prefetch_rx::Result<()> {
//! let pages = stream::iter(vec![vec![1, 2], vec![3], vec![4, 5, 6]]).into_stream_items();
//!
//! pages
//!     .prefetch()
//!     .subscribe_items(
//!         |page: Vec<u32>, _token| async move {
//!             // write the page while the next one loads
//!             assert!(!page.is_empty());
//!             Ok::<(), DiskFull>(())
//!         },
//!         None,
//!     )
//!     .await
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |---|---|
//! | `prefetch-core` | [`StreamItem`], [`PrefetchError`], [`CancellationToken`] |
//! | `prefetch-stream` | [`Prefetch`], [`PrefetchExt`], stream conversions |
//! | `prefetch-exec` | [`SubscribeExt`], [`SubscribeItemsExt`] |
//!
//! ## Features
//!
//! - `runtime-tokio` (default), `runtime-smol`, `runtime-async-std`: where in-flight
//!   requests are driven.
//! - `tracing`: structured events for requests, exhaustion and failures.

pub mod receiver_ext;

// Re-export core types
pub use prefetch_core::{CancellationToken, IntoPrefetchError, PrefetchError, Result, StreamItem};

// Re-export the adapter and its extension traits
pub use prefetch_stream::{IntoStreamItems, Prefetch, PrefetchExt, TryIntoStreamItems};

// Re-export consumers
pub use prefetch_exec::{SubscribeExt, SubscribeItemsExt};

pub use receiver_ext::UnboundedReceiverExt;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::receiver_ext::UnboundedReceiverExt;
    pub use prefetch_core::{CancellationToken, PrefetchError, StreamItem};
    pub use prefetch_exec::{SubscribeExt, SubscribeItemsExt};
    pub use prefetch_stream::{IntoStreamItems, Prefetch, PrefetchExt, TryIntoStreamItems};
}
