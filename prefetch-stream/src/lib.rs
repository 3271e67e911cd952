// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! One-ahead prefetching for async streams.
//!
//! Pipelines that page data in from a slow source and then run an async task on
//! every item (page-in-then-write) spend most of their time waiting: the consumer
//! waits for the source, then the source sits idle while the consumer works. The
//! [`prefetch`](PrefetchExt::prefetch) operator overlaps the two: while the
//! consumer handles item *k*, the request for item *k+1* is already running.
//!
//! # Guarantees
//!
//! - **Fidelity**: the same items, in the same order, with the same end and the
//!   same errors as the source.
//! - **Lookahead**: the request for item *k+1* is issued before item *k* is
//!   returned to the consumer.
//! - **Single-flight**: at most one request to the source is outstanding at any
//!   time, so sources that cannot serve concurrent requests (cursors, page tokens)
//!   are safe to wrap.
//! - **Termination**: after end-of-sequence or an error, the source is never asked
//!   again.
//!
//! # Timeline
//!
//! Producer 100ms per item, consumer 20ms per item:
//!
//! ```text
//! request(0) produce(0) request(1) consume(0) finish(0)
//! produce(1) request(2) consume(1) finish(1)
//! produce(2) consume(2) finish(2)
//! ```
//!
//! # Runtime
//!
//! Requests that don't complete on their first poll are driven by a detached task
//! spawned on the runtime selected by feature flag (`runtime-tokio` by default,
//! `runtime-smol`, `runtime-async-std`).
//!
//! # Example
//!
//! ```
//! use futures::{stream, StreamExt};
//! use prefetch_stream::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pages = stream::iter(vec!["a", "b", "c"]).into_stream_items();
//! let mut pages = pages.prefetch();
//!
//! while let Some(page) = pages.next().await {
//!     let page = page.unwrap();
//!     // write the page somewhere while the next one loads
//!     assert!(!page.is_empty());
//! }
//! # }
//! ```

mod logging;

pub mod into_stream_items;
pub mod prefetch;
pub mod prefetch_ext;
pub mod prelude;

pub use self::into_stream_items::{IntoStreamItems, TryIntoStreamItems};
pub use self::prefetch::Prefetch;
pub use self::prefetch_ext::PrefetchExt;
pub use prefetch_core::{PrefetchError, StreamItem};
