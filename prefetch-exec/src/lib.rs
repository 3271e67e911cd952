// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Sequential consumers for streams.
//!
//! The consumer side of a page-in-then-write pipeline: drain a stream one item at
//! a time, awaiting an async handler for each item before pulling the next one.
//! Combined with `prefetch_stream::PrefetchExt::prefetch`, the next item is
//! loading while the handler runs.
//!
//! - [`SubscribeExt::subscribe`] works on any stream and collects handler errors.
//! - [`SubscribeItemsExt::subscribe_items`] works on `StreamItem` streams and stops
//!   at the first upstream or handler error.

mod logging;
pub mod subscribe;
pub mod subscribe_items;

// Re-export commonly used types
pub use subscribe::SubscribeExt;
pub use subscribe_items::SubscribeItemsExt;
