// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types shared by the prefetch crates.
//!
//! - [`StreamItem`] is the item type every prefetchable source yields: a value or
//!   a terminal error.
//! - [`PrefetchError`] is the single error type carried by [`StreamItem::Error`].
//! - [`CancellationToken`] lets consumers stop draining a stream cooperatively.
//! - [`spawn_detached`] drives in-flight upstream requests on the configured runtime.

pub mod cancellation_token;
pub mod error;
pub mod stream_item;
pub mod task;

pub use self::cancellation_token::CancellationToken;
pub use self::error::{IntoPrefetchError, PrefetchError, Result};
pub use self::stream_item::StreamItem;
pub use self::task::spawn_detached;
