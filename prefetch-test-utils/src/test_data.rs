// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Page fixtures for page-in-then-write tests.

use futures::stream::{self, Stream, StreamExt};
use prefetch_core::StreamItem;

/// One page of a paginated result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub rows: Vec<String>,
}

impl Page {
    pub fn new(number: u32, rows: &[&str]) -> Self {
        Self {
            number,
            rows: rows.iter().map(|row| (*row).to_string()).collect(),
        }
    }
}

pub fn page_one() -> Page {
    Page::new(1, &["alice", "bob"])
}

pub fn page_two() -> Page {
    Page::new(2, &["charlie", "dave"])
}

pub fn page_three() -> Page {
    Page::new(3, &["diane"])
}

/// `page_one`, `page_two`, `page_three`, as an immediately ready source.
pub fn page_source() -> impl Stream<Item = StreamItem<Page>> + Send + 'static {
    stream::iter(vec![page_one(), page_two(), page_three()]).map(StreamItem::Value)
}
