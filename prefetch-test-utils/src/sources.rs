// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Instrumented sources and consumer for timing tests.

use crate::timeline::{Event, Timeline};
use futures::stream::{self, Stream, StreamExt};
use prefetch_core::{PrefetchError, StreamItem};
use std::time::Duration;
use tokio::time::sleep;

/// Error yielded by [`failing_source`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request {index} failed")]
pub struct RequestFailed {
    pub index: usize,
}

/// A source of `count` items `0..count`, each taking `delay` to produce.
///
/// Records `Request(i)` when it starts on item `i` and `Produce(i)` right before
/// yielding it. An exhausted source records nothing.
pub fn paced_source(
    count: usize,
    delay: Duration,
    timeline: &Timeline,
) -> impl Stream<Item = StreamItem<usize>> + Send + 'static {
    failing_source(count, None, delay, timeline)
}

/// Like [`paced_source`], but request `fail_at` (if any) yields
/// [`RequestFailed`] and the source ends right after it.
pub fn failing_source(
    count: usize,
    fail_at: Option<usize>,
    delay: Duration,
    timeline: &Timeline,
) -> impl Stream<Item = StreamItem<usize>> + Send + 'static {
    recorded_source(count, fail_at, true, delay, timeline)
}

/// Like [`failing_source`], but the source keeps answering after the failure.
///
/// Any request made past `fail_at` is recorded, so tests can check that a
/// consumer stops asking once it has seen the error.
pub fn flaky_source(
    count: usize,
    fail_at: usize,
    delay: Duration,
    timeline: &Timeline,
) -> impl Stream<Item = StreamItem<usize>> + Send + 'static {
    recorded_source(count, Some(fail_at), false, delay, timeline)
}

fn recorded_source(
    count: usize,
    fail_at: Option<usize>,
    end_after_failure: bool,
    delay: Duration,
    timeline: &Timeline,
) -> impl Stream<Item = StreamItem<usize>> + Send + 'static {
    let timeline = timeline.clone();
    stream::unfold(0usize, move |index| {
        let timeline = timeline.clone();
        async move {
            if index >= count {
                return None;
            }

            timeline.record(Event::Request(index));
            sleep(delay).await;

            if fail_at == Some(index) {
                timeline.record(Event::Fail(index));
                let error = PrefetchError::user_error(RequestFailed { index });
                let next = if end_after_failure { count } else { index + 1 };
                return Some((StreamItem::Error(error), next));
            }

            timeline.record(Event::Produce(index));
            Some((StreamItem::Value(index), index + 1))
        }
    })
}

/// Drain `stream`, spending `delay` on every value.
///
/// Records `Consume(i)` on receipt and `Finish(i)` after the delay. Returns
/// everything the stream yielded, errors included.
pub async fn consume_with<S>(
    mut stream: S,
    delay: Duration,
    timeline: &Timeline,
) -> Vec<StreamItem<usize>>
where
    S: Stream<Item = StreamItem<usize>> + Unpin,
{
    let mut seen = Vec::new();
    while let Some(item) = stream.next().await {
        if let StreamItem::Value(index) = item {
            timeline.record(Event::Consume(index));
            sleep(delay).await;
            timeline.record(Event::Finish(index));
        }
        seen.push(item);
    }
    seen
}
