// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The one-ahead prefetch adapter.
//!
//! [`Prefetch`] wraps a source stream so that the request for item *k+1* is
//! already running while the consumer works on item *k*. It never holds more than
//! one outstanding request to the source: the source itself is moved into each
//! request and only comes back when that request settles, so a second request
//! cannot be issued early.
//!
//! # Request lifecycle
//!
//! Issuing a request builds a future that owns the source and resolves to the
//! source plus its next item. The future is polled once inline, inside the pull
//! that issues it, so the source starts producing immediately. If it is not done
//! after that first poll it is handed to a detached task on the configured runtime
//! and keeps making progress while the consumer is busy.
//!
//! ```text
//! pull k:   settle(k) ──► issue(k+1) ──► hand k to consumer
//!                           │
//!                           └── background task drives the source
//! pull k+1: settle(k+1) ─► issue(k+2) ─► hand k+1 to consumer
//! ```
//!
//! # Errors
//!
//! An upstream [`StreamItem::Error`] is returned on the pull that reads it and
//! terminates the adapter. No request is issued past a failure, so a later error
//! can never be reported in place of an earlier one.
//!
//! A source that panics while answering a request is reported as
//! [`PrefetchError::RequestAborted`], whether the panic happens during the inline
//! poll or later in the background task.

use crate::logging::{debug, trace, warn};
use core::fmt;
use core::mem;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;
use futures::future::BoxFuture;
use futures::stream::{FusedStream, Stream, StreamExt};
use futures::FutureExt;
use pin_project::pin_project;
use prefetch_core::{spawn_detached, PrefetchError, StreamItem};
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// A request that settled: the source, handed back, and what it answered.
struct Settled<S: Stream> {
    source: Pin<Box<S>>,
    item: Option<S::Item>,
}

enum State<S: Stream> {
    /// Nothing requested yet.
    Idle(Pin<Box<S>>),
    /// A detached task is driving the request.
    InFlight(oneshot::Receiver<Settled<S>>),
    /// The request settled before the consumer asked for it.
    Settled(Settled<S>),
    /// The request was lost to a panic; reported on the next pull.
    Aborted,
    /// The source ended; it has been dropped.
    Exhausted,
    /// An upstream failure was surfaced; the source has been dropped.
    Failed,
}

impl<S: Stream> State<S> {
    const fn name(&self) -> &'static str {
        match self {
            State::Idle(_) => "Idle",
            State::InFlight(_) => "InFlight",
            State::Settled(_) => "Settled",
            State::Aborted => "Aborted",
            State::Exhausted => "Exhausted",
            State::Failed => "Failed",
        }
    }
}

/// Stream adapter that keeps exactly one request to its source running ahead of
/// the consumer.
///
/// Created by [`PrefetchExt::prefetch`](crate::PrefetchExt::prefetch) or
/// [`Prefetch::new`]. Nothing is requested from the source until the first pull.
///
/// Items, their order, end-of-sequence and errors are exactly those of the
/// source; only the timing of the requests changes.
///
/// # Panics
///
/// Requests that don't settle on their first poll are handed to
/// [`spawn_detached`]. With the default `runtime-tokio` feature, polling the
/// adapter outside a Tokio runtime (for example under
/// `futures::executor::block_on`) panics as soon as such a request is issued.
///
/// A panic inside the source does not unwind into the consumer; it surfaces as
/// [`PrefetchError::RequestAborted`].
///
/// # Example
///
/// ```
/// use futures::{stream, StreamExt};
/// use prefetch_core::StreamItem;
/// use prefetch_stream::PrefetchExt;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let pages = stream::iter(vec![1, 2, 3]).map(StreamItem::Value);
/// let mut prefetched = pages.prefetch();
///
/// assert_eq!(prefetched.next().await.unwrap().unwrap(), 1);
/// assert_eq!(prefetched.next().await.unwrap().unwrap(), 2);
/// assert_eq!(prefetched.next().await.unwrap().unwrap(), 3);
/// assert!(prefetched.next().await.is_none());
/// # }
/// ```
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct Prefetch<S: Stream> {
    state: State<S>,
}

impl<S: Stream> Prefetch<S> {
    /// Wrap `source`. No request is issued until the first pull.
    pub fn new(source: S) -> Self {
        Self {
            state: State::Idle(Box::pin(source)),
        }
    }

    /// Returns `true` once the source has signalled end-of-sequence.
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }

    /// Returns `true` once an upstream failure has been surfaced.
    pub const fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed)
    }
}

impl<S: Stream> fmt::Debug for Prefetch<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prefetch")
            .field("state", &self.state.name())
            .finish()
    }
}

type Request<S> = BoxFuture<'static, Result<Settled<S>, Box<dyn Any + Send>>>;

/// Ask the source for its next item.
///
/// The request is polled once with the caller's context; only if it is still
/// pending is it moved to a detached task. Panics in the source are caught in
/// both places and turn the request into [`State::Aborted`].
fn issue<S>(mut source: Pin<Box<S>>, cx: &mut Context<'_>) -> State<S>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    let mut request: Request<S> = AssertUnwindSafe(async move {
        let item = source.next().await;
        Settled { source, item }
    })
    .catch_unwind()
    .boxed();

    match request.poll_unpin(cx) {
        Poll::Ready(Ok(settled)) => {
            trace!("prefetch: request settled inline");
            State::Settled(settled)
        }
        Poll::Ready(Err(_)) => State::Aborted,
        Poll::Pending => {
            trace!("prefetch: request pending, continuing in background");
            let (sender, receiver) = oneshot::channel();
            spawn_detached(async move {
                // A panicked request drops the sender; a gone consumer drops the result
                if let Ok(settled) = request.await {
                    let _ = sender.send(settled);
                }
            });
            State::InFlight(receiver)
        }
    }
}

impl<S, T> Stream for Prefetch<S>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        loop {
            match mem::replace(this.state, State::Exhausted) {
                State::Idle(source) => {
                    *this.state = issue(source, cx);
                }
                State::InFlight(mut receiver) => match receiver.poll_unpin(cx) {
                    Poll::Ready(Ok(settled)) => {
                        *this.state = State::Settled(settled);
                    }
                    Poll::Ready(Err(oneshot::Canceled)) => {
                        *this.state = State::Aborted;
                    }
                    Poll::Pending => {
                        *this.state = State::InFlight(receiver);
                        return Poll::Pending;
                    }
                },
                State::Aborted => {
                    warn!("prefetch: source request dropped without a result");
                    *this.state = State::Failed;
                    return Poll::Ready(Some(StreamItem::Error(PrefetchError::request_aborted(
                        "source request did not complete",
                    ))));
                }
                State::Settled(Settled { source, item }) => {
                    return Poll::Ready(match item {
                        Some(StreamItem::Value(value)) => {
                            // Lookahead: the next request starts before `value` is handed over
                            *this.state = issue(source, cx);
                            Some(StreamItem::Value(value))
                        }
                        Some(StreamItem::Error(error)) => {
                            debug!("prefetch: upstream failure, terminating: {}", error);
                            *this.state = State::Failed;
                            Some(StreamItem::Error(error))
                        }
                        None => {
                            debug!("prefetch: source exhausted");
                            None
                        }
                    });
                }
                terminal @ (State::Exhausted | State::Failed) => {
                    *this.state = terminal;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl<S, T> FusedStream for Prefetch<S>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Exhausted | State::Failed)
    }
}
