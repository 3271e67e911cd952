// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared, ordered recorder of source and consumer events.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Something that happened to item `i` during a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// The source started working on item `i`.
    Request(usize),
    /// The source finished item `i` and yielded it.
    Produce(usize),
    /// The source finished request `i` with an error.
    Fail(usize),
    /// The consumer received item `i`.
    Consume(usize),
    /// The consumer finished its work on item `i`.
    Finish(usize),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Request(i) => write!(f, "request({i})"),
            Event::Produce(i) => write!(f, "produce({i})"),
            Event::Fail(i) => write!(f, "fail({i})"),
            Event::Consume(i) => write!(f, "consume({i})"),
            Event::Finish(i) => write!(f, "finish({i})"),
        }
    }
}

#[derive(Debug, Default)]
struct Recorded {
    events: Vec<Event>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Cloneable handle to one recording; clones append to the same list.
///
/// Besides the event list it tracks how many source requests were unsettled at
/// once, which is how tests check the single-flight guarantee.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    inner: Arc<Mutex<Recorded>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        let mut recorded = self.inner.lock();
        match event {
            Event::Request(_) => {
                recorded.in_flight += 1;
                recorded.max_in_flight = recorded.max_in_flight.max(recorded.in_flight);
            }
            Event::Produce(_) | Event::Fail(_) => {
                recorded.in_flight = recorded.in_flight.saturating_sub(1);
            }
            Event::Consume(_) | Event::Finish(_) => {}
        }
        recorded.events.push(event);
    }

    /// Snapshot of everything recorded so far, in order.
    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().events.clone()
    }

    /// Index of `event` in the recording, if it happened.
    pub fn position(&self, event: Event) -> Option<usize> {
        self.inner.lock().events.iter().position(|e| *e == event)
    }

    /// Whether `first` was recorded before `second`. `false` if either is missing.
    pub fn happened_before(&self, first: Event, second: Event) -> bool {
        match (self.position(first), self.position(second)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// Number of requests the source has received.
    pub fn requests(&self) -> usize {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Request(_)))
            .count()
    }

    /// Largest number of simultaneously unsettled source requests seen.
    pub fn max_in_flight(&self) -> usize {
        self.inner.lock().max_in_flight
    }

    /// Number of `Produce` events recorded before `event`.
    pub fn produced_before(&self, event: Event) -> usize {
        let recorded = self.inner.lock();
        recorded
            .events
            .iter()
            .take_while(|e| **e != event)
            .filter(|e| matches!(e, Event::Produce(_)))
            .count()
    }

    /// The recording rendered as `request(0), produce(0), ...`.
    pub fn render(&self) -> String {
        self.events()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
