// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream;
use prefetch_core::{CancellationToken, PrefetchError, StreamItem};
use prefetch_exec::SubscribeItemsExt;
use prefetch_stream::PrefetchExt;
use prefetch_test_utils::test_data::{page_one, page_source, page_three, page_two, Page};
use prefetch_test_utils::{failing_source, paced_source, Event, Timeline};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::time::{pause, sleep, Instant};

#[derive(Debug, thiserror::Error)]
#[error("write of page {0} rejected")]
struct WriteRejected(u32);

fn recording_writer(
    written: Arc<StdMutex<Vec<Page>>>,
) -> impl Fn(Page, CancellationToken) -> std::future::Ready<Result<(), WriteRejected>> + Send + Sync
{
    move |page, _ctx| {
        written.lock().unwrap().push(page);
        std::future::ready(Ok(()))
    }
}

#[tokio::test]
async fn test_subscribe_items_writes_every_page() -> anyhow::Result<()> {
    // Arrange
    let written = Arc::new(StdMutex::new(Vec::new()));

    // Act
    page_source()
        .prefetch()
        .subscribe_items(recording_writer(written.clone()), None)
        .await?;

    // Assert
    assert_eq!(
        *written.lock().unwrap(),
        vec![page_one(), page_two(), page_three()]
    );
    Ok(())
}

#[tokio::test]
async fn test_subscribe_items_returns_upstream_error() -> anyhow::Result<()> {
    // Arrange
    pause();
    let timeline = Timeline::new();
    let source = failing_source(5, Some(2), Duration::from_millis(10), &timeline);
    let written = Arc::new(StdMutex::new(Vec::new()));

    let writer = {
        let written = written.clone();
        move |index: usize, _ctx: CancellationToken| {
            let written = written.clone();
            async move {
                written.lock().unwrap().push(index);
                Ok::<(), WriteRejected>(())
            }
        }
    };

    // Act
    let result = source.prefetch().subscribe_items(writer, None).await;

    // Assert
    let error = result.expect_err("third request should fail");
    assert_eq!(error.to_string(), "User error: request 2 failed");
    assert_eq!(*written.lock().unwrap(), vec![0, 1]);
    assert_eq!(timeline.requests(), 3);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_items_stops_on_handler_error() -> anyhow::Result<()> {
    // Arrange
    let attempts = Arc::new(StdMutex::new(0u32));
    let writer = {
        let attempts = attempts.clone();
        move |page: Page, _ctx: CancellationToken| {
            *attempts.lock().unwrap() += 1;
            async move {
                if page.number == 2 {
                    return Err(WriteRejected(page.number));
                }
                Ok(())
            }
        }
    };

    // Act
    let result = page_source().prefetch().subscribe_items(writer, None).await;

    // Assert
    match result {
        Err(PrefetchError::UserError(cause)) => {
            assert_eq!(cause.to_string(), "write of page 2 rejected");
        }
        other => panic!("expected the write failure, got {other:?}"),
    }
    assert_eq!(*attempts.lock().unwrap(), 2);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_items_cancelled_returns_ok() -> anyhow::Result<()> {
    // Arrange
    let cancellation_token = CancellationToken::new();
    cancellation_token.cancel();
    let written = Arc::new(StdMutex::new(Vec::new()));

    // Act
    let result = page_source()
        .subscribe_items(
            recording_writer(written.clone()),
            Some(cancellation_token),
        )
        .await;

    // Assert
    assert!(result.is_ok());
    assert!(written.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_subscribe_items_empty_stream() -> anyhow::Result<()> {
    let written = Arc::new(StdMutex::new(Vec::new()));

    stream::empty::<StreamItem<Page>>()
        .prefetch()
        .subscribe_items(recording_writer(written.clone()), None)
        .await?;

    assert!(written.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_page_in_then_write_overlaps_with_prefetch() -> anyhow::Result<()> {
    // Arrange
    pause();
    let timeline = Timeline::new();
    let source = paced_source(5, Duration::from_millis(40), &timeline);
    let writer = {
        let timeline = timeline.clone();
        move |index: usize, _ctx: CancellationToken| {
            let timeline = timeline.clone();
            async move {
                timeline.record(Event::Consume(index));
                sleep(Duration::from_millis(40)).await;
                timeline.record(Event::Finish(index));
                Ok::<(), WriteRejected>(())
            }
        }
    };
    let started = Instant::now();

    // Act
    source.prefetch().subscribe_items(writer, None).await?;

    // Assert
    // Page-in of page k+1 runs during the write of page k
    let elapsed = started.elapsed();
    assert!(elapsed < Duration::from_millis(400), "{elapsed:?}");
    for k in 0..4 {
        assert!(timeline.happened_before(Event::Request(k + 1), Event::Finish(k)));
    }
    assert_eq!(timeline.max_in_flight(), 1);
    Ok(())
}
