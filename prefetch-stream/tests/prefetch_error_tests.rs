// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{self, StreamExt};
use prefetch_core::{PrefetchError, StreamItem};
use prefetch_stream::PrefetchExt;
use prefetch_test_utils::{
    assert_stream_ended, consume_with, failing_source, flaky_source, test_channel_with_errors,
    unwrap_stream, unwrap_value, Event, RequestFailed, Timeline,
};
use std::time::Duration;
use tokio::time::{pause, sleep};

#[tokio::test]
async fn test_prefetch_fails_on_the_pull_of_the_failed_request() -> anyhow::Result<()> {
    // Arrange
    pause();
    let timeline = Timeline::new();
    let mut prefetched =
        failing_source(5, Some(2), Duration::from_millis(10), &timeline).prefetch();

    // Act & Assert
    assert_eq!(unwrap_value(&mut prefetched, 100).await, 0);
    assert_eq!(unwrap_value(&mut prefetched, 100).await, 1);

    let error = unwrap_stream(&mut prefetched, 100)
        .await
        .err()
        .expect("third pull should fail");
    assert_eq!(error.to_string(), "User error: request 2 failed");

    assert_stream_ended(&mut prefetched, 100).await;
    assert!(prefetched.is_failed());
    assert_eq!(timeline.requests(), 3);
    Ok(())
}

#[tokio::test]
async fn test_prefetch_never_requests_past_a_failure() -> anyhow::Result<()> {
    // Arrange
    pause();
    let timeline = Timeline::new();
    let source = failing_source(5, Some(2), Duration::from_millis(10), &timeline);

    // Act
    let seen = consume_with(source.prefetch(), Duration::from_millis(50), &timeline).await;
    sleep(Duration::from_millis(200)).await;

    // Assert
    assert_eq!(seen.len(), 3);
    assert!(seen[2].is_error());
    assert_eq!(timeline.requests(), 3);
    assert!(timeline.position(Event::Request(3)).is_none());
    assert!(timeline.happened_before(Event::Fail(2), Event::Finish(1)));
    Ok(())
}

#[tokio::test]
async fn test_prefetch_stops_asking_a_source_that_keeps_answering() -> anyhow::Result<()> {
    // Arrange
    pause();
    let timeline = Timeline::new();
    let source = flaky_source(5, 2, Duration::from_millis(10), &timeline);

    // Act
    let seen = consume_with(source.prefetch(), Duration::from_millis(30), &timeline).await;
    sleep(Duration::from_millis(200)).await;

    // Assert
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[..2], [StreamItem::Value(0), StreamItem::Value(1)]);
    assert!(seen[2].is_error());
    assert_eq!(timeline.requests(), 3, "{}", timeline.render());
    assert!(timeline.position(Event::Request(3)).is_none());
    assert!(timeline.position(Event::Request(4)).is_none());
    Ok(())
}

#[tokio::test]
async fn test_prefetch_depth_stops_asking_a_source_that_keeps_answering() -> anyhow::Result<()> {
    // Arrange
    pause();
    let timeline = Timeline::new();
    let source = flaky_source(8, 2, Duration::from_millis(5), &timeline);

    // Act
    let seen = consume_with(source.prefetch_depth(3), Duration::from_millis(30), &timeline).await;
    sleep(Duration::from_millis(200)).await;

    // Assert
    assert_eq!(seen.len(), 3);
    assert!(seen[2].is_error());
    assert_eq!(timeline.requests(), 3, "{}", timeline.render());
    Ok(())
}

#[tokio::test]
async fn test_prefetch_error_keeps_original_cause() -> anyhow::Result<()> {
    // Arrange
    pause();
    let timeline = Timeline::new();
    let mut prefetched =
        failing_source(1, Some(0), Duration::from_millis(10), &timeline).prefetch();

    // Act
    let item = unwrap_stream(&mut prefetched, 100).await;

    // Assert
    match item {
        StreamItem::Error(PrefetchError::UserError(cause)) => {
            let cause = cause
                .downcast_ref::<RequestFailed>()
                .expect("cause should be RequestFailed");
            assert_eq!(cause, &RequestFailed { index: 0 });
        }
        other => panic!("expected a user error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_prefetch_first_error_wins_over_later_items() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<u32>();
    tx.send(StreamItem::Value(1))?;
    tx.send(StreamItem::Error(PrefetchError::stream_error("first")))?;
    tx.send(StreamItem::Error(PrefetchError::stream_error("second")))?;
    tx.send(StreamItem::Value(2))?;
    let mut prefetched = stream.prefetch();

    // Act & Assert
    assert_eq!(unwrap_value(&mut prefetched, 100).await, 1);
    let error = unwrap_stream(&mut prefetched, 100)
        .await
        .err()
        .expect("second pull should fail");
    assert_eq!(error.to_string(), "Stream processing error: first");
    assert_stream_ended(&mut prefetched, 100).await;

    // The source was dropped on the failure, so nothing else is read from it
    assert!(tx.is_closed());
    Ok(())
}

#[tokio::test]
async fn test_prefetch_error_as_first_item() -> anyhow::Result<()> {
    // Arrange
    let source = stream::iter(vec![
        StreamItem::Error(PrefetchError::stream_error("cursor closed")),
        StreamItem::Value(1),
    ]);

    // Act
    let items: Vec<StreamItem<i32>> = source.prefetch().collect().await;

    // Assert
    assert_eq!(items.len(), 1);
    assert!(items[0].is_error());
    Ok(())
}

async fn crash_now() -> StreamItem<u32> {
    panic!("cursor corrupted");
}

#[tokio::test]
async fn test_prefetch_source_panic_on_first_poll_aborts_request() -> anyhow::Result<()> {
    // Arrange
    let mut prefetched = stream::once(crash_now()).prefetch();

    // Act
    let item = unwrap_stream(&mut prefetched, 100).await;

    // Assert
    assert!(matches!(
        item,
        StreamItem::Error(PrefetchError::RequestAborted { .. })
    ));
    assert!(prefetched.is_failed());
    assert_stream_ended(&mut prefetched, 100).await;
    Ok(())
}

#[tokio::test]
async fn test_prefetch_source_panic_during_lookahead_is_reported_on_next_pull(
) -> anyhow::Result<()> {
    // Arrange
    let source = stream::unfold(0u32, |n| async move {
        if n == 1 {
            panic!("cursor corrupted");
        }
        Some((StreamItem::Value(n), n + 1))
    });
    let mut prefetched = source.prefetch();

    // Act & Assert
    assert_eq!(unwrap_value(&mut prefetched, 100).await, 0);
    assert!(matches!(
        unwrap_stream(&mut prefetched, 100).await,
        StreamItem::Error(PrefetchError::RequestAborted { .. })
    ));
    assert_stream_ended(&mut prefetched, 100).await;
    Ok(())
}

async fn crash_after(delay: Duration) -> StreamItem<u32> {
    sleep(delay).await;
    panic!("source crashed");
}

#[tokio::test]
async fn test_prefetch_source_panic_in_background_aborts_request() -> anyhow::Result<()> {
    // Arrange
    let source = stream::once(crash_after(Duration::from_millis(5)));
    let mut prefetched = source.prefetch();

    // Act
    let item = unwrap_stream(&mut prefetched, 1000).await;

    // Assert
    match item {
        StreamItem::Error(error @ PrefetchError::RequestAborted { .. }) => {
            assert!(!error.is_permanent());
        }
        other => panic!("expected an aborted request, got {other:?}"),
    }
    assert!(prefetched.is_failed());
    assert_stream_ended(&mut prefetched, 100).await;
    Ok(())
}
