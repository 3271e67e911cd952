// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{BenchmarkId, Criterion, Throughput};
use futures::stream::{self, StreamExt};
use prefetch_core::StreamItem;
use prefetch_stream::PrefetchExt;
use std::hint::black_box;
use std::time::Duration;
use tokio::runtime::Builder;
use tokio::time::sleep;

const PAGES: u64 = 20;
const PAGE_IN: Duration = Duration::from_millis(10);
const WRITE: Duration = Duration::from_millis(10);

/// Page-in-then-write with and without prefetching, on a paused clock.
///
/// The paused runtime makes the sleeps free, so this measures scheduling cost.
/// The simulated wall time (sequential 400ms vs overlapped 210ms) is what the
/// adapter saves in a real pipeline.
pub fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_in_then_write");
    group.throughput(Throughput::Elements(PAGES));

    for prefetched in [false, true] {
        let name = if prefetched { "prefetched" } else { "plain" };
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &prefetched,
            |bencher, &prefetched| {
                bencher.iter(|| {
                    // 1. Setup a lightweight, paused runtime
                    let rt = Builder::new_current_thread()
                        .enable_time()
                        .start_paused(true)
                        .build()
                        .unwrap();

                    rt.block_on(async {
                        // 2. Slow source of pages
                        let pages = stream::iter(0..PAGES).then(|page| async move {
                            sleep(PAGE_IN).await;
                            StreamItem::Value(page)
                        });
                        let mut pages = if prefetched {
                            pages.prefetch().boxed()
                        } else {
                            pages.boxed()
                        };

                        // 3. Slow consumer
                        while let Some(page) = pages.next().await {
                            sleep(WRITE).await;
                            black_box(page);
                        }
                    });
                });
            },
        );
    }

    group.finish();
}
