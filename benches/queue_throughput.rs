use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use obsq::{ChangeEvent, ObservableQueue};

const BATCH: u64 = 10_000;

fn queue_with_subscribers(thread_safe: bool, subscribers: usize) -> ObservableQueue<u64> {
    let queue = ObservableQueue::new(thread_safe);
    let sink = Arc::new(AtomicU64::new(0));
    for _ in 0..subscribers {
        let sink = Arc::clone(&sink);
        queue.subscribe(move |e: &ChangeEvent<u64>| {
            if let Some(item) = e.item() {
                sink.fetch_add(*item, Ordering::Relaxed);
            }
        });
    }
    queue
}

fn bench_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue_drain_single_thread");
    group.throughput(Throughput::Elements(BATCH));

    for &thread_safe in &[false, true] {
        for &subscribers in &[0usize, 1, 4] {
            let id = BenchmarkId::new(
                if thread_safe { "serialized" } else { "relaxed" },
                subscribers,
            );
            group.bench_with_input(id, &subscribers, |b, &subscribers| {
                let queue = queue_with_subscribers(thread_safe, subscribers);
                b.iter(|| {
                    for i in 0..BATCH {
                        queue.enqueue(i);
                    }
                    while let Some(item) = queue.try_dequeue() {
                        black_box(item);
                    }
                });
            });
        }
    }

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("producers_vs_consumers");
    group.throughput(Throughput::Elements(BATCH * 4));

    for &thread_safe in &[false, true] {
        let name = if thread_safe { "serialized" } else { "relaxed" };
        group.bench_function(name, |b| {
            let queue = queue_with_subscribers(thread_safe, 1);
            b.iter(|| {
                thread::scope(|s| {
                    for _ in 0..4 {
                        s.spawn(|| {
                            for i in 0..BATCH {
                                queue.enqueue(i);
                            }
                        });
                    }
                    for _ in 0..4 {
                        s.spawn(|| {
                            for _ in 0..BATCH {
                                black_box(queue.try_dequeue());
                            }
                        });
                    }
                });
                while queue.try_dequeue().is_some() {}
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_thread, bench_contended);
criterion_main!(benches);
