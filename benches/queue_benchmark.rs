/*!
 * Queue Benchmarks
 *
 * Compare arrival-order appends, estimate-sorted inserts and priority routing
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use proc_scheduler::{PriorityTable, ProcessQueue, ProcessRecord};
use std::time::Duration;

fn records(count: u32) -> Vec<ProcessRecord> {
    (0..count)
        .map(|i| {
            // Scrambled estimates so sorted insertion does real work
            let estimate = (i * 7919) % 1000;
            ProcessRecord::new(format!("./job{}", i), i64::from(i % 20), estimate, Duration::ZERO)
        })
        .collect()
}

fn bench_queue_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_build");

    for size in [16u32, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("append", size), &size, |b, &size| {
            b.iter_batched(
                || records(size),
                |records| {
                    let mut queue = ProcessQueue::new();
                    for record in records {
                        queue.append(record);
                    }
                    black_box(queue)
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("insert_sorted", size), &size, |b, &size| {
            b.iter_batched(
                || records(size),
                |records| {
                    let mut queue = ProcessQueue::new();
                    for record in records {
                        queue.insert_sorted(record);
                    }
                    black_box(queue)
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("route", size), &size, |b, &size| {
            b.iter_batched(
                || records(size),
                |records| {
                    let mut table = PriorityTable::new();
                    for record in records {
                        table.route(record);
                    }
                    black_box(table)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    c.bench_function("drain_4096", |b| {
        b.iter_batched(
            || records(4096).into_iter().collect::<ProcessQueue>(),
            |mut queue| {
                let mut drained = 0usize;
                while let Some(record) = queue.pop_front() {
                    drained += record.estimated_time() as usize;
                }
                black_box(drained)
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_queue_build, bench_drain);
criterion_main!(benches);
