//! Benchmarks for the fixed-capacity block event queue.

use std::hint::black_box;

use ampsynth::core::{Event, Queue, QUEUE_CAPACITY};
use criterion::{BenchmarkId, Criterion};

pub fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("nodes/queue");

    // Filling in reverse delay order shifts every existing entry.
    group.bench_function("fill_reverse", |b| {
        b.iter(|| {
            let mut queue = Queue::new();
            for i in (0..QUEUE_CAPACITY as u32).rev() {
                queue.add(Event::new(1, i as u16, 1), black_box(i));
            }
            black_box(queue.len())
        })
    });

    for &n in &[4usize, 16, QUEUE_CAPACITY] {
        let mut queue = Queue::new();
        for i in 0..n as u32 {
            queue.add(Event::new(1, i as u16, 1), i);
        }

        group.bench_with_input(BenchmarkId::new("walk", n), &n, |b, _| {
            b.iter(|| {
                let mut cursor = 0;
                let mut seen = 0;
                for i in 0..QUEUE_CAPACITY as u32 {
                    while queue.next_action(&mut cursor, i).is_some() {
                        seen += 1;
                    }
                }
                black_box(seen)
            })
        });
    }

    group.finish();
}
