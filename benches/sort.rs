use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use cyclic_queue::Queue;
use std::hint::black_box;

// -----------------------
// Problem size constants
// -----------------------
const NUM_ELEMENTS: usize = 10_000;
const ALPHABET: usize = 26;

// Deterministic pseudo-random words, so runs compare across commits.
fn words() -> Vec<String> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..NUM_ELEMENTS)
        .map(|_| {
            (0..8)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (b'a' + (state % ALPHABET as u64) as u8) as char
                })
                .collect()
        })
        .collect()
}

fn build_queue(words: &[String]) -> Queue {
    Queue::try_from_iter(words).expect("allocation failed while building the queue")
}

fn bench_sort(c: &mut Criterion) {
    let words = words();
    c.bench_function("sort_random_10k", |b| {
        b.iter_batched(
            || build_queue(&words),
            |mut queue| {
                queue.sort();
                black_box(queue)
            },
            BatchSize::LargeInput,
        )
    });

    let mut sorted = words.clone();
    sorted.sort();
    c.bench_function("sort_presorted_10k", |b| {
        b.iter_batched(
            || build_queue(&sorted),
            |mut queue| {
                queue.sort();
                black_box(queue)
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_reverse(c: &mut Criterion) {
    let mut queue = build_queue(&words());
    c.bench_function("reverse_10k", |b| {
        b.iter(|| {
            queue.reverse();
            black_box(&queue);
        })
    });
}

fn bench_swap_pairs(c: &mut Criterion) {
    let mut queue = build_queue(&words());
    c.bench_function("swap_pairs_10k", |b| {
        b.iter(|| {
            queue.swap_pairs();
            black_box(&queue);
        })
    });
}

criterion_group!(benches, bench_sort, bench_reverse, bench_swap_pairs);
criterion_main!(benches);
