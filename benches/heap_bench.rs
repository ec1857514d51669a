//! Criterion benchmarks for MinHeap
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench heap_bench
//!
//! # Only the decrease-key workloads
//! cargo bench --bench heap_bench -- decrease_key
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use position_heap::pathfinding::{dijkstra, SearchNode};
use position_heap::{MinHeap, PositionCell};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_priorities(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..1_000_000)).collect()
}

fn bench_insert_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_extract");
    for n in [1_000usize, 10_000, 100_000] {
        let priorities = random_priorities(n, 1);
        group.bench_with_input(BenchmarkId::new("insert_then_drain", n), &priorities, |b, ps| {
            b.iter(|| {
                let mut heap = MinHeap::new();
                for (i, &p) in ps.iter().enumerate() {
                    heap.insert(i, p);
                }
                while let Ok(v) = heap.try_extract_min() {
                    black_box(v);
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("bulk_then_drain", n), &priorities, |b, ps| {
            b.iter(|| {
                let mut heap: MinHeap<u64, usize> =
                    ps.iter().enumerate().map(|(i, &p)| (i, p)).collect();
                while let Ok(v) = heap.try_extract_min() {
                    black_box(v);
                }
            })
        });
    }
    group.finish();
}

fn bench_decrease_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrease_key");
    for n in [1_000usize, 10_000, 100_000] {
        let priorities = random_priorities(n, 2);
        group.bench_with_input(BenchmarkId::new("tracked", n), &priorities, |b, ps| {
            b.iter(|| {
                let mut heap = MinHeap::new();
                let cells: Vec<PositionCell> = ps.iter().map(|_| PositionCell::new()).collect();
                for (i, &p) in ps.iter().enumerate() {
                    heap.insert_tracked(i, p + 1_000_000, &cells[i]);
                }
                for (cell, &p) in cells.iter().zip(ps) {
                    heap.decrease_key_tracked(cell, p);
                }
                black_box(heap.len());
            })
        });
    }
    group.finish();
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct GridPos {
    x: i32,
    y: i32,
    size: i32,
}

impl SearchNode for GridPos {
    type Cost = u32;

    fn successors(&self) -> Vec<(Self, u32)> {
        let mut out = Vec::with_capacity(4);
        for (dx, dy) in [(0, 1), (1, 0), (0, -1), (-1, 0)] {
            let (x, y) = (self.x + dx, self.y + dy);
            if (0..self.size).contains(&x) && (0..self.size).contains(&y) {
                // Deterministic, uneven weights so relaxations hit decrease-key
                let weight = ((x * 31 + y * 17) % 9 + 1) as u32;
                out.push((GridPos { x, y, size: self.size }, weight));
            }
        }
        out
    }

    fn is_goal(&self) -> bool {
        self.x == self.size - 1 && self.y == self.size - 1
    }
}

fn bench_dijkstra(c: &mut Criterion) {
    let mut group = c.benchmark_group("dijkstra_grid");
    group.sample_size(20);
    for size in [32, 128] {
        let start = GridPos { x: 0, y: 0, size };
        group.bench_with_input(BenchmarkId::from_parameter(size), &start, |b, s| {
            b.iter(|| black_box(dijkstra(s)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert_extract, bench_decrease_key, bench_dijkstra);
criterion_main!(benches);
