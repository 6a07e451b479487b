// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Point;
use understory_reorder::memory::MemoryList;
use understory_reorder::{DragDropMachine, DragEvent, ReorderConfig, reorder_slice};

const ROW: f64 = 10.0;

fn rows(len: usize) -> MemoryList {
    let mut list = MemoryList::new(100.0);
    for _ in 0..len {
        list.push(".row", ROW);
    }
    list
}

fn center(index: usize) -> Point {
    Point::new(50.0, ROW * index as f64 + ROW / 2.0)
}

/// A machine already dragging the first of `len` rows.
fn dragging(len: usize, flip: bool) -> (MemoryList, DragDropMachine<MemoryList>) {
    let mut list = rows(len);
    let mut machine = DragDropMachine::new(ReorderConfig::new(".row").with_flip(flip));
    let first = list.order()[0];
    let target = list.node(first);
    machine.send(
        &mut list,
        DragEvent::Drag {
            pointer: center(0),
            target,
        },
    );
    (list, machine)
}

fn bench_long_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder/commit_to_end");

    // One move across the whole list: the commit shifts every other row.
    for len in [16usize, 128, 1_024] {
        group.throughput(Throughput::Elements(len as u64));
        for flip in [false, true] {
            let name = if flip { "flip" } else { "no_flip" };
            group.bench_with_input(BenchmarkId::new(name, len), &len, |b, &len| {
                b.iter_batched(
                    || dragging(len, flip),
                    |(mut list, mut machine)| {
                        let moved = machine.send(
                            &mut list,
                            DragEvent::Move {
                                pointer: center(len - 1),
                            },
                        );
                        black_box((moved, list));
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_moves_without_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder/move_in_place");

    // Moves that stay over the dragged row only hit-test and write offsets.
    for len in [16usize, 1_024] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let (mut list, mut machine) = dragging(len, false);
            let mut y = 1.0;
            b.iter(|| {
                y = if y >= ROW - 1.0 { 1.0 } else { y + 1.0 };
                black_box(machine.send(
                    &mut list,
                    DragEvent::Move {
                        pointer: Point::new(50.0, y),
                    },
                ));
            });
        });
    }

    group.finish();
}

fn bench_reorder_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder/slice");

    for len in [128usize, 8_192] {
        let items: Vec<u32> = (0..(len as u32)).collect();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("first_to_last", len), &items, |b, items| {
            b.iter_batched(
                || items.clone(),
                |mut items| {
                    reorder_slice(&mut items, 0, len - 1);
                    black_box(items);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_long_commit,
    bench_moves_without_commit,
    bench_reorder_slice
);
criterion_main!(benches);
