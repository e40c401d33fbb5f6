// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use magnetic::{Direction, Host, Magnetic, MagneticConfig, Node, NodeId};
use magnetic_ref::RefHost;
use peniko::Color;

const SIZE: Size = Size::new(1024.0, 768.0);

/// A paused scene with `count` nodes laid out on a grid.
fn grid_scene(count: u32) -> (Magnetic<RefHost>, Vec<NodeId>) {
    let mut magnetic = Magnetic::new(RefHost::new(), SIZE);
    magnetic.host_mut().set_speed(0.0);
    let columns = 32;
    let ids = (0..count)
        .map(|i| {
            let text = format!("node {i}");
            let id = magnetic.insert(Node::circle(Some(text), None, Color::BLACK, 12.0));
            let at = Point::new(
                16.0 + f64::from(i % columns) * 30.0,
                16.0 + f64::from(i / columns) * 30.0,
            );
            magnetic.host_mut().place(id, at);
            id
        })
        .collect();
    (magnetic, ids)
}

fn bench_node_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene/node_at");
    for count in [16_u32, 128, 512] {
        let (magnetic, _) = grid_scene(count);
        group.throughput(Throughput::Elements(1));
        // Worst case: a miss walks every node.
        group.bench_with_input(BenchmarkId::new("miss", count), &magnetic, |b, magnetic| {
            b.iter(|| black_box(magnetic.node_at(black_box(Point::new(-100.0, -100.0)))));
        });
        group.bench_with_input(BenchmarkId::new("hit_first", count), &magnetic, |b, magnetic| {
            b.iter(|| black_box(magnetic.node_at(black_box(Point::new(16.0, 16.0)))));
        });
    }
    group.finish();
}

fn bench_drag_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene/drag_all");
    for count in [16_u32, 128, 512] {
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let (mut magnetic, _) = grid_scene(count);
                    magnetic.touch_began(Point::new(-50.0, -50.0), 0.0);
                    magnetic
                },
                |mut magnetic| {
                    for step in 1..=10 {
                        magnetic.touch_moved(Point::new(-50.0 + f64::from(step), -50.0));
                    }
                    black_box(magnetic);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene/next_selected");
    for count in [16_u32, 128, 512] {
        let (mut magnetic, ids) = grid_scene(count);
        for id in ids.iter().step_by(2) {
            magnetic.select(*id);
        }
        group.bench_with_input(BenchmarkId::from_parameter(count), &magnetic, |b, magnetic| {
            b.iter(|| {
                let mut current = None;
                while let Some(next) = magnetic.next_selected(current, Direction::Forward) {
                    current = Some(next);
                }
                black_box(current)
            });
        });
    }
    group.finish();
}

fn bench_physics_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("ref_host/advance");
    for count in [16_u32, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let config = MagneticConfig {
                        seed: Some(1),
                        ..MagneticConfig::default()
                    };
                    let mut magnetic = Magnetic::with_config(RefHost::new(), SIZE, config);
                    for i in 0..count {
                        magnetic.insert(Node::circle(Some(format!("{i}")), None, Color::BLACK, 12.0));
                    }
                    magnetic
                },
                |mut magnetic| {
                    for _ in 0..60 {
                        magnetic.advance(1.0 / 60.0);
                    }
                    black_box(magnetic);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_node_at,
    bench_drag_all,
    bench_traversal,
    bench_physics_step
);
criterion_main!(benches);
