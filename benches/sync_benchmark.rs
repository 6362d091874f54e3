#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for limit propagation and projection rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orthoproj_viz::prelude::*;

fn set_lim_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_lim");

    for (view, dim) in [
        (ViewId::Xy, Dim::X),
        (ViewId::Yz, Dim::X),
        (ViewId::ThreeD, Dim::Z),
    ] {
        let mut proj = OrthoProj::new(None).expect("default figure should be creatable");
        group.bench_function(BenchmarkId::from_parameter(format!("{view}_{dim}")), |b| {
            let mut k = 0.0f32;
            b.iter(|| {
                k += 1.0;
                proj.set_lim(view, dim, black_box(Limits::new(-k, k)))
                    .expect("set_lim should succeed")
            });
        });
    }

    group.finish();
}

fn plot_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("plot_autoscale");

    for size in [100, 1_000, 10_000] {
        let t: Vec<f32> = (0..size).map(|i| i as f32 * 0.01).collect();
        let x: Vec<f32> = t.iter().map(|t| t.cos()).collect();
        let y: Vec<f32> = t.iter().map(|t| t.sin()).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut proj = OrthoProj::new(None).expect("default figure should be creatable");
                proj.plot(black_box(&x), black_box(&y), black_box(&t), &PlotStyles::new())
                    .expect("plot should succeed");
                proj
            });
        });
    }

    group.finish();
}

fn render_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let xs: Vec<f32> = (0..30).map(|i| i as f32 / 5.0 - 3.0).collect();
    let grid = Grid::from_fn(&xs, &xs, |x, y| (x * x + y * y).sqrt().sin())
        .expect("grid should be rectangular");
    let mut proj = OrthoProj::new(Some("Surface")).expect("default figure should be creatable");
    proj.plot_surface(&grid, &PlotStyles::new()).expect("surface should plot");

    group.bench_function("raster", |b| {
        b.iter(|| proj.to_framebuffer().expect("raster render should succeed"));
    });
    group.bench_function("svg", |b| {
        b.iter(|| proj.to_svg().expect("svg render should succeed"));
    });

    group.finish();
}

criterion_group!(benches, set_lim_benchmark, plot_benchmark, render_benchmark);
criterion_main!(benches);
