//! Share pipeline benchmark: encode, render and overlay a full-size mask.
//!
//! Target: encode + render of a 150×60 mask well under one 50 ms flicker period.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flicker::{overlay, Config, Rgb, RngBits, ShareEncoder, ShareRenderer, TextRasterizer};

fn encode_mask(c: &mut Criterion) {
    let config = Config::default();
    let mask = TextRasterizer::new(&config).rasterize("KX9P2").unwrap();
    let mut encoder = ShareEncoder::new(RngBits::seeded(1));

    c.bench_function("encode_150x60", |b| {
        b.iter(|| encoder.encode(black_box(&mask)))
    });
}

fn render_shares(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_pair");
    let config = Config::default();
    let mask = TextRasterizer::new(&config).rasterize("KX9P2").unwrap();
    let shares = ShareEncoder::new(RngBits::seeded(1)).encode(&mask);

    for scale in [1u16, 2, 4] {
        let renderer = ShareRenderer::new(scale, Rgb::WHITE, Rgb::BLACK);
        group.bench_with_input(BenchmarkId::from_parameter(scale), &scale, |b, _| {
            b.iter(|| renderer.render_pair(black_box(&shares)).unwrap())
        });
    }

    group.finish();
}

fn overlay_shares(c: &mut Criterion) {
    let config = Config::default();
    let mask = TextRasterizer::new(&config).rasterize("KX9P2").unwrap();
    let shares = ShareEncoder::new(RngBits::seeded(1)).encode(&mask);
    let (a, b) = ShareRenderer::from_config(&config)
        .render_pair(&shares)
        .unwrap();

    c.bench_function("overlay_600x240", |bench| {
        bench.iter(|| overlay(black_box(&a), black_box(&b), 128, Rgb::WHITE, Rgb::BLACK).unwrap())
    });
}

criterion_group!(benches, encode_mask, render_shares, overlay_shares);
criterion_main!(benches);
