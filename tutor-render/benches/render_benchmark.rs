//! Benchmarks for CPU-side instance generation ahead of GPU upload.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Mat4, Vec3};
use tutor_render::{collect_instances, ScreenUniform, TransformUniform};
use tutor_text::{layout_text, Atlas, GlyphBitmap, GlyphError, GlyphRasterizer};

struct Blocks;

impl GlyphRasterizer for Blocks {
    fn rasterize(&mut self, ch: char, px: u32) -> Result<GlyphBitmap, GlyphError> {
        if ch == ' ' {
            return Ok(GlyphBitmap::blank(px as f32 / 3.0));
        }
        let width = px * 2 / 3;
        Ok(GlyphBitmap {
            width,
            rows: px,
            left: 1,
            top: px as i32,
            advance: [(width + 1) as f32, 0.0],
            pixels: vec![255; (width * px) as usize],
        })
    }
}

fn bench_collect_instances(c: &mut Criterion) {
    let atlas = Atlas::build(&mut Blocks, 24);
    let mut group = c.benchmark_group("collect_instances");
    for &repeat in &[1usize, 10, 100] {
        let text = "The Quick Brown Fox Jumps Over The Lazy Dog ".repeat(repeat);
        let quads = layout_text(&text, &atlas, [8.0, 50.0], [1.0, 1.0]);
        group.bench_with_input(BenchmarkId::from_parameter(quads.len()), &quads, |b, quads| {
            b.iter(|| black_box(collect_instances(black_box(quads), [0.0, 0.0, 0.0, 1.0])));
        });
    }
    group.finish();
}

fn bench_text_frame(c: &mut Criterion) {
    let big = Atlas::build(&mut Blocks, 48);
    let small = Atlas::build(&mut Blocks, 12);

    c.bench_function("text_frame_10_lines", |b| {
        b.iter(|| {
            let mut instances = Vec::new();
            for row in 0..10 {
                let atlas = if row % 2 == 0 { &big } else { &small };
                let quads = layout_text(
                    black_box("The Solid Red Fox Jumps Over The Lazy Dog"),
                    atlas,
                    [8.0, 50.0 * row as f32],
                    [1.0, 1.0],
                );
                instances.extend(collect_instances(&quads, [1.0, 0.0, 0.0, 1.0]));
            }
            black_box(instances)
        });
    });
}

fn bench_uniforms(c: &mut Criterion) {
    c.bench_function("TransformUniform::from", |b| {
        b.iter(|| {
            let m = Mat4::from_translation(Vec3::new(black_box(0.3), 0.0, 0.0))
                * Mat4::from_rotation_z(black_box(1.2));
            black_box(TransformUniform::from(m))
        });
    });
    c.bench_function("ScreenUniform::new", |b| {
        b.iter(|| black_box(ScreenUniform::new(black_box(640.0), black_box(480.0))));
    });
}

criterion_group!(
    benches,
    bench_collect_instances,
    bench_text_frame,
    bench_uniforms,
);
criterion_main!(benches);
