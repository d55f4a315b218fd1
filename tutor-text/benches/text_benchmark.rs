use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tutor_text::{layout_text, measure_text, Atlas, GlyphBitmap, GlyphError, GlyphRasterizer};

/// Synthetic 24x32 glyphs so the benchmark does not depend on system fonts.
struct SolidGlyphs;

impl GlyphRasterizer for SolidGlyphs {
    fn rasterize(&mut self, ch: char, pixel_height: u32) -> Result<GlyphBitmap, GlyphError> {
        if ch == ' ' {
            return Ok(GlyphBitmap::blank(pixel_height as f32 / 3.0));
        }
        let width = pixel_height / 2;
        Ok(GlyphBitmap {
            width,
            rows: pixel_height,
            left: 1,
            top: pixel_height as i32 * 3 / 4,
            advance: [(width + 2) as f32, 0.0],
            pixels: vec![200u8; (width * pixel_height) as usize],
        })
    }
}

fn bench_atlas_build(c: &mut Criterion) {
    c.bench_function("atlas_build_48px", |b| {
        b.iter(|| Atlas::build(&mut SolidGlyphs, black_box(48)));
    });
}

fn bench_layout_line(c: &mut Criterion) {
    let atlas = Atlas::build(&mut SolidGlyphs, 48);
    let line = "The Quick Brown Fox Jumps Over The Lazy Dog";

    c.bench_function("layout_line", |b| {
        b.iter(|| layout_text(black_box(line), &atlas, [8.0, 50.0], [1.0, 1.0]));
    });
}

fn bench_layout_paragraph(c: &mut Criterion) {
    let atlas = Atlas::build(&mut SolidGlyphs, 24);
    let paragraph = "The Small Font Sized Fox Jumps Over The Lazy Dog. ".repeat(40);

    c.bench_function("layout_paragraph", |b| {
        b.iter(|| layout_text(black_box(&paragraph), &atlas, [8.0, 200.0], [1.0, 1.0]));
    });
}

fn bench_measure(c: &mut Criterion) {
    let atlas = Atlas::build(&mut SolidGlyphs, 12);

    c.bench_function("measure_line", |b| {
        b.iter(|| measure_text(black_box("The Tiny Font Sized Fox Jumps Over The Lazy Dog"), &atlas, 1.0));
    });
}

criterion_group!(
    benches,
    bench_atlas_build,
    bench_layout_line,
    bench_layout_paragraph,
    bench_measure,
);
criterion_main!(benches);
