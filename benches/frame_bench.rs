//! Frame parsing and transition benchmarks.

// criterion builders return `&mut Self`; criterion_group! emits an
// undocumented pub fn.
#![allow(missing_docs, unused_results)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use molviz::frame::parse_frame;
use molviz::options::Options;
use molviz::scene::MemoryScene;
use molviz::viz::FrameController;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Write as _;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// `count` molecules spread over `species` species, half of them surface.
fn frame_text(count: usize, species: usize) -> String {
    let mut text = String::new();
    for i in 0..count {
        let s = i % species;
        let orient = if s % 2 == 0 { "0 0 0" } else { "0 0 1" };
        let _ = writeln!(
            text,
            "sp{s} {:.4} {:.4} {:.4} {orient}",
            i as f32 * 0.01,
            (i % 97) as f32 * 0.02,
            (i % 13) as f32 * 0.03
        );
    }
    text
}

fn parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_frame");
    let mut rng = StdRng::seed_from_u64(7);

    for count in [100, 1_000, 10_000] {
        let text = frame_text(count, 8);
        group.bench_function(format!("{count}_molecules"), |b| {
            b.iter(|| {
                black_box(parse_frame(
                    Cursor::new(text.as_bytes()),
                    Path::new("bench"),
                    &mut rng,
                ))
            });
        });
    }
    group.finish();
}

fn frame_dir() -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("molviz-bench-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("frame_0000.dat"), frame_text(5_000, 8)).unwrap();
    std::fs::write(dir.join("frame_0001.dat"), frame_text(5_000, 6)).unwrap();
    dir
}

fn transition_benchmark(c: &mut Criterion) {
    let dir = frame_dir();
    let mut controller =
        FrameController::with_seed(MemoryScene::new(), Options::default(), 7);
    controller.set_directory(&dir).unwrap();

    // Alternate so every seek is a real unlink + load.
    let mut next = 0_i64;
    c.bench_function("seek_5000_molecules", |b| {
        b.iter(|| {
            next = 1 - next;
            black_box(controller.seek(next))
        });
    });

    c.bench_function("seek_already_loaded", |b| {
        b.iter(|| black_box(controller.seek(next)));
    });

    let _ = std::fs::remove_dir_all(&dir);
}

criterion_group!(benches, parse_benchmark, transition_benchmark);
criterion_main!(benches);
