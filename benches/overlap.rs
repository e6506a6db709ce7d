use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use wfc_forge::tile::{BuildFlags, TileBuilder};
use wfc_forge::{Engine, EngineConfig, Image};

fn synthetic_input(width: usize, height: usize) -> Image {
    let data: Vec<u8> = (0..width * height).map(|i| ((i * 37 + i / width) % 251) as u8).collect();
    Image::new(data, width, height, 1).unwrap()
}

fn build_10x10_2x2(c: &mut Criterion) {
    let img = synthetic_input(10, 10);
    c.bench_function("build_10x10_tiles_2x2", |b| {
        b.iter(|| TileBuilder::new(2, 2).build(&img).unwrap())
    });
}

fn build_10x10_3x3_augmented(c: &mut Criterion) {
    let img = synthetic_input(10, 10);
    let flags = BuildFlags {
        expand: true,
        xflip: true,
        yflip: true,
        rotate: true,
    };
    c.bench_function("build_10x10_tiles_3x3_augmented", |b| {
        b.iter(|| TileBuilder::new(3, 3).with_flags(flags).build(&img).unwrap())
    });
}

fn generate_10x10_from_2x2(c: &mut Criterion) {
    let img = synthetic_input(10, 10);
    let config = EngineConfig {
        output_width: 10,
        output_height: 10,
        tile_width: 2,
        tile_height: 2,
        flags: BuildFlags::default(),
        seed: Some(1),
    };

    c.bench_function("generate_10x10_from_2x2", |b| {
        b.iter(|| {
            let mut engine = Engine::new(&img, config).unwrap();
            engine.run(None).unwrap();
        })
    });
}

fn generate_20x20_from_3x3(c: &mut Criterion) {
    let img = synthetic_input(20, 20);
    let config = EngineConfig {
        output_width: 20,
        output_height: 20,
        tile_width: 3,
        tile_height: 3,
        flags: BuildFlags {
            expand: true,
            ..BuildFlags::default()
        },
        seed: Some(1),
    };

    c.bench_function("generate_20x20_from_3x3", |b| {
        b.iter(|| {
            let mut engine = Engine::new(&img, config).unwrap();
            engine.run(None).unwrap();
        })
    });
}

criterion_group!(build_bench, build_10x10_2x2, build_10x10_3x3_augmented);
criterion_group!(
    name = generate_bench;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = generate_10x10_from_2x2, generate_20x20_from_3x3
);
criterion_main!(build_bench, generate_bench);
