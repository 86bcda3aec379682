//! Benchmarks for wavetable generation.
//!
//! A new table is built on the control thread for every timbre change; this
//! keeps an eye on how long the user waits between keypress and fade.

use std::hint::black_box;

use criterion::Criterion;
use jamboard::{WaveTable, Waveform, HIGHEST_HARMONIC};

pub fn bench_wavetable(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/wavetable");
    let mut table = WaveTable::new();

    group.bench_function("sine", |b| b.iter(|| table.set_sine()));
    group.bench_function("square", |b| b.iter(|| table.set_square()));

    let sparse = {
        let mut h = [0u8; HIGHEST_HARMONIC];
        h[0] = 100;
        h[2] = 40;
        h
    };
    group.bench_function("custom_sparse", |b| {
        b.iter(|| table.set_custom(black_box(sparse)))
    });
    group.bench_function("custom_full", |b| {
        b.iter(|| table.set_custom(black_box([100; HIGHEST_HARMONIC])))
    });

    // Allocation included, as the control thread pays it
    group.bench_function("boxed_from_waveform", |b| {
        b.iter(|| Box::new(WaveTable::from_waveform(black_box(Waveform::Custom(sparse)))))
    });

    group.finish();
}
