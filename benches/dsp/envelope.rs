//! Benchmarks for envelope evaluation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use jamboard::dsp::{Adsr, Envelope};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let adsr = Adsr::default();
    let finite = Envelope::Finite(adsr);

    // One position per phase
    let phases = [
        ("attack", adsr.attack / 2),
        ("decay", adsr.attack + adsr.decay / 2),
        ("sustain", adsr.attack + adsr.decay + adsr.sustain / 2),
        ("release", adsr.total_length() - adsr.release / 2),
    ];

    for &size in BLOCK_SIZES {
        for &(name, start) in &phases {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    let mut acc = 0.0f32;
                    for pos in start..start + size as u32 {
                        acc += finite.calculate(black_box(pos), true);
                    }
                    acc
                })
            });
        }

        let continuous = Envelope::continuous();
        group.bench_with_input(BenchmarkId::new("continuous", size), &size, |b, &size| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for pos in 0..size as u32 {
                    acc += continuous.calculate(black_box(pos), true);
                }
                acc
            })
        });
    }

    group.finish();
}
