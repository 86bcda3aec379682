//! Benchmarks for the voice pool mixer.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use jamboard::{notes, MixScaling, PolySynth, SynthConfig, Waveform, MAX_VOICES, NUM_CHANNELS};

use crate::BLOCK_SIZES;

/// A pool with every voice sounding a different note.
fn full_pool(voices: usize, waveform: Waveform) -> PolySynth {
    let config = SynthConfig::new()
        .voices(voices)
        .waveform(waveform)
        .start_gain(1.0);
    let mut synth = PolySynth::new(&config);
    for i in 0..voices {
        let _ = synth.trigger_note(notes::pitch_increment(notes::A3 + i as u8));
    }
    synth
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * NUM_CHANNELS];

        // === DEFAULT POOL ===
        // six voices, square table, the everyday case
        let mut six = full_pool(jamboard::DEFAULT_NUM_VOICES, Waveform::Square);
        group.bench_with_input(BenchmarkId::new("pool_6", size), &size, |b, _| {
            b.iter(|| six.render_block(black_box(&mut buffer), NUM_CHANNELS))
        });

        // === LARGEST POOL ===
        let mut max = full_pool(MAX_VOICES, Waveform::Sine);
        group.bench_with_input(BenchmarkId::new("pool_max", size), &size, |b, _| {
            b.iter(|| max.render_block(black_box(&mut buffer), NUM_CHANNELS))
        });

        // === IDLE POOL ===
        // nothing triggered: cost of skipping silent voices
        let mut idle = PolySynth::new(&SynthConfig::new().start_gain(1.0));
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| idle.render_block(black_box(&mut buffer), NUM_CHANNELS))
        });

        // === DRONE ===
        let config = SynthConfig::continuous()
            .mix_scaling(MixScaling::Sum)
            .start_gain(1.0);
        let mut drone = PolySynth::new(&config);
        let _ = drone.trigger_note(notes::pitch_increment(notes::A2));
        group.bench_with_input(BenchmarkId::new("drone", size), &size, |b, _| {
            b.iter(|| drone.render_block(black_box(&mut buffer), NUM_CHANNELS))
        });
    }

    group.finish();
}
