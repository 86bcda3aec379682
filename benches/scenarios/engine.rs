//! Benchmarks for the message-driven engine.
//!
//! Same rendering as the pool benchmarks, plus draining control messages
//! and publishing events each block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use jamboard::{notes, synth, SynthConfig, NUM_CHANNELS};

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * NUM_CHANNELS];
        let config = SynthConfig::new().start_gain(1.0);
        let (mut handle, mut engine) = synth::channel(&config);

        // One note per block, events drained by the "UI" each time
        let mut note = 0u8;
        group.bench_with_input(BenchmarkId::new("note_per_block", size), &size, |b, _| {
            b.iter(|| {
                let _ = handle.trigger(notes::A3 + note % 24);
                note = note.wrapping_add(1);
                engine.render(black_box(&mut buffer), NUM_CHANNELS);
                handle.poll_events().count()
            })
        });
    }

    group.finish();
}
