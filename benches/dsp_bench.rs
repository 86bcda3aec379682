//! Benchmarks for the synth core.
//!
//! Run with: cargo bench
//!
//! Everything here runs on the audio thread (or, for table regeneration,
//! right before a table is handed to it), so it has to finish well inside
//! the callback deadline.
//!
//! Reference timing at 44.1kHz sample rate:
//!   - 64 samples  = 1.45ms deadline
//!   - 128 samples = 2.90ms deadline
//!   - 256 samples = 5.80ms deadline
//!   - 512 samples = 11.61ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Envelope evaluation and wavetable generation
//!   - scenarios/*  Full voice pools and the message-driven engine

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_envelope,
    dsp::bench_wavetable,
    scenarios::bench_voices,
    scenarios::bench_engine,
);
criterion_main!(benches);
