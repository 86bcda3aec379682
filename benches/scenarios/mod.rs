//! Real-world scenario benchmarks.
//!
//! Full voice pools rendered the way the audio callback renders them.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
