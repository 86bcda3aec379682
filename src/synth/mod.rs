// Voice pool, audio-thread engine, and the control/audio message plumbing.

pub mod engine;
#[cfg(feature = "rtrb")]
pub mod handle;
pub mod message;
pub mod poly;
pub mod voice;

pub use engine::Engine;
#[cfg(feature = "rtrb")]
pub use handle::{channel, RtEngine, SendError, SynthHandle};
pub use message::{EventSender, MessageReceiver, MeterSnapshot, SynthEvent, SynthMessage};
pub use poly::{PolySynth, TriggerError};
pub use voice::Voice;
