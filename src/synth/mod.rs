// Purpose: Voice lifecycle and polyphony
// This layer sits between the graph nodes and the engine: it owns one voice
// per note and defines the messages crossing the control/audio boundary.

pub mod message;
pub mod poly;
pub mod voice;

pub use poly::VoiceManager;
pub use voice::{Voice, VoiceState};
