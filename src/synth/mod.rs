// Purpose: Voice lifetime and the one-voice-at-a-time engine
// This layer sits above graph nodes and decides what is allowed to sound

pub mod engine;
pub mod message;
pub mod voice;

pub use engine::{ActiveNote, EngineState, MonoEngine};
pub use message::{VoiceEvent, VoiceId};
pub use voice::{ToneVoice, VoiceHandle, DECAY_SECONDS};
