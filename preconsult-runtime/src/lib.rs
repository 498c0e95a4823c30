pub mod insight;
pub mod scripted;
pub mod secrets;
pub mod speech_in;
pub mod speech_out;

pub use insight::GroqInsightBackend;
pub use scripted::{ConsoleSpeaker, ScriptedSpeechInput};
pub use speech_in::{CommandAudioSource, ElevenLabsTranscriber, MicSpeechInput};
pub use speech_out::{CommandSpeaker, ElevenLabsSpeaker};
