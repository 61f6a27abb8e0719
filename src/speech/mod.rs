//! Speech processing: transcription and synthesis via vendor HTTP APIs

pub mod stt;
pub mod tts;

pub use stt::{SpeechToText, Transcription};
pub use tts::{resolve_voice, TextToSpeech, DEFAULT_VOICE};
