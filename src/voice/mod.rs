//! Voice input and output
//!
//! Microphone capture with voice-activity segmentation, Whisper
//! transcription, `OpenAI` speech synthesis and MP3 playback.

mod activity;
mod capture;
mod listener;
mod playback;
mod stt;
mod tts;

pub use activity::{ActivityState, VoiceActivityDetector, rms};
pub use capture::{Microphone, SAMPLE_RATE, record_utterance, samples_to_wav};
pub use listener::{MicrophoneTranscriber, TypedUtterance};
pub use playback::AudioPlayback;
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
