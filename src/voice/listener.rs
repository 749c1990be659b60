//! Transcription collaborators: live microphone and typed text

use std::time::Duration;

use async_trait::async_trait;

use super::capture::{SAMPLE_RATE, record_utterance, samples_to_wav};
use super::stt::SpeechToText;
use crate::providers::Transcriber;

/// Records one utterance from the microphone and transcribes it
pub struct MicrophoneTranscriber {
    stt: SpeechToText,
    max_listen: Duration,
}

impl MicrophoneTranscriber {
    /// Create a transcriber listening for at most `max_listen`
    #[must_use]
    pub const fn new(stt: SpeechToText, max_listen: Duration) -> Self {
        Self { stt, max_listen }
    }
}

#[async_trait]
impl Transcriber for MicrophoneTranscriber {
    async fn transcribe(&self) -> Option<String> {
        let max_listen = self.max_listen;

        // cpal streams are not Send; keep the whole recording on one thread
        let recorded = tokio::task::spawn_blocking(move || record_utterance(max_listen)).await;

        let samples = match recorded {
            Ok(Ok(Some(samples))) => samples,
            Ok(Ok(None)) => {
                tracing::info!("no speech detected");
                return None;
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "microphone recording failed");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "recording task failed");
                return None;
            }
        };

        let wav = match samples_to_wav(&samples, SAMPLE_RATE) {
            Ok(wav) => wav,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode recording");
                return None;
            }
        };

        match self.stt.transcribe(wav).await {
            Ok(text) => non_blank(text),
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed");
                None
            }
        }
    }
}

/// Transcriber that "hears" a fixed piece of text
///
/// Used when the request is typed instead of spoken.
#[derive(Debug, Clone)]
pub struct TypedUtterance {
    text: String,
}

impl TypedUtterance {
    /// Create a transcriber returning `text`
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Transcriber for TypedUtterance {
    async fn transcribe(&self) -> Option<String> {
        non_blank(self.text.clone())
    }
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
