//! Voice activity segmentation
//!
//! Splits a microphone stream into a single utterance: recording starts at
//! the first loud chunk and ends once enough speech is followed by silence.

use super::capture::SAMPLE_RATE;

/// Minimum RMS energy to consider a chunk speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum duration of speech for a usable utterance (0.3 s)
const MIN_SPEECH_SAMPLES: usize = (SAMPLE_RATE as usize * 3) / 10;

/// Silence that ends an utterance (0.5 s)
const SILENCE_SAMPLES: usize = SAMPLE_RATE as usize / 2;

/// Progress of the current utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityState {
    /// Waiting for speech
    Waiting,
    /// Speech detected, accumulating
    Speaking,
    /// Speech followed by silence; utterance ready
    Complete,
}

/// Segments one utterance out of a stream of sample chunks
#[derive(Debug)]
pub struct VoiceActivityDetector {
    state: ActivityState,
    buffer: Vec<f32>,
    speech_samples: usize,
    silence_counter: usize,
}

impl Default for VoiceActivityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceActivityDetector {
    /// Create a detector waiting for speech
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ActivityState::Waiting,
            buffer: Vec::new(),
            speech_samples: 0,
            silence_counter: 0,
        }
    }

    /// Feed a chunk of 16 kHz mono samples
    pub fn process(&mut self, samples: &[f32]) -> ActivityState {
        if samples.is_empty() {
            return self.state;
        }

        let energy = rms(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            ActivityState::Waiting => {
                if is_speech {
                    self.state = ActivityState::Speaking;
                    self.buffer.clear();
                    self.buffer.extend_from_slice(samples);
                    self.speech_samples = samples.len();
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech started");
                }
            }
            ActivityState::Speaking => {
                self.buffer.extend_from_slice(samples);

                if is_speech {
                    self.speech_samples += samples.len();
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                if self.silence_counter > SILENCE_SAMPLES
                    && self.speech_samples > MIN_SPEECH_SAMPLES
                {
                    tracing::debug!(samples = self.buffer.len(), "utterance complete");
                    self.state = ActivityState::Complete;
                } else if self.silence_counter > SILENCE_SAMPLES * 2 {
                    tracing::trace!("speech too short, waiting again");
                    self.reset();
                }
            }
            ActivityState::Complete => {}
        }

        self.state
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ActivityState {
        self.state
    }

    /// Consume the detector, returning the utterance if enough speech was heard
    #[must_use]
    pub fn finish(self) -> Option<Vec<f32>> {
        match self.state {
            ActivityState::Complete => Some(self.buffer),
            ActivityState::Speaking if self.speech_samples > MIN_SPEECH_SAMPLES => {
                Some(self.buffer)
            }
            _ => None,
        }
    }

    /// Drop buffered audio and wait for speech again
    pub fn reset(&mut self) {
        self.state = ActivityState::Waiting;
        self.buffer.clear();
        self.speech_samples = 0;
        self.silence_counter = 0;
    }
}

/// Root-mean-square energy of a chunk
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
