//! Session flow controller
//!
//! ```text
//! Empty ─capture→ Captured ─extract→ DetailsReady ─generate→ ItineraryReady ─speak→ ItineraryReady
//!   ▲                 │ parse failure                                     │
//!   └─────────────────┴──────────────── reset (any phase) ────────────────┘
//! ```
//!
//! Every step is user-triggered and runs to completion before the next one;
//! capture is accepted in any phase and discards everything derived from
//! the previous utterance.

use std::sync::Arc;

use super::{Action, Notice, SessionPhase, SessionState};
use crate::config::Config;
use crate::itinerary::{normalize_for_display, to_speech_text};
use crate::prompt::{SYSTEM_INSTRUCTIONS, build_extraction_prompt, build_itinerary_prompt};
use crate::providers::{Completion, ImageSearch, SpeechSynthesizer, Transcriber};
use crate::trip;

/// External services a session calls out to
#[derive(Clone)]
pub struct Collaborators {
    pub transcriber: Arc<dyn Transcriber>,
    pub completion: Arc<dyn Completion>,
    pub images: Arc<dyn ImageSearch>,
    pub speech: Arc<dyn SpeechSynthesizer>,
}

/// Fixed parameters of every completion and image search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSettings {
    /// System instructions sent with both prompts
    pub system_instructions: String,

    /// Output token cap per completion
    pub max_output_tokens: u32,

    /// Photos requested per itinerary; 0 skips the search
    pub image_count: usize,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
            max_output_tokens: 700,
            image_count: crate::config::DEFAULT_IMAGE_COUNT,
        }
    }
}

impl FlowSettings {
    /// Settings taken from the loaded configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
            max_output_tokens: config.llm.max_tokens,
            image_count: config.images.count,
        }
    }
}

/// Drives one planning session through its phases
pub struct SessionFlow {
    collaborators: Collaborators,
    settings: FlowSettings,
    state: SessionState,
    phase: SessionPhase,
}

impl SessionFlow {
    /// Start an empty session
    #[must_use]
    pub fn new(collaborators: Collaborators, settings: FlowSettings) -> Self {
        let state = SessionState::new();
        tracing::debug!(session = %state.id(), "session started");

        Self {
            collaborators,
            settings,
            state,
            phase: SessionPhase::Empty,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Session data produced so far
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Capture a new request from the transcriber
    ///
    /// Accepted in any phase. On success everything derived from an earlier
    /// utterance is dropped and the session moves to `Captured`.
    ///
    /// # Errors
    ///
    /// Returns [`Notice::TranscriptionEmpty`] if nothing was heard; the
    /// session is left exactly as it was
    pub async fn capture(&mut self) -> Result<(), Notice> {
        let heard = self
            .collaborators
            .transcriber
            .transcribe()
            .await
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        let Some(utterance) = heard else {
            tracing::info!(session = %self.state.id(), phase = %self.phase, "nothing heard");
            return Err(Notice::TranscriptionEmpty);
        };

        tracing::info!(session = %self.state.id(), utterance = %utterance, "request captured");
        self.state.capture(utterance);
        self.phase = SessionPhase::Captured;
        Ok(())
    }

    /// Extract trip details from the captured utterance
    ///
    /// # Errors
    ///
    /// - [`Notice::CompletionTransportError`] if the model call fails; the
    ///   session stays `Captured` so the user can try again
    /// - [`Notice::ExtractionParseFailure`] if source or destination is
    ///   missing; the session returns to `Empty` (the utterance is kept for
    ///   display)
    /// - [`Notice::NotAllowed`] outside `Captured`
    pub async fn extract(&mut self) -> Result<(), Notice> {
        self.require(Action::Extract, SessionPhase::Captured)?;
        let Some(utterance) = self.state.raw_utterance().map(str::to_string) else {
            return Err(self.not_allowed(Action::Extract));
        };

        self.phase = SessionPhase::Extracting;
        let prompt = build_extraction_prompt(&utterance);

        let response = match self
            .collaborators
            .completion
            .complete(
                &self.settings.system_instructions,
                &prompt,
                self.settings.max_output_tokens,
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(session = %self.state.id(), error = %e, "extraction call failed");
                self.state.clear_trip();
                self.phase = SessionPhase::Captured;
                return Err(Notice::CompletionTransportError(e.to_string()));
            }
        };

        match trip::parse(&response) {
            Ok(trip) => {
                tracing::info!(
                    session = %self.state.id(),
                    source = trip.source_or_empty(),
                    destination = trip.destination_or_empty(),
                    days = %trip.days,
                    budget = %trip.budget,
                    "trip details extracted"
                );
                self.state.set_trip(trip);
                self.phase = SessionPhase::DetailsReady;
                Ok(())
            }
            Err(failure) => {
                tracing::info!(session = %self.state.id(), %failure, "extraction incomplete");
                self.state.clear_trip();
                self.phase = SessionPhase::Empty;
                Err(Notice::ExtractionParseFailure(failure))
            }
        }
    }

    /// Generate the itinerary and fetch destination photos
    ///
    /// The completion and the photo search run concurrently. A failed photo
    /// search leaves an empty photo list and is reported through the `Ok`
    /// value; it never discards the itinerary.
    ///
    /// # Errors
    ///
    /// - [`Notice::CompletionTransportError`] if the model call fails; the
    ///   session stays `DetailsReady`
    /// - [`Notice::NotAllowed`] outside `DetailsReady` or for an incomplete trip
    pub async fn generate(&mut self) -> Result<Option<Notice>, Notice> {
        self.require(Action::Generate, SessionPhase::DetailsReady)?;
        let Some(trip) = self.state.trip().filter(|t| t.is_complete()).cloned() else {
            return Err(self.not_allowed(Action::Generate));
        };

        self.phase = SessionPhase::Generating;
        let prompt = build_itinerary_prompt(&trip);
        let destination = trip.destination_or_empty();
        let image_count = self.settings.image_count;

        let itinerary = self.collaborators.completion.complete(
            &self.settings.system_instructions,
            &prompt,
            self.settings.max_output_tokens,
        );
        let images = async {
            if image_count == 0 {
                return Ok(Vec::new());
            }
            self.collaborators
                .images
                .search_images(destination, image_count)
                .await
        };

        let (itinerary, images) = tokio::join!(itinerary, images);

        let image_notice = match images {
            Ok(urls) => {
                self.state.set_images(urls);
                None
            }
            Err(e) => {
                tracing::warn!(session = %self.state.id(), error = %e, "image search failed");
                self.state.set_images(Vec::new());
                Some(Notice::ImageSearchTransportError(e.to_string()))
            }
        };

        let text = match itinerary {
            Ok(raw) => normalize_for_display(&raw),
            Err(e) => {
                tracing::warn!(session = %self.state.id(), error = %e, "itinerary call failed");
                self.phase = SessionPhase::DetailsReady;
                return Err(Notice::CompletionTransportError(e.to_string()));
            }
        };

        if text.is_empty() {
            self.phase = SessionPhase::DetailsReady;
            return Err(Notice::CompletionTransportError(
                "The model returned an empty itinerary.".to_string(),
            ));
        }

        tracing::info!(
            session = %self.state.id(),
            destination = trip.destination_or_empty(),
            chars = text.len(),
            images = self.state.destination_images().len(),
            "itinerary generated"
        );
        self.state.set_itinerary(text);
        self.phase = SessionPhase::ItineraryReady;
        Ok(image_notice)
    }

    /// Synthesize the itinerary as speech, reusing cached audio
    ///
    /// # Errors
    ///
    /// - [`Notice::SpeechSynthesisFailed`] if synthesis fails; nothing is cached
    /// - [`Notice::NotAllowed`] outside `ItineraryReady`
    pub async fn speak(&mut self) -> Result<&[u8], Notice> {
        self.require(Action::Speak, SessionPhase::ItineraryReady)?;

        if self.state.spoken_audio().is_none() {
            let Some(itinerary) = self.state.itinerary_text() else {
                return Err(self.not_allowed(Action::Speak));
            };
            let text = to_speech_text(itinerary);

            self.phase = SessionPhase::Speaking;
            let result = self.collaborators.speech.synthesize(&text).await;
            self.phase = SessionPhase::ItineraryReady;

            match result {
                Ok(audio) => {
                    tracing::info!(session = %self.state.id(), bytes = audio.len(), "speech synthesized");
                    self.state.cache_audio(audio);
                }
                Err(e) => {
                    tracing::warn!(session = %self.state.id(), error = %e, "speech synthesis failed");
                    return Err(Notice::SpeechSynthesisFailed(e.to_string()));
                }
            }
        } else {
            tracing::debug!(session = %self.state.id(), "reusing cached speech");
        }

        self.state
            .spoken_audio()
            .ok_or_else(|| Notice::SpeechSynthesisFailed("no audio available".to_string()))
    }

    /// Clear the session; available in every phase
    pub fn reset(&mut self) {
        tracing::info!(session = %self.state.id(), phase = %self.phase, "session reset");
        self.state.reset();
        self.phase = SessionPhase::Empty;
    }

    fn require(&self, action: Action, phase: SessionPhase) -> Result<(), Notice> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(self.not_allowed(action))
        }
    }

    const fn not_allowed(&self, action: Action) -> Notice {
        Notice::NotAllowed {
            action,
            phase: self.phase,
        }
    }
}
