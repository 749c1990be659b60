//! Trip Concierge - voice-driven trip planning assistant
//!
//! This library provides the core functionality for the concierge:
//! - Prompt building for detail extraction and itinerary generation
//! - Parsing of the model's labelled trip details
//! - Itinerary normalization for display and speech
//! - The session flow that ties capture, extraction, generation and speech together
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   CLI host (concierge)               │
//! │        Speak  │  Generate  │  Listen  │  Reset       │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  SessionFlow                         │
//! │   prompt  │  trip::parse  │  itinerary  │  state     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Collaborators                        │
//! │   Whisper  │  OpenRouter  │  Unsplash  │  OpenAI TTS │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod itinerary;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod setup;
pub mod trip;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use itinerary::{DaySegment, normalize_for_display, split_days, to_speech_text};
pub use prompt::{build_extraction_prompt, build_itinerary_prompt};
pub use providers::{Completion, ImageSearch, SpeechSynthesizer, Transcriber};
pub use session::{
    Action, Collaborators, FlowSettings, Notice, SessionFlow, SessionPhase, SessionState,
};
pub use trip::{MandatoryField, ParseFailure, TripRequest, parse};
