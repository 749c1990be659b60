//! Planning session: state, notices and the flow controller
//!
//! A session walks one spoken request through
//! capture → extract → generate → speak, with reset available at any point.

mod flow;
mod state;

use std::fmt;

pub use flow::{Collaborators, FlowSettings, SessionFlow};
pub use state::SessionState;

use crate::trip::ParseFailure;

/// Where a session is in the planning flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No request yet
    Empty,
    /// Utterance captured, details not extracted yet
    Captured,
    /// Extraction completion in flight
    Extracting,
    /// Trip details ready; waiting for the user to ask for an itinerary
    DetailsReady,
    /// Itinerary completion and image search in flight
    Generating,
    /// Itinerary on display
    ItineraryReady,
    /// Speech synthesis in flight
    Speaking,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Captured => "captured",
            Self::Extracting => "extracting",
            Self::DetailsReady => "details ready",
            Self::Generating => "generating",
            Self::ItineraryReady => "itinerary ready",
            Self::Speaking => "speaking",
        };
        f.write_str(name)
    }
}

/// User actions that drive the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Capture,
    Extract,
    Generate,
    Speak,
    Reset,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Capture => "capture",
            Self::Extract => "extract",
            Self::Generate => "generate",
            Self::Speak => "speak",
            Self::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// Recoverable, user-facing outcome of a session step
///
/// Collaborator failures are converted into notices where the call is made;
/// none of them ends the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Notice {
    /// Nothing intelligible was heard
    #[error("Could not understand your voice. Please try again.")]
    TranscriptionEmpty,

    /// The extraction response lacked a source or destination
    #[error("Please mention at least source and destination.")]
    ExtractionParseFailure(ParseFailure),

    /// The completion call failed; message shown verbatim
    #[error("{0}")]
    CompletionTransportError(String),

    /// Destination photos could not be fetched
    #[error("Destination photos unavailable: {0}")]
    ImageSearchTransportError(String),

    /// Speech synthesis failed
    #[error("Could not read the itinerary aloud: {0}")]
    SpeechSynthesisFailed(String),

    /// The action is not available in the current phase
    #[error("Cannot {action} while the session is {phase}.")]
    NotAllowed {
        action: Action,
        phase: SessionPhase,
    },
}
