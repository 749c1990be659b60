//! Session-scoped data

use url::Url;
use uuid::Uuid;

use crate::trip::TripRequest;

/// Everything one planning session has produced so far
///
/// Fields are only changed through methods that keep the invariants:
/// audio never outlives the itinerary it was synthesized from, and a new
/// utterance clears everything derived from the previous one.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    raw_utterance: Option<String>,
    trip: Option<TripRequest>,
    itinerary_text: Option<String>,
    destination_images: Vec<Url>,
    spoken_audio: Option<Vec<u8>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Fresh, empty session
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            raw_utterance: None,
            trip: None,
            itinerary_text: None,
            destination_images: Vec::new(),
            spoken_audio: None,
        }
    }

    /// Session identifier used in logs
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Last transcribed request
    #[must_use]
    pub fn raw_utterance(&self) -> Option<&str> {
        self.raw_utterance.as_deref()
    }

    /// Extracted trip details
    #[must_use]
    pub const fn trip(&self) -> Option<&TripRequest> {
        self.trip.as_ref()
    }

    /// Last generated itinerary, normalized for display
    #[must_use]
    pub fn itinerary_text(&self) -> Option<&str> {
        self.itinerary_text.as_deref()
    }

    /// Destination photos, best match first
    #[must_use]
    pub fn destination_images(&self) -> &[Url] {
        &self.destination_images
    }

    /// Cached speech for the current itinerary
    #[must_use]
    pub fn spoken_audio(&self) -> Option<&[u8]> {
        self.spoken_audio.as_deref()
    }

    /// Trip summary lines, if details have been extracted
    #[must_use]
    pub fn trip_summary(&self, currency_symbol: &str) -> Option<String> {
        self.trip.as_ref().map(|t| t.summary(currency_symbol))
    }

    /// Replace the whole session with one holding only `utterance`
    pub(crate) fn capture(&mut self, utterance: String) {
        *self = Self {
            id: self.id,
            raw_utterance: Some(utterance),
            trip: None,
            itinerary_text: None,
            destination_images: Vec::new(),
            spoken_audio: None,
        };
    }

    /// Drop the trip and everything generated from it, keeping the utterance
    pub(crate) fn clear_trip(&mut self) {
        self.trip = None;
        self.itinerary_text = None;
        self.destination_images.clear();
        self.spoken_audio = None;
    }

    pub(crate) fn set_trip(&mut self, trip: TripRequest) {
        self.clear_trip();
        self.trip = Some(trip);
    }

    /// Store a new itinerary; any cached audio belongs to the old one
    pub(crate) fn set_itinerary(&mut self, text: String) {
        self.itinerary_text = Some(text);
        self.spoken_audio = None;
    }

    pub(crate) fn set_images(&mut self, images: Vec<Url>) {
        self.destination_images = images;
    }

    /// Cache audio for the current itinerary; ignored when there is none
    pub(crate) fn cache_audio(&mut self, audio: Vec<u8>) {
        if self.itinerary_text.is_some() {
            self.spoken_audio = Some(audio);
        } else {
            tracing::warn!(session = %self.id, "discarding audio with no itinerary");
        }
    }

    /// Clear every field at once
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> SessionState {
        let mut state = SessionState::new();
        state.capture("from Pune to Goa".to_string());
        state.set_trip(TripRequest::new("pune", "goa", "3", "5000"));
        state.set_itinerary("Day 1:\n- Beach".to_string());
        state.set_images(vec![Url::parse("https://images.example/1.jpg").unwrap()]);
        state.cache_audio(vec![1, 2, 3]);
        state
    }

    #[test]
    fn capture_clears_downstream() {
        let mut state = populated();
        state.capture("from Delhi to Agra".to_string());

        assert_eq!(state.raw_utterance(), Some("from Delhi to Agra"));
        assert!(state.trip().is_none());
        assert!(state.itinerary_text().is_none());
        assert!(state.destination_images().is_empty());
        assert!(state.spoken_audio().is_none());
    }

    #[test]
    fn new_itinerary_invalidates_audio() {
        let mut state = populated();
        assert!(state.spoken_audio().is_some());

        state.set_itinerary("Day 1:\n- Fort".to_string());
        assert!(state.spoken_audio().is_none());
    }

    #[test]
    fn audio_requires_itinerary() {
        let mut state = SessionState::new();
        state.cache_audio(vec![9]);
        assert!(state.spoken_audio().is_none());
    }

    #[test]
    fn reset_clears_everything_and_renews_id() {
        let mut state = populated();
        let old_id = state.id();
        state.reset();

        assert_ne!(state.id(), old_id);
        assert!(state.raw_utterance().is_none());
        assert!(state.trip().is_none());
        assert!(state.itinerary_text().is_none());
        assert!(state.destination_images().is_empty());
        assert!(state.spoken_audio().is_none());
    }

    #[test]
    fn summary_uses_currency_symbol() {
        let state = populated();
        assert_eq!(
            state.trip_summary("₹").as_deref(),
            Some("Source: pune\nDestination: goa\nDays: 3\nBudget: ₹5000")
        );
    }
}
