//! Trip request record
//!
//! A [`TripRequest`] is the structured form of a spoken travel request.
//! Records come out of [`parse`] already complete; the session keeps them
//! read-only once itinerary generation has started.

mod parser;

use std::fmt;

pub use parser::{
    BUDGET_KEYWORDS, CURRENCY_INDICATORS, DAYS_KEYWORD, DESTINATION_KEYWORD, NUMBER_PATTERN,
    SEPARATORS, SOURCE_KEYWORD, parse,
};

/// Trip length used when the model does not mention one
pub const DEFAULT_DAYS: &str = "3";

/// Budget used when the model does not mention one
pub const DEFAULT_BUDGET: &str = "5000";

/// Fields that must be present for a trip to be planned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MandatoryField {
    Source,
    Destination,
}

impl fmt::Display for MandatoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Destination => f.write_str("destination"),
        }
    }
}

/// Failure to turn an extraction response into a trip
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    /// Source or destination never appeared with a value
    #[error("missing mandatory field: {field}")]
    MissingMandatoryField { field: MandatoryField },
}

/// Travel parameters extracted from a user's request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    /// Where the trip starts
    pub source: Option<String>,

    /// Where the trip goes
    pub destination: Option<String>,

    /// Trip length as displayed (not coerced to a number)
    pub days: String,

    /// Spending ceiling, currency-free digits
    pub budget: String,
}

impl Default for TripRequest {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            days: DEFAULT_DAYS.to_string(),
            budget: DEFAULT_BUDGET.to_string(),
        }
    }
}

impl TripRequest {
    /// Create a complete trip request
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        days: impl Into<String>,
        budget: impl Into<String>,
    ) -> Self {
        Self {
            source: Some(source.into()),
            destination: Some(destination.into()),
            days: days.into(),
            budget: budget.into(),
        }
    }

    /// A trip can be planned only when both endpoints are known
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.source.as_deref().is_some_and(|s| !s.trim().is_empty())
            && self
                .destination
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty())
    }

    /// Source, or an empty string when unset
    #[must_use]
    pub fn source_or_empty(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }

    /// Destination, or an empty string when unset
    #[must_use]
    pub fn destination_or_empty(&self) -> &str {
        self.destination.as_deref().unwrap_or_default()
    }

    /// Render the summary shown after extraction
    #[must_use]
    pub fn summary(&self, currency_symbol: &str) -> String {
        format!(
            "Source: {}\nDestination: {}\nDays: {}\nBudget: {currency_symbol}{}",
            self.source_or_empty(),
            self.destination_or_empty(),
            self.days,
            self.budget,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_trip_is_incomplete() {
        let trip = TripRequest::default();
        assert!(!trip.is_complete());
        assert_eq!(trip.days, DEFAULT_DAYS);
        assert_eq!(trip.budget, DEFAULT_BUDGET);
    }

    #[test]
    fn blank_endpoint_is_incomplete() {
        let mut trip = TripRequest::new("delhi", "goa", "3", "5000");
        assert!(trip.is_complete());

        trip.destination = Some("   ".to_string());
        assert!(!trip.is_complete());
    }

    #[test]
    fn summary_lists_all_fields() {
        let trip = TripRequest::new("mumbai", "jaipur", "4", "6000");
        assert_eq!(
            trip.summary("₹"),
            "Source: mumbai\nDestination: jaipur\nDays: 4\nBudget: ₹6000"
        );
    }

    #[test]
    fn missing_field_message_names_field() {
        let failure = ParseFailure::MissingMandatoryField {
            field: MandatoryField::Destination,
        };
        assert_eq!(failure.to_string(), "missing mandatory field: destination");
    }
}
