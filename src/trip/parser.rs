//! Detail parser for extraction responses
//!
//! The model is asked for four labelled lines but is not trusted to follow
//! the format. Every line is trimmed and lower-cased, then classified by the
//! first labelling keyword it contains:
//!
//! - `source` / `destination`: the text after the first colon-like
//!   separator is the value. The first line with a non-empty value wins.
//! - days / budget: the first number anywhere on the line is the value,
//!   so prose such as "approximately 4 days" or "around ₹5,000" still parses.

use std::sync::LazyLock;

use regex::Regex;

use super::{DEFAULT_BUDGET, DEFAULT_DAYS, MandatoryField, ParseFailure, TripRequest};

/// Keyword marking the source line
pub const SOURCE_KEYWORD: &str = "source";

/// Keyword marking the destination line
pub const DESTINATION_KEYWORD: &str = "destination";

/// Substring of any token marking the trip length line ("day", "days", "days:")
pub const DAYS_KEYWORD: &str = "day";

/// Substrings of any token marking the budget line
pub const BUDGET_KEYWORDS: &[&str] = &["budget"];

/// Tokens marking a line as a money amount. Symbols match anywhere in a
/// token; words must stand alone or directly prefix a number ("rs5000").
pub const CURRENCY_INDICATORS: &[&str] = &["₹", "$", "€", "£", "rs", "inr", "rupees"];

/// Characters separating a label from its value
pub const SEPARATORS: &[char] = &[':', '：'];

/// First number on a line; digit groups such as "5,000" or "1,00,000" are
/// accepted and the commas dropped
pub const NUMBER_PATTERN: &str = r"\d{1,3}(?:,\d{2,3})+\b|\d+";

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NUMBER_PATTERN).expect("valid regex"));

/// Markup and punctuation the model wraps around values
const VALUE_TRIM: &[char] = &['*', '_', '`', '"', '\'', '.', ',', '#'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Source,
    Destination,
    Days,
    Budget,
}

/// Fields collected while scanning; each slot is filled at most once
#[derive(Debug, Default)]
struct Draft {
    source: Option<String>,
    destination: Option<String>,
    days: Option<String>,
    budget: Option<String>,
}

impl Draft {
    fn slot(&mut self, label: Label) -> &mut Option<String> {
        match label {
            Label::Source => &mut self.source,
            Label::Destination => &mut self.destination,
            Label::Days => &mut self.days,
            Label::Budget => &mut self.budget,
        }
    }
}

/// Parse a model's extraction response into a complete trip request
///
/// # Errors
///
/// Returns [`ParseFailure::MissingMandatoryField`] if no line supplied a
/// source or a destination
pub fn parse(model_output: &str) -> Result<TripRequest, ParseFailure> {
    let mut draft = Draft::default();

    for raw in model_output.lines() {
        let line = raw.trim().to_lowercase();
        let Some(label) = classify(&line) else {
            continue;
        };

        let slot = draft.slot(label);
        if slot.is_some() {
            tracing::trace!(?label, line = %line, "duplicate label ignored");
            continue;
        }

        *slot = match label {
            Label::Source | Label::Destination => labelled_value(&line),
            Label::Days | Label::Budget => first_number(&line),
        };
    }

    let Draft {
        source,
        destination,
        days,
        budget,
    } = draft;

    if source.is_none() {
        tracing::debug!("extraction response has no source");
        return Err(ParseFailure::MissingMandatoryField {
            field: MandatoryField::Source,
        });
    }
    if destination.is_none() {
        tracing::debug!("extraction response has no destination");
        return Err(ParseFailure::MissingMandatoryField {
            field: MandatoryField::Destination,
        });
    }

    let trip = TripRequest {
        source,
        destination,
        days: days.unwrap_or_else(|| DEFAULT_DAYS.to_string()),
        budget: budget.unwrap_or_else(|| DEFAULT_BUDGET.to_string()),
    };

    tracing::debug!(?trip, "parsed trip details");
    Ok(trip)
}

/// Pick the label a lower-cased line carries, checked in schema order
fn classify(line: &str) -> Option<Label> {
    if line.contains(SOURCE_KEYWORD) {
        return Some(Label::Source);
    }
    if line.contains(DESTINATION_KEYWORD) {
        return Some(Label::Destination);
    }
    if tokens(line).any(|t| t.contains(DAYS_KEYWORD)) {
        return Some(Label::Days);
    }
    if tokens(line).any(is_budget_token) {
        return Some(Label::Budget);
    }
    None
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || SEPARATORS.contains(&c))
        .filter(|t| !t.is_empty())
}

fn is_budget_token(token: &str) -> bool {
    if BUDGET_KEYWORDS.iter().any(|k| token.contains(k)) {
        return true;
    }

    CURRENCY_INDICATORS.iter().any(|indicator| {
        if indicator.chars().all(char::is_alphabetic) {
            let bare = token.trim_matches(|c: char| !c.is_alphanumeric());
            bare == *indicator
                || bare
                    .strip_prefix(indicator)
                    .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        } else {
            token.contains(indicator)
        }
    })
}

/// Text after the first separator, stripped of wrapping markup
fn labelled_value(line: &str) -> Option<String> {
    let (_, value) = line.split_once(SEPARATORS)?;
    let value = value.trim_matches(|c: char| c.is_whitespace() || VALUE_TRIM.contains(&c));

    (!value.is_empty()).then(|| value.to_string())
}

fn first_number(line: &str) -> Option<String> {
    NUMBER_REGEX
        .find(line)
        .map(|m| m.as_str().replace(',', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_schema() {
        let trip = parse("Source: Mumbai\nDestination: Jaipur\nDays: 4\nBudget: 6000").unwrap();

        assert_eq!(trip, TripRequest::new("mumbai", "jaipur", "4", "6000"));
        assert!(trip.is_complete());
    }

    #[test]
    fn order_and_case_do_not_matter() {
        let trip = parse("DESTINATION: Goa\nsome chatter\nsource: DELHI").unwrap();

        assert_eq!(trip.source.as_deref(), Some("delhi"));
        assert_eq!(trip.destination.as_deref(), Some("goa"));
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        let output = "Sure! Here are the details.\n\nSource: Delhi\nNote: prices vary\nDestination: Goa\nHope this helps";
        let trip = parse(output).unwrap();

        assert_eq!(trip.source.as_deref(), Some("delhi"));
        assert_eq!(trip.destination.as_deref(), Some("goa"));
        assert_eq!(trip.days, DEFAULT_DAYS);
        assert_eq!(trip.budget, DEFAULT_BUDGET);
    }

    #[test]
    fn missing_destination_fails() {
        let err = parse("Source: Delhi\nDays: 5\nBudget: 9000").unwrap_err();
        assert_eq!(
            err,
            ParseFailure::MissingMandatoryField {
                field: MandatoryField::Destination
            }
        );
    }

    #[test]
    fn missing_source_fails() {
        let err = parse("Destination: Goa").unwrap_err();
        assert_eq!(
            err,
            ParseFailure::MissingMandatoryField {
                field: MandatoryField::Source
            }
        );
    }

    #[test]
    fn empty_value_does_not_count() {
        let err = parse("Source:\nDestination: Goa").unwrap_err();
        assert_eq!(
            err,
            ParseFailure::MissingMandatoryField {
                field: MandatoryField::Source
            }
        );
    }

    #[test]
    fn first_occurrence_wins() {
        let trip = parse("Source: Pune\nDestination: Goa\nSource: Nagpur").unwrap();
        assert_eq!(trip.source.as_deref(), Some("pune"));
    }

    #[test]
    fn days_taken_from_prose() {
        let trip = parse("Source: A\nDestination: B\nDays: around 4 days").unwrap();
        assert_eq!(trip.days, "4");

        let trip = parse("Source: A\nDestination: B\nDuration: approximately 6 days").unwrap();
        assert_eq!(trip.days, "6");
    }

    #[test]
    fn budget_taken_from_prose_and_currency() {
        let trip = parse("Source: A\nDestination: B\nBudget: around ₹5000").unwrap();
        assert_eq!(trip.budget, "5000");

        let trip = parse("Source: A\nDestination: B\nSpend: Rs. 7500").unwrap();
        assert_eq!(trip.budget, "7500");

        let trip = parse("Source: A\nDestination: B\nCost: INR8000 total").unwrap();
        assert_eq!(trip.budget, "8000");
    }

    #[test]
    fn grouped_digits_are_joined() {
        let trip = parse("Source: A\nDestination: B\nBudget: ₹12,500").unwrap();
        assert_eq!(trip.budget, "12500");

        let trip = parse("Source: A\nDestination: B\nBudget: 1,00,000 rupees").unwrap();
        assert_eq!(trip.budget, "100000");
    }

    #[test]
    fn numeric_line_without_digits_keeps_default() {
        let trip = parse("Source: A\nDestination: B\nDays: not specified\nBudget: unknown").unwrap();
        assert_eq!(trip.days, DEFAULT_DAYS);
        assert_eq!(trip.budget, DEFAULT_BUDGET);
    }

    #[test]
    fn names_keep_digits_and_punctuation() {
        let trip = parse("Source: Sector 17, Chandigarh\nDestination: St. Moritz").unwrap();
        assert_eq!(trip.source.as_deref(), Some("sector 17, chandigarh"));
        assert_eq!(trip.destination.as_deref(), Some("st. moritz"));
    }

    #[test]
    fn emphasis_around_values_is_stripped() {
        let trip = parse("**Source:** Delhi\n- **Destination:** *Goa*").unwrap();
        assert_eq!(trip.source.as_deref(), Some("delhi"));
        assert_eq!(trip.destination.as_deref(), Some("goa"));
    }

    #[test]
    fn full_width_colon_is_a_separator() {
        let trip = parse("Source： Kochi\nDestination： Munnar").unwrap();
        assert_eq!(trip.source.as_deref(), Some("kochi"));
        assert_eq!(trip.destination.as_deref(), Some("munnar"));
    }

    #[test]
    fn currency_word_inside_other_word_is_not_budget() {
        assert!(!is_budget_token("hours"));
        assert!(!is_budget_token("first"));
        assert!(is_budget_token("rs."));
        assert!(is_budget_token("₹5000"));
        assert!(is_budget_token("budget:"));
    }

    #[test]
    fn number_pattern_matches_first_run() {
        assert_eq!(first_number("about 4 to 5 days").as_deref(), Some("4"));
        assert_eq!(first_number("no digits here"), None);
    }
}
