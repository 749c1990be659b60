//! Prompt construction for extraction and itinerary generation
//!
//! Both prompts are plain strings; the extraction schema defined here is
//! what [`crate::trip::parse`] expects back.

use std::fmt::Write;

use crate::trip::TripRequest;

/// System instructions sent with every completion
pub const SYSTEM_INSTRUCTIONS: &str = "You are a precise travel assistant.";

/// Labels the model must emit, one per line, in this order
pub const EXTRACTION_FIELDS: [&str; 4] = ["Source", "Destination", "Days", "Budget"];

/// Currency the budget ceiling is expressed in
pub const BUDGET_CURRENCY: &str = "INR";

/// Rules appended to every itinerary request
const ITINERARY_RULES: &[&str] = &[
    "Do NOT exceed the budget",
    "Suggest low-cost transport and stays",
    "Mention approximate costs per day",
    "Make a realistic day-wise plan",
    "Start each day with a heading line like \"Day 1:\"",
    "Use simple bullet points starting with \"- \"",
    "Do not use markdown symbols like ### or ** or __",
];

/// Build the prompt asking the model to pull trip fields out of an utterance
#[must_use]
pub fn build_extraction_prompt(utterance: &str) -> String {
    let mut prompt = String::from("Extract travel details.\n\nSentence:\n");
    prompt.push_str(utterance);
    prompt.push_str("\n\nReturn exactly in this format:\n");

    for field in EXTRACTION_FIELDS {
        prompt.push_str(field);
        prompt.push_str(":\n");
    }

    prompt
}

/// Build the prompt asking the model for a day-by-day itinerary
#[must_use]
pub fn build_itinerary_prompt(trip: &TripRequest) -> String {
    let mut prompt = format!(
        "Create a {days}-day budget-friendly travel itinerary.\n\n\
         Source: {source}\n\
         Destination: {destination}\n\
         Days: {days}\n\
         Budget: {budget} {BUDGET_CURRENCY}\n\n\
         Rules:\n",
        source = trip.source_or_empty(),
        destination = trip.destination_or_empty(),
        days = trip.days,
        budget = trip.budget,
    );

    for rule in ITINERARY_RULES {
        let _ = writeln!(prompt, "- {rule}");
    }

    prompt.push_str("\nOutput format:\nDay 1:\nDay 2:\n");
    prompt
}
