//! Itinerary normalization for display and speech
//!
//! The model is told not to emit markup but is not trusted to comply.
//! [`normalize_for_display`] brings any response to one shape:
//!
//! - `Day N: title` heading lines, each preceded by one blank line
//! - `- ` bullets regardless of the marker the model used
//! - no heading, emphasis, code or rule markup
//!
//! Normalizing already-normalized text returns it unchanged.

use std::sync::LazyLock;

use regex::Regex;

/// Day heading as written by the model once markup is gone
static DAY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^day\s*(\d+)\s*(?:[:.)\-–—]\s*)?(.*)$").expect("valid regex")
});

/// Markdown link, replaced by its text for speech
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"));

/// Bullet markers the model uses, all rendered as `- `
const BULLET_MARKERS: &[&str] = &["- ", "* ", "• ", "+ ", "– ", "— ", "· "];

/// Bullet marker used in normalized output
const BULLET: &str = "- ";

/// Symbols that must never reach speech synthesis
const UNSPOKEN_SYMBOLS: &[char] = &['#', '*', '_', '`', '~', '|', '>'];

/// One day of a normalized itinerary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySegment {
    /// Day number, `None` for text before the first heading
    pub day: Option<u32>,

    /// Heading line, empty for the preamble
    pub heading: String,

    /// Lines under the heading
    pub body: String,
}

/// A cleaned line of itinerary text
enum Line {
    Blank,
    Heading { day: u32, title: String },
    Bullet(String),
    Text(String),
}

impl Line {
    fn render(&self) -> String {
        match self {
            Self::Blank => String::new(),
            Self::Heading { day, title } if title.is_empty() => format!("Day {day}:"),
            Self::Heading { day, title } => format!("Day {day}: {title}"),
            Self::Bullet(text) => format!("{BULLET}{text}"),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Condition raw itinerary text into a stable, markup-free display form
#[must_use]
pub fn normalize_for_display(raw: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    for line in raw.lines().map(classify) {
        match line {
            Line::Blank => {
                if out.last().is_some_and(|l| !l.is_empty()) {
                    out.push(String::new());
                }
            }
            Line::Heading { .. } => {
                if out.last().is_some_and(|l| !l.is_empty()) {
                    out.push(String::new());
                }
                out.push(line.render());
            }
            Line::Bullet(_) | Line::Text(_) => out.push(line.render()),
        }
    }

    while out.last().is_some_and(String::is_empty) {
        out.pop();
    }

    out.join("\n")
}

/// Strip every symbol that would be read aloud literally
#[must_use]
pub fn to_speech_text(itinerary: &str) -> String {
    normalize_for_display(itinerary)
        .lines()
        .map(|line| {
            let line = line.strip_prefix(BULLET).unwrap_or(line);
            let line = LINK.replace_all(line, "$1");
            line.chars()
                .filter(|c| !UNSPOKEN_SYMBOLS.contains(c))
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a normalized itinerary into per-day segments
///
/// Text before the first heading becomes a segment with no day number.
#[must_use]
pub fn split_days(itinerary: &str) -> Vec<DaySegment> {
    let mut segments = Vec::new();
    let mut current = DaySegment {
        day: None,
        heading: String::new(),
        body: String::new(),
    };

    for line in itinerary.lines() {
        if let Line::Heading { day, .. } = classify(line) {
            push_segment(&mut segments, current);
            current = DaySegment {
                day: Some(day),
                heading: line.trim().to_string(),
                body: String::new(),
            };
            continue;
        }

        if !current.body.is_empty() {
            current.body.push('\n');
        }
        current.body.push_str(line.trim_end());
    }

    push_segment(&mut segments, current);
    segments
}

fn push_segment(segments: &mut Vec<DaySegment>, mut segment: DaySegment) {
    segment.body = segment.body.trim().to_string();
    if segment.day.is_some() || !segment.body.is_empty() {
        segments.push(segment);
    }
}

fn classify(raw: &str) -> Line {
    let (bullet, text) = strip_line(raw);

    if text.is_empty() || is_rule(&text) {
        return Line::Blank;
    }

    if let Some(caps) = DAY_HEADING.captures(&text) {
        if let Ok(day) = caps[1].parse() {
            return Line::Heading {
                day,
                title: caps[2].trim().to_string(),
            };
        }
    }

    if bullet {
        Line::Bullet(text)
    } else {
        Line::Text(text)
    }
}

/// Remove bullet markers and markup until nothing changes
fn strip_line(raw: &str) -> (bool, String) {
    let mut bullet = false;
    let mut text = raw.trim().to_string();

    loop {
        if let Some(rest) = BULLET_MARKERS.iter().find_map(|m| text.strip_prefix(m)) {
            bullet = true;
            text = rest.trim_start().to_string();
            continue;
        }

        let cleaned = strip_markup(&text);
        if cleaned == text {
            return (bullet, text);
        }
        text = cleaned;
    }
}

fn strip_markup(text: &str) -> String {
    let text: String = text.chars().filter(|c| !matches!(c, '*' | '`')).collect();
    text.replace("__", "")
        .trim_start_matches(|c: char| c == '#' || c == '>' || c.is_whitespace())
        .trim_end()
        .to_string()
}

/// Horizontal rules such as `---` or `===`
fn is_rule(text: &str) -> bool {
    text.chars().count() >= 3 && text.chars().all(|c| matches!(c, '-' | '=' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKDOWN_RESPONSE: &str = "\n\n## Day 1: Arrival in Jaipur\n\
        * **Morning:** Train from Mumbai (₹800)\n\
        * Check in to a hostel\n\n\n\
        ### **Day 2** - Forts\n\
        + Amber Fort\n\
        ---\n\
        - Nahargarh at sunset   \n\n";

    #[test]
    fn strips_markup_and_unifies_bullets() {
        let out = normalize_for_display(MARKDOWN_RESPONSE);

        assert_eq!(
            out,
            "Day 1: Arrival in Jaipur\n\
             - Morning: Train from Mumbai (₹800)\n\
             - Check in to a hostel\n\
             \n\
             Day 2: Forts\n\
             - Amber Fort\n\
             \n\
             - Nahargarh at sunset"
        );
    }

    #[test]
    fn plain_response_only_trimmed() {
        let raw = "  Day 1:\n- Beach\n\nDay 2:\n- Market  \n";
        assert_eq!(normalize_for_display(raw), "Day 1:\n- Beach\n\nDay 2:\n- Market");
    }

    #[test]
    fn headings_get_blank_line_before() {
        let out = normalize_for_display("Intro\nDay 1: A\n- x\nDay 2: B\n- y");
        assert_eq!(out, "Intro\n\nDay 1: A\n- x\n\nDay 2: B\n- y");
    }

    #[test]
    fn heading_variants_are_recognized() {
        for raw in ["Day 3", "DAY 3:", "**Day 3.**", "- Day 3)", "#### day3"] {
            assert_eq!(normalize_for_display(raw), "Day 3:", "input: {raw}");
        }
    }

    #[test]
    fn day_trip_is_not_a_heading() {
        assert_eq!(
            normalize_for_display("- Day trip to Amber"),
            "- Day trip to Amber"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            MARKDOWN_RESPONSE,
            "# - + x",
            "- * __y__",
            "> quoted\n\n\n>> deeper",
            "Day 1: - beach\n***\n`code`",
            "_a_ ___b___",
            "",
        ];

        for raw in inputs {
            let once = normalize_for_display(raw);
            assert_eq!(normalize_for_display(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn speech_text_has_no_symbols() {
        let speech = to_speech_text(MARKDOWN_RESPONSE);

        assert!(!speech.contains(['#', '*', '_', '`']));
        assert!(!speech.lines().any(|l| l.starts_with("- ")));
        assert!(speech.starts_with("Day 1: Arrival in Jaipur\nMorning: Train from Mumbai"));
    }

    #[test]
    fn speech_text_reads_link_text() {
        assert_eq!(
            to_speech_text("See [the fort](https://example.com/fort)"),
            "See the fort"
        );
    }

    #[test]
    fn split_days_groups_lines_under_headings() {
        let text = normalize_for_display("Plan overview\nDay 1: A\n- x\n- y\nDay 2: B\n- z");
        let segments = split_days(&text);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].day, None);
        assert_eq!(segments[0].body, "Plan overview");
        assert_eq!(segments[1].day, Some(1));
        assert_eq!(segments[1].heading, "Day 1: A");
        assert_eq!(segments[1].body, "- x\n- y");
        assert_eq!(segments[2].day, Some(2));
        assert_eq!(segments[2].body, "- z");
    }

    #[test]
    fn split_days_without_headings_is_single_preamble() {
        let segments = split_days("just text");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].day, None);
    }
}
