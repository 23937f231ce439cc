//! Parse raw model output into a date range and classify each gateway reply.

use serde::Deserialize;
use thiserror::Error;

use super::label::{DateLabel, DateRange};
use crate::model::GatewayError;

/// Why a reply could not be turned into a date range
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// No JSON object with the two string keys was found
    #[error("invalid structured output: {0}")]
    InvalidFormat(String),

    /// The object parsed, but `start_date` is not a signed four-digit year
    #[error("start_date {0:?} is not a signed four-digit year")]
    InvalidStartDate(String),
}

/// Result of one gateway round trip, as seen by the retry loop
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    /// Structured output with a valid start year
    Parsed(DateRange),
    /// Anything the model said that was not a usable answer
    Malformed(String),
    /// The call itself failed
    Transport(String),
    /// The service refused to answer
    SafetyRejected(String),
}

impl ModelOutcome {
    /// Map a gateway reply onto the outcome taxonomy
    pub fn classify(reply: &Result<String, GatewayError>) -> Self {
        match reply {
            Ok(raw) => match parse_date_response(raw) {
                Ok(range) => ModelOutcome::Parsed(range),
                Err(e) => ModelOutcome::Malformed(e.to_string()),
            },
            Err(GatewayError::Transport(message)) => ModelOutcome::Transport(message.clone()),
            Err(GatewayError::SafetyRejected(reason)) => {
                ModelOutcome::SafetyRejected(reason.clone())
            }
            Err(GatewayError::EmptyResponse) => {
                ModelOutcome::Malformed(GatewayError::EmptyResponse.to_string())
            }
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ModelOutcome::Parsed(_))
    }

    /// Short tag used in log events
    pub fn kind(&self) -> &'static str {
        match self {
            ModelOutcome::Parsed(_) => "parsed",
            ModelOutcome::Malformed(_) => "malformed",
            ModelOutcome::Transport(_) => "transport",
            ModelOutcome::SafetyRejected(_) => "safety_rejected",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDateFields {
    start_date: String,
    end_date: String,
}

/// Parse raw model text and validate the start label.
///
/// Only `start_date` is format-checked. `end_date` is taken as given.
pub fn parse_date_response(raw: &str) -> Result<DateRange, ParseError> {
    let fields = parse_fields(raw)?;

    let start = fields.start_date.trim();
    if !DateLabel::new(start).is_year() {
        return Err(ParseError::InvalidStartDate(start.to_string()));
    }

    Ok(DateRange::new(
        DateLabel::new(start),
        DateLabel::new(fields.end_date.trim()),
    ))
}

fn parse_fields(raw: &str) -> Result<RawDateFields, ParseError> {
    let body = strip_code_fence(raw);

    // The first complete object starting at any brace wins; prose before
    // or after it, braces included, is ignored.
    let mut first_error = None;
    for (open, _) in body.match_indices('{') {
        let mut objects =
            serde_json::Deserializer::from_str(&body[open..]).into_iter::<RawDateFields>();
        match objects.next() {
            Some(Ok(fields)) => return Ok(fields),
            Some(Err(e)) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
            None => {}
        }
    }

    Err(ParseError::InvalidFormat(
        first_error.unwrap_or_else(|| "no JSON object found".to_string()),
    ))
}

/// LLMs sometimes wrap JSON in markdown code blocks
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) up to the first newline.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_json() {
        let range = parse_date_response(r#"{"start_date": "-0053", "end_date": "-0053"}"#).unwrap();
        assert_eq!(range.start.as_str(), "-0053");
        assert_eq!(range.end.as_str(), "-0053");
    }

    #[test]
    fn test_parses_fenced_json() {
        let raw = "```json\n{\"start_date\": \"+1661\", \"end_date\": \"+1888\"}\n```";
        let range = parse_date_response(raw).unwrap();
        assert_eq!(range.start.as_str(), "+1661");
        assert_eq!(range.end.as_str(), "+1888");
    }

    #[test]
    fn test_parses_json_surrounded_by_prose() {
        let raw = "Hier ist die Antwort: {\"start_date\": \"+1750\", \"end_date\": \"+1800\"} Ich hoffe, das hilft.";
        let range = parse_date_response(raw).unwrap();
        assert_eq!(range.start.as_str(), "+1750");
    }

    #[test]
    fn test_braces_in_trailing_prose() {
        let raw = "{\"start_date\": \"+1532\", \"end_date\": \"+1532\"}\n(Hinweis: {geschätzt})";
        let range = parse_date_response(raw).unwrap();
        assert_eq!(range.start.as_str(), "+1532");
        assert_eq!(range.end.as_str(), "+1532");
    }

    #[test]
    fn test_braces_in_leading_prose() {
        let raw = "Antwort {kurz}: {\"start_date\": \"-0053\", \"end_date\": \"-0053\"}";
        let range = parse_date_response(raw).unwrap();
        assert_eq!(range.start.as_str(), "-0053");
    }

    #[test]
    fn test_trims_field_values() {
        let range = parse_date_response(r#"{"start_date": " +1532 ", "end_date": "+1532"}"#).unwrap();
        assert_eq!(range.start.as_str(), "+1532");
    }

    #[test]
    fn test_end_date_is_not_validated() {
        let range = parse_date_response(r#"{"start_date": "+1914", "end_date": "1918er"}"#).unwrap();
        assert!(range.start.is_year());
        assert_eq!(range.end.as_str(), "1918er");
        assert!(!range.end.is_year());
    }

    #[test]
    fn test_start_before_end_is_not_checked() {
        let range = parse_date_response(r#"{"start_date": "+1945", "end_date": "+1939"}"#).unwrap();
        assert_eq!(range.start.as_str(), "+1945");
        assert_eq!(range.end.as_str(), "+1939");
    }

    #[test]
    fn test_invalid_start_is_rejected() {
        let result = parse_date_response(r#"{"start_date": "1950s", "end_date": "+1959"}"#);
        assert_eq!(result, Err(ParseError::InvalidStartDate("1950s".to_string())));
    }

    #[test]
    fn test_structural_failures() {
        for raw in [
            "",
            "keine Ahnung",
            r#"{"start_date": "+1950"}"#,
            r#"{"start_date": 1950, "end_date": 1960}"#,
            r#"["+1950", "+1960"]"#,
            "} {",
        ] {
            assert!(
                matches!(parse_date_response(raw), Err(ParseError::InvalidFormat(_))),
                "{raw:?} should be a structural failure"
            );
        }
    }

    #[test]
    fn test_classify_covers_every_reply() {
        let ok = Ok(r#"{"start_date": "+1532", "end_date": "+1532"}"#.to_string());
        assert!(ModelOutcome::classify(&ok).is_parsed());

        let bad = Ok(r#"{"start_date": "Unknown", "end_date": "Unknown"}"#.to_string());
        assert_eq!(ModelOutcome::classify(&bad).kind(), "malformed");

        let transport = Err(GatewayError::Transport("timeout".to_string()));
        assert_eq!(
            ModelOutcome::classify(&transport),
            ModelOutcome::Transport("timeout".to_string())
        );

        let safety = Err(GatewayError::SafetyRejected("SAFETY".to_string()));
        assert_eq!(ModelOutcome::classify(&safety).kind(), "safety_rejected");

        let empty = Err(GatewayError::EmptyResponse);
        assert_eq!(ModelOutcome::classify(&empty).kind(), "malformed");
    }
}
