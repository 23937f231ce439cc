//! # Extraction Module
//!
//! Turns episode text into structured answers through the LLM gateway.
//!
//! ## Key Components
//!
//! - `DateLabel` / `DateRange`: signed four-digit year labels and the model's answer
//! - `parse_date_response` / `ModelOutcome`: structural parsing and the tagged per-call outcome
//! - `DateExtractor`: the bounded retry loop with rising temperature
//! - `extract_search_term`: the one-shot search phrase call used for enrichment

mod config;
mod date_range;
mod label;
mod parser;
mod search_term;

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use date_range::{Attempt, DateExtraction, DateExtractor, extract_date_range};
pub use label::{DateLabel, DateRange, is_valid_date_label};
pub use parser::{ModelOutcome, ParseError, parse_date_response};
pub use search_term::{extract_search_term, extract_search_term_with};
