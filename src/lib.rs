//! # Zeitsprung - Dating History Podcast Episodes with an LLM
//!
//! This crate walks the episode pages of the "Geschichten aus der Geschichte"
//! podcast and asks a generative model which historical time span each
//! episode covers. Results are appended to two semicolon-separated files,
//! one for dated episodes and one for everything the model could not date.
//!
//! ## Features
//!
//! - Episode page crawling and show-note extraction
//! - Optional Wikipedia enrichment through a model-chosen search term
//! - A bounded date-extraction loop with rising sampling temperature
//! - Strict validation of signed four-digit year labels
//! - Gemini REST client with client-side rate limiting
//! - A scripted mock model for tests
//! - Async API with Tokio, structured logging with tracing
//!
//! ## Example
//!
//! ```rust,no_run
//! use zeitsprung::extraction::extract_date_range;
//! use zeitsprung::gemini::Client;
//! use zeitsprung::model::GeminiModel;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::with_api_key("your-api-key")?;
//!     let model = GeminiModel::new(client, "gemini-2.0-flash");
//!
//!     let text = "Titel: Die Schlacht bei Carrhae\nZusammenfassung: Crassus zieht gegen die Parther.";
//!     let range = extract_date_range(&model, text, 4).await;
//!
//!     println!("{} bis {}", range.start, range.end);
//!     Ok(())
//! }
//! ```

mod error;

pub mod crawler;
pub mod episode;
pub mod extraction;
pub mod gemini;
pub mod knowledge;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod settings;

pub use error::Error;

/// Re-export of the types most callers need
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::extraction::{DateLabel, DateRange};
    pub use crate::model::{GatewayError, SamplingParams, TextModel};
    pub use crate::output::EpisodeRecord;
    pub use crate::pipeline::{EpisodePipeline, RunSummary};
    pub use crate::settings::Settings;
}
