//! Knowledge lookup module
//!
//! Best-effort encyclopedia context for an episode. A lookup either finds one
//! article, finds nothing, or finds a disambiguation page; only the first
//! case enriches the episode text.

mod error;
mod wikipedia;

pub use error::LookupError;
pub use wikipedia::{LookupOutcome, WikiArticle, WikipediaClient};
