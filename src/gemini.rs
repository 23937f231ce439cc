//! Gemini API implementation
//!
//! This module provides the minimal REST client used to talk to Google's Gemini API.

mod client;
mod http;
mod models;
mod types;

pub use client::Client;
pub use models::ModelsService;

/// Re-export of types module for public use
pub mod prelude {
    pub use super::types::*;
    pub use crate::error::Error;
    pub use crate::error::Result;
}
