//! Ordskatt: generated Norwegian word entries with etymology and illustration.
//!
//! The hosted generation service sits behind [`WordProvider`]; [`GeminiClient`]
//! is the production implementation. [`ViewController`] drives one fetch cycle
//! at a time over a [`FetchState`], and [`format_etymology`] turns the
//! generated etymology into render-ready blocks.

pub mod config;
pub mod etymology;
pub mod gemini;
pub mod model;
pub mod prompt;
pub mod provider;
#[cfg(feature = "web")]
pub mod session;
pub mod state;
#[cfg(feature = "web")]
pub mod web;

pub use config::ProviderConfig;
pub use etymology::format_etymology;
pub use gemini::GeminiClient;
pub use model::{EtymologyBlock, WordRecord, parse_word_record};
pub use provider::{GenerationError, InlineImage, WordProvider, fetch_illustration, fetch_word};
pub use state::{CycleId, FetchPlan, FetchState, GENERATION_ERROR_MESSAGE, Phase, ViewController};
