//! Text generation for the natural-language pipeline
//!
//! This module is the assistant's LLM boundary: interchangeable generation
//! backends behind one trait, the Portuguese system-prompt builders, and the
//! fence stripping applied to model-generated SQL before execution.

pub mod client;
pub mod error;
pub mod prompt;
pub mod sanitize;

pub use client::{GeminiProvider, GenerationProvider, GroqProvider, create_client};
pub use error::{AiError, AiResult};
pub use prompt::PromptGenerator;
pub use sanitize::strip_sql_fences;

/// Token cap for the SQL-synthesis call.
pub const SQL_MAX_TOKENS: u32 = 500;
/// Token cap for explanation and freeform calls.
pub const ANSWER_MAX_TOKENS: u32 = 1000;
/// Synthesis runs near-deterministic; explanations favor fluency.
pub const SQL_TEMPERATURE: f32 = 0.1;
pub const ANSWER_TEMPERATURE: f32 = 0.7;
