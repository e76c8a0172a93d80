//! Environment-sourced configuration
//!
//! Everything comes from environment variables (a `.env` file is honored via
//! dotenvy). Missing credentials degrade to empty strings with a warning so
//! startup never aborts: the failure surfaces later, as a labeled error on
//! the first call that actually needs the credential.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Display name the assistant uses for itself in prompts and the banner.
pub const AGENT_NAME: &str = "Factora";

pub const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;
pub const DEFAULT_POSTGRES_DATABASE: &str = "postgres";

/// Generation backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Groq,
    Gemini,
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Groq
    }
}

/// Text-generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub groq_api_key: String,
    pub groq_model: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

/// Full runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let provider = match env::var("LLM_PROVIDER").ok().as_deref() {
            Some(value) if value.eq_ignore_ascii_case("gemini") => ProviderKind::Gemini,
            Some(value) if value.eq_ignore_ascii_case("groq") => ProviderKind::Groq,
            Some(other) => {
                warn!("LLM_PROVIDER desconhecido '{other}', usando groq");
                ProviderKind::Groq
            }
            None => ProviderKind::Groq,
        };

        let llm = LlmConfig {
            provider,
            groq_api_key: required_var("GROQ_API_KEY"),
            groq_model: env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_GROQ_MODEL.to_string()),
            gemini_api_key: required_var("GEMINI_API_KEY"),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
        };

        let port = match env::var("POSTGRES_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("POSTGRES_PORT inválido '{raw}', usando {DEFAULT_POSTGRES_PORT}");
                DEFAULT_POSTGRES_PORT
            }),
            Err(_) => DEFAULT_POSTGRES_PORT,
        };

        let database = DatabaseConfig {
            host: required_var("POSTGRES_HOST"),
            port,
            user: required_var("POSTGRES_USER"),
            password: required_var("POSTGRES_PASSWORD"),
            dbname: env::var("POSTGRES_DATABASE")
                .unwrap_or_else(|_| DEFAULT_POSTGRES_DATABASE.to_string()),
        };

        Config { llm, database }
    }
}

/// A variable we need but must not abort over: empty string + warning.
fn required_var(name: &str) -> String {
    match env::var(name) {
        Ok(value) => value,
        Err(_) => {
            warn!("{name} não encontrado nas variáveis de ambiente");
            String::new()
        }
    }
}
