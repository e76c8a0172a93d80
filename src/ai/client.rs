//! Generation backend client implementations
//!
//! Two interchangeable backends, selected by configuration. They differ only
//! in request/response shaping: the pipeline sees a single
//! [`GenerationProvider`] contract either way. Single request/response, no
//! streaming, no retry.

use crate::ai::error::{AiError, AiResult};
use crate::config::{LlmConfig, ProviderKind};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Trait for text-generation backends
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate text for a prompt/system-prompt pair.
    async fn generate_text(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: u32,
        temperature: f32,
    ) -> AiResult<String>;

    /// Get provider name
    fn name(&self) -> &str;
}

fn http_client() -> AiResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| AiError::NetworkError(format!("Failed to create HTTP client: {e}")))
}

/// Groq provider (OpenAI-compatible chat completions API)
pub struct GroqProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqProvider {
    pub fn new(api_key: String, model: String) -> AiResult<Self> {
        Ok(Self {
            client: http_client()?,
            api_key,
            base_url: GROQ_BASE_URL.to_string(),
            model,
        })
    }
}

#[async_trait]
impl GenerationProvider for GroqProvider {
    async fn generate_text(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: u32,
        temperature: f32,
    ) -> AiResult<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut messages = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens,
            temperature,
        };

        debug!(
            "Calling Groq API with model: {}, max_tokens: {}, temperature: {}",
            self.model, max_tokens, temperature
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AiError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let response_body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::ProviderError(format!("Failed to parse API response: {e}")))?;

        response_body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiError::ProviderError("No content in response".to_string()))
    }

    fn name(&self) -> &str {
        "Groq"
    }
}

/// Google Gemini provider (generateContent API)
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> AiResult<Self> {
        Ok(Self {
            client: http_client()?,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            model,
        })
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate_text(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: u32,
        temperature: f32,
    ) -> AiResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request_body = GeminiRequest {
            system_instruction: system_prompt.map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: text.to_string(),
                }],
            }),
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
                top_p: 0.95,
                top_k: 40,
            },
        };

        debug!(
            "Calling Gemini API with model: {}, max_tokens: {}, temperature: {}",
            self.model, max_tokens, temperature
        );

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AiError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let response_body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AiError::ProviderError(format!("Failed to parse API response: {e}")))?;

        response_body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| AiError::ProviderError("No content in response".to_string()))
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}

// OpenAI-compatible wire types (Groq)
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

// Gemini wire types
#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

/// Create the configured generation client. Empty credentials are allowed:
/// the backend will reject them at request time and the error surfaces as a
/// labeled string, never as an abort.
pub fn create_client(config: &LlmConfig) -> AiResult<Box<dyn GenerationProvider>> {
    match config.provider {
        ProviderKind::Groq => Ok(Box::new(GroqProvider::new(
            config.groq_api_key.clone(),
            config.groq_model.clone(),
        )?)),
        ProviderKind::Gemini => Ok(Box::new(GeminiProvider::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_request_shape() {
        let request = ChatCompletionRequest {
            model: "llama3-70b-8192".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "regras".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "pergunta".to_string(),
                },
            ],
            max_tokens: 500,
            temperature: 0.1,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3-70b-8192");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "pergunta");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn test_gemini_request_shape() {
        let request = GeminiRequest {
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: "regras".to_string(),
                }],
            }),
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: "pergunta".to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.7,
                max_output_tokens: 1000,
                top_p: 0.95,
                top_k: 40,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "regras");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1000);
        assert_eq!(json["generationConfig"]["topP"], 0.95);
    }

    #[test]
    fn test_gemini_request_without_system_prompt() {
        let request = GeminiRequest {
            system_instruction: None,
            contents: vec![],
            generation_config: GeminiGenerationConfig {
                temperature: 0.1,
                max_output_tokens: 500,
                top_p: 0.95,
                top_k: 40,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
    }
}
