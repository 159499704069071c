use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::time::Duration;

use crate::config::Config;

const GENERATE_PATH: &str = "/api/generate";
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
}

pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Self::new(&config.ollama_base_url, &config.model, config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Non-streamed completion for `prompt` under an optional system prompt
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let response = self.client
            .post(format!("{}{}", self.base_url, GENERATE_PATH))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("Ollama API error ({}): {}", status, error_text).into());
        }

        let body = response.text().await?;
        parse_generate_body(&body)
    }
}

/// Extract the generated text from an `/api/generate` body. Accepts a single
/// object, a JSON array of chunks, or newline-delimited stream chunks.
pub fn parse_generate_body(body: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err("Empty response from Ollama".into());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(items) = value.as_array() {
            let text: String = items
                .iter()
                .filter_map(|item| item.get("response").and_then(|r| r.as_str()))
                .collect();
            return Ok(text.trim().to_string());
        }
        if let Some(text) = value.get("response").and_then(|r| r.as_str()) {
            return Ok(text.trim().to_string());
        }
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return Err(format!("Ollama error: {}", message).into());
        }
        return Ok(value.to_string());
    }

    // Streamed output: one JSON object per line
    let mut text = String::new();
    for line in trimmed.lines().filter(|l| !l.trim().is_empty()) {
        let chunk: GenerateChunk = serde_json::from_str(line)
            .map_err(|e| format!("Unreadable Ollama stream chunk: {}", e))?;
        text.push_str(&chunk.response);
    }
    Ok(text.trim().to_string())
}
