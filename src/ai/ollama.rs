use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Generator, PromptTemplate};
use crate::error::GenerationError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for a local Ollama server (`/api/generate`, non-streaming).
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    timeout: Option<Duration>,
    template: PromptTemplate,
}

impl OllamaClient {
    pub fn new(
        template: PromptTemplate,
        base_url: Option<String>,
        model: Option<String>,
        temperature: Option<f32>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            timeout,
            template,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn request_body(&self, context: &str, query: &str) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.model,
            prompt: self.template.render(context, query),
            stream: false,
            options: self
                .temperature
                .map(|temperature| GenerateOptions { temperature }),
        }
    }
}

fn parse_response(text: &str) -> Result<String, GenerationError> {
    let parsed: GenerateResponse =
        serde_json::from_str(text).map_err(|e| GenerationError::Decode(e.to_string()))?;
    Ok(parsed.response)
}

#[async_trait]
impl Generator for OllamaClient {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn generate(&self, context: &str, query: &str) -> Result<String, GenerationError> {
        let body = self.request_body(context, query);
        log::debug!("📡 Ollama request to {} (model={})", self.endpoint(), self.model);

        let response = self
            .http_client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::from_reqwest(e, self.timeout))?;

        if !status.is_success() {
            log::error!("Ollama API error ({}): {}", status, text);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_response(&text)
    }
}
