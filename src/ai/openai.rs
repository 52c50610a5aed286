use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Generator, PromptTemplate};
use crate::error::GenerationError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const SYSTEM_PROMPT: &str =
    "You answer questions for a company chat widget. Be concise and factual.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: Message,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAIClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: u32,
    timeout: Option<Duration>,
    template: PromptTemplate,
}

impl OpenAIClient {
    pub fn new(
        template: PromptTemplate,
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            max_tokens: max_tokens.unwrap_or(500),
            timeout,
            template,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body(&self, context: &str, query: &str) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: self.template.render(context, query),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn parse_response(text: &str) -> Result<String, GenerationError> {
    let parsed: OpenAIResponse =
        serde_json::from_str(text).map_err(|e| GenerationError::Decode(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(GenerationError::EmptyResponse)
}

#[async_trait]
impl Generator for OpenAIClient {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn generate(&self, context: &str, query: &str) -> Result<String, GenerationError> {
        if !self.is_configured() {
            return Err(GenerationError::Transport("API key is not configured".to_string()));
        }

        let request = self.request_body(context, query);
        log::debug!("📡 OpenAI request to {} (model={})", self.endpoint(), self.model);

        let response = self
            .http_client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::from_reqwest(e, self.timeout))?;

        if !status.is_success() {
            log::error!("OpenAI API error ({}): {}", status, text);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{serve_once, serve_silent, SERVER_ERROR};
    use crate::knowledge::tests::shipped;

    fn make_client(api_key: &str) -> OpenAIClient {
        client_at(api_key, "http://localhost:8080/v1/", None)
    }

    fn client_at(api_key: &str, base_url: &str, timeout: Option<Duration>) -> OpenAIClient {
        OpenAIClient::new(
            PromptTemplate::from_knowledge(&shipped()),
            api_key.to_string(),
            Some(base_url.to_string()),
            None,
            None,
            None,
            timeout,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_and_endpoint() {
        let client = make_client("sk-test");
        assert_eq!(client.model(), "gpt-3.5-turbo");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert!(client.is_configured());
        assert!(!make_client("").is_configured());
    }

    #[test]
    fn test_request_body_carries_prompt() {
        let client = make_client("sk-test");
        let body = serde_json::to_value(client.request_body("", "Is it raining?")).unwrap();
        assert_eq!(body["max_tokens"], 500);
        assert!(body.get("temperature").is_none());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("The user's question is: Is it raining?"));
    }

    #[test]
    fn test_parse_response() {
        let text = r#"{"choices":[{"message":{"role":"assistant","content":"No."},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_response(text).unwrap(), "No.");

        let err = parse_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));

        let err = parse_response("not json").unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_key_fails_without_request() {
        let client = make_client("");
        let err = client.generate("", "hello?").await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_body() {
        let url = serve_once(SERVER_ERROR).await;
        let client = client_at("sk-test", &url, Some(Duration::from_secs(2)));
        let err = client.generate("", "hello?").await.unwrap_err();
        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model failed");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let url = serve_silent().await;
        let client = client_at("sk-test", &url, Some(Duration::from_millis(100)));
        let err = client.generate("", "hello?").await.unwrap_err();
        assert!(
            matches!(err, GenerationError::Timeout(limit) if limit == Duration::from_millis(100)),
            "got {:?}",
            err
        );
    }
}
