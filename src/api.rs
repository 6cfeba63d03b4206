use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::error::{AdvisorError, AdvisorResult};

/// One role-tagged message in a model conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMessage {
    pub role: String,
    pub content: String,
}

impl ModelMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ModelMessage>,
    temperature: f32,
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatChoice {
    message: ModelMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelProvider {
    Gemini,
    OpenAi,
    Custom,
}

/// HTTP client for the generative-language endpoint.
///
/// Downstream components treat replies as untyped text; anything structured
/// is recovered afterwards through `extract`. Each call is a single round
/// trip with no retries and the transport's 60-second timeout.
#[derive(Debug, Clone)]
pub struct ModelClient {
    client: Client,
    pub provider: ModelProvider,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ModelClient {
    pub fn new(provider: &str, endpoint: &str, api_key: &str, model: &str) -> Self {
        let provider = match provider.to_lowercase().as_str() {
            "gemini" | "google" => ModelProvider::Gemini,
            "openai" => ModelProvider::OpenAi,
            _ => ModelProvider::Custom,
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("aisle-cli/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            provider,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// One-shot prompt without history.
    pub async fn generate(&self, prompt: &str) -> AdvisorResult<String> {
        self.chat(&[ModelMessage::user(prompt)]).await
    }

    /// Send a role-tagged message history and return the reply text.
    pub async fn chat(&self, messages: &[ModelMessage]) -> AdvisorResult<String> {
        match self.provider {
            ModelProvider::Gemini => self.send_gemini_request(messages).await,
            ModelProvider::OpenAi | ModelProvider::Custom => {
                self.send_chat_completion_request(messages).await
            }
        }
    }

    async fn send_gemini_request(&self, messages: &[ModelMessage]) -> AdvisorResult<String> {
        // Gemini keeps the system instruction outside the message list and
        // names the assistant role "model".
        let contents: Vec<Value> = messages
            .iter()
            .filter(|message| message.role != "system")
            .map(|message| {
                let role = if message.role == "assistant" { "model" } else { "user" };
                json!({
                    "role": role,
                    "parts": [{ "text": message.content }]
                })
            })
            .collect();

        let mut request = json!({ "contents": contents });
        if let Some(system) = messages.iter().find(|message| message.role == "system") {
            request["systemInstruction"] = json!({ "parts": [{ "text": system.content }] });
        }

        let mut url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );
        if !self.api_key.is_empty() {
            url = format!("{}?key={}", url, self.api_key);
        }

        let response = self.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdvisorError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let reply: Value = response.json().await?;
        if let Some(candidates) = reply["candidates"].as_array() {
            if let Some(candidate) = candidates.first() {
                if let Some(text) = candidate["content"]["parts"][0]["text"].as_str() {
                    return Ok(text.to_string());
                }
            }
        }

        Err(AdvisorError::Parse(
            "model reply contained no candidates".to_string(),
        ))
    }

    async fn send_chat_completion_request(
        &self,
        messages: &[ModelMessage],
    ) -> AdvisorResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: 0.7,
            max_tokens: Some(2048),
        };

        let mut request_builder = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .json(&request);

        if !self.api_key.is_empty() {
            request_builder =
                request_builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request_builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdvisorError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json().await?;
        match reply.choices.first() {
            Some(choice) => Ok(choice.message.content.clone()),
            None => Err(AdvisorError::Parse(
                "model reply contained no choices".to_string(),
            )),
        }
    }
}
