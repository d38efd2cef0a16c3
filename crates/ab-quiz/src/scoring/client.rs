use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ServiceError;
use crate::config::{ConfigError, ModelConfig};

/// Sampling controls forwarded to the text-generation service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask the service for strict JSON output when it supports it.
    pub json_mode: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.2,
            json_mode: true,
        }
    }
}

/// Text-generation capability the scoring service depends on.
///
/// Implementations perform exactly one exchange per call and never retry.
pub trait ScoreGenerator: Send + Sync {
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

/// Client for an Azure OpenAI chat-completions deployment.
#[derive(Clone)]
pub struct AzureChatClient {
    client: Client,
    endpoint: String,
    api_version: String,
    api_key: Option<String>,
}

impl AzureChatClient {
    pub fn from_config(config: &ModelConfig) -> Result<Self, ConfigError> {
        let api_base = config
            .api_base
            .as_deref()
            .ok_or(ConfigError::MissingSetting {
                name: "AZURE_OPENAI_API_BASE_URL",
            })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;

        Ok(Self::with_client(
            client,
            api_base,
            &config.deployment,
            &config.api_version,
            config.api_key.clone(),
        ))
    }

    pub fn with_client(
        client: Client,
        api_base: &str,
        deployment: &str,
        api_version: &str,
        api_key: Option<String>,
    ) -> Self {
        let endpoint = format!(
            "{}/openai/deployments/{}/chat/completions",
            api_base.trim_end_matches('/'),
            deployment
        );

        Self {
            client,
            endpoint,
            api_version: api_version.to_string(),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ScoreGenerator for AzureChatClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ServiceError> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            response_format: params.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let mut call = self
            .client
            .post(&self.endpoint)
            .query(&[("api-version", self.api_version.as_str())])
            .json(&request);
        if let Some(api_key) = &self.api_key {
            call = call.header("api-key", api_key);
        }

        let response = call
            .send()
            .await
            .map_err(|err| ServiceError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "model service rejected scoring request");
            return Err(ServiceError::Status {
                status: status.as_u16(),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| ServiceError::Decode(err.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ServiceError::MissingContent)?;

        debug!(content_len = content.len(), "model service returned text");
        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_deployment() {
        let client = AzureChatClient::with_client(
            Client::new(),
            "https://quiz.openai.azure.com/",
            "gpt-35-turbo",
            "2024-02-01",
            None,
        );
        assert_eq!(
            client.endpoint(),
            "https://quiz.openai.azure.com/openai/deployments/gpt-35-turbo/chat/completions"
        );
    }

    #[test]
    fn from_config_requires_api_base() {
        match AzureChatClient::from_config(&ModelConfig::default()) {
            Err(ConfigError::MissingSetting { name }) => {
                assert_eq!(name, "AZURE_OPENAI_API_BASE_URL")
            }
            Err(other) => panic!("expected missing setting, got {other:?}"),
            Ok(_) => panic!("expected missing setting"),
        }
    }

    #[test]
    fn request_body_carries_json_mode_only_when_asked() {
        let mut request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "score me",
            }],
            max_tokens: 512,
            temperature: 0.2,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let json = serde_json::to_value(&request).expect("serializes");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["max_tokens"], 512);

        request.response_format = None;
        let json = serde_json::to_value(&request).expect("serializes");
        assert!(json.get("response_format").is_none());
    }
}
