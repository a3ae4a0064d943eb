//! WatsonX AI client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;

use seoscan_core::{Error, GenerationConfig, Result, StructuredModel};

use crate::config::WatsonxConfig;

/// WatsonX AI client with a structured-output contract
///
/// The generation API returns free text; callers of this client expect a JSON
/// object conforming to the schema they describe in the prompt. The client
/// embeds the schema in the instruction, extracts the first JSON object span
/// from the generated text, and parses it. Anything else is an
/// `InvalidResponse` error, which analysis workers treat the same as a
/// backend failure.
pub struct WatsonxClient {
    config: WatsonxConfig,
    access_token: Option<String>,
    client: Client,
    current_model: String,
}

#[derive(Serialize)]
struct TokenRequest {
    grant_type: String,
    apikey: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct GenerationParams {
    decoding_method: String,
    max_new_tokens: u32,
    min_new_tokens: u32,
    top_k: u32,
    top_p: f32,
    repetition_penalty: f32,
    temperature: f32,
}

#[derive(Serialize)]
struct GenerationRequest {
    input: String,
    parameters: GenerationParams,
    model_id: String,
    project_id: String,
}

#[derive(Deserialize)]
struct GenerationResults {
    generated_text: String,
}

#[derive(Deserialize)]
struct GenerationData {
    results: Vec<GenerationResults>,
}

impl WatsonxClient {
    /// Model constants
    pub const GRANITE_4_H_SMALL: &'static str = "ibm/granite-4-h-small";
    pub const GRANITE_3_3_8B_INSTRUCT: &'static str = "ibm/granite-3-3-8b-instruct";

    /// Create a new WatsonX client from configuration
    pub fn new(config: WatsonxConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            access_token: None,
            client,
            current_model: Self::GRANITE_4_H_SMALL.to_string(),
        })
    }

    /// Create a new WatsonX client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = WatsonxConfig::from_env()?;
        Self::new(config)
    }

    /// Set the model to use for generation
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.current_model = model_id.into();
        self
    }

    /// Assemble the full prompt: system persona, schema contract, task
    fn build_prompt(system: &str, task: &str, schema: &str) -> String {
        format!(
            "{}\n\nRespond with a single JSON object and nothing else. \
            The object must conform to this schema:\n{}\n\n{}\n\nJSON:",
            system, schema, task
        )
    }

    /// Perform the actual generation request and return raw generated text
    async fn perform_generation(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let access_token = self.access_token.as_ref().ok_or_else(|| {
            Error::Authentication("Not authenticated. Call connect() first.".to_string())
        })?;

        let params = GenerationParams {
            decoding_method: "greedy".to_string(),
            max_new_tokens: config.max_tokens,
            min_new_tokens: 5,
            top_k: config.top_k.unwrap_or(50),
            top_p: config.top_p.unwrap_or(1.0),
            repetition_penalty: 1.1,
            temperature: config.temperature.unwrap_or(0.2),
        };

        let request_body = GenerationRequest {
            input: prompt.to_string(),
            parameters: params,
            model_id: config.model_id.clone(),
            project_id: self.config.project_id.clone(),
        };

        let url = format!(
            "{}/ml/v1/text/generation?version=2023-05-29",
            self.config.api_url
        );

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Model(format!(
                "WatsonX API request failed with status {}: {}",
                status, error_text
            )));
        }

        let data: GenerationData = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let text = data
            .results
            .first()
            .map(|r| r.generated_text.clone())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::Model(
                "Empty response from WatsonX API".to_string(),
            ));
        }

        Ok(text)
    }

    /// Extract the first balanced JSON object from generated text
    ///
    /// Models often wrap payloads in prose or markdown fences; locate the
    /// outermost `{ ... }` span and parse that.
    fn extract_json(text: &str) -> Result<Value> {
        let start = text
            .find('{')
            .ok_or_else(|| Error::InvalidResponse("no JSON object in response".to_string()))?;

        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (offset, ch) in text[start..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &text[start..start + offset + ch.len_utf8()];
                        return serde_json::from_str(candidate)
                            .map_err(|e| Error::InvalidResponse(e.to_string()));
                    }
                }
                _ => {}
            }
        }

        Err(Error::InvalidResponse(
            "unterminated JSON object in response".to_string(),
        ))
    }
}

#[async_trait]
impl StructuredModel for WatsonxClient {
    async fn connect(&mut self) -> Result<()> {
        let token_request = TokenRequest {
            grant_type: "urn:ibm:params:oauth:grant-type:apikey".to_string(),
            apikey: self.config.api_key.clone(),
        };

        let url = format!("https://{}/identity/token", self.config.iam_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .form(&token_request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Authentication(format!(
                "Authentication failed: {}",
                response.status()
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        self.access_token = Some(token_response.access_token);

        Ok(())
    }

    async fn generate_structured(&self, system: &str, task: &str, schema: &str) -> Result<Value> {
        let config = GenerationConfig {
            model_id: self.current_model.clone(),
            ..Default::default()
        };
        self.generate_structured_with_config(system, task, schema, &config)
            .await
    }

    async fn generate_structured_with_config(
        &self,
        system: &str,
        task: &str,
        schema: &str,
        config: &GenerationConfig,
    ) -> Result<Value> {
        let prompt = Self::build_prompt(system, task, schema);
        let generation_future = self.perform_generation(&prompt, config);

        let text = match timeout(config.timeout, generation_future).await {
            Ok(result) => result?,
            Err(_) => return Err(Error::Timeout("Request timed out".to_string())),
        };

        Self::extract_json(&text)
    }

    fn model_id(&self) -> &str {
        &self.current_model
    }
}
