//! Messages-API client for recipe generation

use super::parse::parse_recipe;
use super::{RecipeGenerator, RecipeRequest};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::models::Recipe;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// Recipe generator backed by an Anthropic-style messages endpoint
#[derive(Clone)]
pub struct AnthropicGenerator {
    client: reqwest::Client,
    api_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| Error::InvalidConfig {
                key: "AI_API_KEY",
                message: "API key contains invalid header characters".into(),
            })?;
            headers.insert("x-api-key", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to build HTTP client: {}", e).into(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Send `prompt` and return the first text block of the reply
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: String) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self.client.post(&self.api_url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| format!("{}: {}", e.error.error_type, e.error.message))
                .unwrap_or(body);
            warn!(%status, "Generation endpoint returned an error");
            return Err(Error::generation_request(format!(
                "endpoint returned {}: {}",
                status, detail
            )));
        }

        let body = response.text().await?;
        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            Error::generation_parse(format!("unexpected response envelope: {}", e))
        })?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text" || block.kind.is_empty())
            .and_then(|block| block.text)
            .ok_or_else(|| Error::generation_parse("response contained no text block"))
    }
}

#[async_trait]
impl RecipeGenerator for AnthropicGenerator {
    #[instrument(skip(self, request), fields(cuisine = %request.cuisine))]
    async fn generate(&self, request: &RecipeRequest) -> Result<Recipe> {
        request.validate()?;

        let text = self.complete(request.prompt()).await?;
        debug!(chars = text.len(), "Received model output");

        let mut recipe = parse_recipe(&text)?;
        recipe.id = uuid::Uuid::new_v4().to_string();
        recipe.cuisine = request.cuisine.trim().to_string();
        recipe.created_at = Some(Utc::now());

        info!(id = %recipe.id, title = %recipe.title, "Recipe generated");
        Ok(recipe)
    }
}
