use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::prompts::PromptSet;
use super::retry::retry_with_policy;
use super::{clean_model_response, InsightGenerator, StructuredExtractor};
use crate::config::{Config, RetryPolicy};
use crate::errors::LlmError;
use crate::models::W2Fields;

pub const INSIGHTS_PARSE_FAILURE: &str = "• Unable to generate insights due to processing error";
pub const INSIGHTS_CALL_FAILURE: &str = "• Insight generation failed";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Client for the Gemini `generateContent` API, used both to structure the
/// extracted text and to write insights about the normalized fields.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    prompts: PromptSet,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or(LlmError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(config.http_timeout())
            .connect_timeout(config.http_connect_timeout())
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.gemini_model.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            prompts: PromptSet::load(&config.prompt_dir),
            retry: config.retry,
        })
    }

    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// One `generateContent` call, returning the concatenated text parts of
    /// the first candidate.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.into_text().ok_or(LlmError::EmptyResponse)
    }

    /// Call the model and parse its reply as JSON.
    async fn request_json(&self, prompt: &str) -> Result<Value, LlmError> {
        let text = self.generate_content(prompt).await?;
        let cleaned = clean_model_response(&text);
        Ok(serde_json::from_str(cleaned)?)
    }

    /// Structure raw W-2 text into a field blob.
    pub async fn extract_w2_data(&self, text_content: &str) -> Result<Value, LlmError> {
        let prompt = self.prompts.extraction_prompt(text_content);
        info!("Requesting structured extraction from {} ({} chars of text)", self.model, text_content.len());

        retry_with_policy(&self.retry, "gemini extraction", || self.request_json(&prompt))
            .await
            .map_err(|last| LlmError::RetriesExhausted {
                attempts: self.retry.max_attempts,
                last: Box::new(last),
            })
    }

    /// Ask the model for insights. Failures become a single explanatory
    /// insight instead of an error.
    pub async fn generate_insights_value(&self, fields: &W2Fields, employee_address: &str) -> Value {
        let extracted_data = match serde_json::to_string_pretty(fields) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not serialize fields for insights: {}", e);
                return json!({ "insights": [format!("• Error generating insights: {}", e)] });
            }
        };
        let prompt = self.prompts.insights_prompt(&extracted_data, employee_address);
        debug!("Requesting insights from {}", self.model);

        match retry_with_policy(&self.retry, "gemini insights", || self.request_json(&prompt)).await {
            Ok(value) if value.get("insights").map_or(false, Value::is_array) => value,
            Ok(_) => {
                warn!("Model returned insights in an unexpected shape, ignoring them");
                json!({ "insights": [] })
            }
            Err(e) if e.is_malformed_json() => json!({ "insights": [INSIGHTS_PARSE_FAILURE] }),
            Err(_) => json!({ "insights": [INSIGHTS_CALL_FAILURE] }),
        }
    }
}

#[async_trait]
impl StructuredExtractor for GeminiClient {
    async fn extract_fields(&self, text: &str) -> Result<Value, LlmError> {
        self.extract_w2_data(text).await
    }
}

#[async_trait]
impl InsightGenerator for GeminiClient {
    async fn generate_insights(&self, fields: &W2Fields, employee_address: &str) -> Result<Value, LlmError> {
        Ok(self.generate_insights_value(fields, employee_address).await)
    }
}
