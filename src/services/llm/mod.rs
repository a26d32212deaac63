//! Generative-model collaborators: structured field extraction and insight
//! generation.

pub mod llm_service;
pub mod prompts;
pub mod retry;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::LlmError;
use crate::models::W2Fields;

pub use llm_service::GeminiClient;
pub use prompts::PromptSet;
pub use retry::retry_with_policy;

/// Turns raw document text into a loosely shaped W-2 field blob.
#[async_trait]
pub trait StructuredExtractor: Send + Sync {
    async fn extract_fields(&self, text: &str) -> Result<Value, LlmError>;
}

/// Produces a JSON object with an `insights` list for normalized fields.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate_insights(&self, fields: &W2Fields, employee_address: &str) -> Result<Value, LlmError>;
}

/// Strip Markdown code fences that models like to wrap JSON in.
pub fn clean_model_response(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// The string items of an `insights` list. Anything else yields no insights.
pub fn insights_from_value(value: &Value) -> Vec<String> {
    value
        .get("insights")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
