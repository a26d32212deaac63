/*!
 * Test Helpers and Utilities
 *
 * Fake collaborators and fixtures for exercising the pipeline without
 * external tools or network access. Tests can modify the returned objects
 * as needed.
 */

use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::config::{Config, RetryPolicy};
use crate::errors::{ExtractionError, LlmError};
use crate::models::W2Fields;
use crate::ocr::{ExtractedText, TextExtractor};
use crate::services::llm::{InsightGenerator, StructuredExtractor};

/// Creates a test configuration pointing at `base_url`, with a fast retry
/// policy and no prompt directory.
pub fn create_test_config(base_url: &str) -> Config {
    Config {
        gemini_api_key: Some("test-api-key".to_string()),
        gemini_model: "gemini-pro".to_string(),
        gemini_base_url: base_url.to_string(),
        prompt_dir: PathBuf::from("/nonexistent/w2-prompts"),
        retry: RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        },
        http_timeout_seconds: 5,
        http_connect_timeout_seconds: 2,
        temp_dir: std::env::temp_dir().to_string_lossy().to_string(),
    }
}

/// A raw extraction blob the way the model typically returns it.
pub fn sample_raw_extraction() -> Value {
    json!({
        "employee": {
            "name": "John A. Doe",
            "ssn": "123-45-6789",
            "address": {
                "street": "123 Main Street",
                "city": "New York",
                "state": "new york",
                "zip": "10001"
            }
        },
        "employer": {
            "name": "Tech Solutions Inc.",
            "ein": "12-3456789",
            "address": {"street": "456 Business Avenue", "city": "New York", "state": "NY", "zip": "10002"},
            "state_id": "NY-123456789"
        },
        "federal": {
            "wages_tips": "$75,000.00",
            "federal_income_tax": "15000",
            "social_security_wages": "75,000.00",
            "social_security_tax": "4650",
            "medicare_wages": 75000,
            "medicare_tax": "$1,087.50",
            "social_security_tips": "",
            "allocated_tips": null,
            "dependent_care_benefits": "-",
            "nonqualified_plans": 0
        },
        "state_local": [
            {"state": "ny", "employer_state_id": "NY-123456789", "state_wages": "$75,000", "state_income_tax": "4,500.00"}
        ],
        "other_boxes": {"box_12": {"D": 5000.0}, "box_14": {"other_info": "Professional dues: 300.00"}}
    })
}

/// Text long enough to be rated good.
pub fn sample_w2_text() -> String {
    "Form W-2 Wage and Tax Statement 2023. Employee: John A. Doe, 123 Main Street, New York, NY 10001. \
     Employer: Tech Solutions Inc. Box 1 Wages, tips, other compensation 75000.00. \
     Box 2 Federal income tax withheld 15000.00. Box 3 Social security wages 75000.00."
        .to_string()
}

/// Text extractor returning fixed text.
pub struct StaticText {
    text: String,
    method: String,
}

impl StaticText {
    pub fn new(text: &str, method: &str) -> Self {
        Self {
            text: text.to_string(),
            method: method.to_string(),
        }
    }
}

#[async_trait]
impl TextExtractor for StaticText {
    async fn extract(&self, _path: &Path) -> Result<ExtractedText, ExtractionError> {
        Ok(ExtractedText::new(self.text.clone(), &self.method))
    }
}

/// Text extractor that always fails.
pub struct FailingText;

#[async_trait]
impl TextExtractor for FailingText {
    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        Err(ExtractionError::NoReadableText {
            path: path.to_path_buf(),
        })
    }
}

/// Structured extractor returning a fixed blob and counting calls.
pub struct StaticExtractor {
    blob: Value,
    calls: AtomicU32,
}

impl StaticExtractor {
    pub fn new(blob: Value) -> Self {
        Self {
            blob,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StructuredExtractor for StaticExtractor {
    async fn extract_fields(&self, _text: &str) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.blob.clone())
    }
}

/// Structured extractor whose retries are always exhausted.
pub struct FailingExtractor;

#[async_trait]
impl StructuredExtractor for FailingExtractor {
    async fn extract_fields(&self, _text: &str) -> Result<Value, LlmError> {
        Err(LlmError::RetriesExhausted {
            attempts: 3,
            last: Box::new(LlmError::EmptyResponse),
        })
    }
}

/// Insight generator returning a fixed value.
pub struct StaticInsights {
    value: Value,
}

impl StaticInsights {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

#[async_trait]
impl InsightGenerator for StaticInsights {
    async fn generate_insights(&self, _fields: &W2Fields, _employee_address: &str) -> Result<Value, LlmError> {
        Ok(self.value.clone())
    }
}

/// Insight generator that records the address it was given.
#[derive(Default)]
pub struct RecordingInsights {
    pub addresses: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl InsightGenerator for RecordingInsights {
    async fn generate_insights(&self, _fields: &W2Fields, employee_address: &str) -> Result<Value, LlmError> {
        if let Ok(mut addresses) = self.addresses.lock() {
            addresses.push(employee_address.to_string());
        }
        Ok(json!({"insights": ["• recorded"]}))
    }
}
