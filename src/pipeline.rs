//! Per-document orchestration: text → structured fields → normalized fields →
//! insights and quality report.

use anyhow::{Context, Result};
use serde_json::{json, Map};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::errors::{InputError, LlmError};
use crate::models::{
    Address, Amount, Confidence, Employee, Employer, FederalAmounts, ProcessingResult, QualityReport,
    StateLocalRecord, TextQuality, W2Fields,
};
use crate::normalize::{employee_address, normalize_fields};
use crate::ocr::{DocumentTextExtractor, TextExtractor};
use crate::quality::generate_quality_report;
use crate::services::llm::{insights_from_value, GeminiClient, InsightGenerator, StructuredExtractor};
use crate::utils::ocr::validate_input;

/// Processes W-2 documents one at a time. Holds no per-document state, so a
/// single processor can serve concurrent documents.
#[derive(Clone)]
pub struct W2Processor {
    text_extractor: Arc<dyn TextExtractor>,
    structured_extractor: Arc<dyn StructuredExtractor>,
    insight_generator: Arc<dyn InsightGenerator>,
}

impl W2Processor {
    pub fn new(
        text_extractor: Arc<dyn TextExtractor>,
        structured_extractor: Arc<dyn StructuredExtractor>,
        insight_generator: Arc<dyn InsightGenerator>,
    ) -> Self {
        Self {
            text_extractor,
            structured_extractor,
            insight_generator,
        }
    }

    /// Processor backed by the document text extractor and the Gemini API.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let gemini = Arc::new(GeminiClient::new(config)?);
        Ok(Self::new(
            Arc::new(DocumentTextExtractor::new(config)),
            gemini.clone(),
            gemini,
        ))
    }

    /// Process a file from disk.
    ///
    /// Only input validation can fail; once text extraction starts every
    /// problem is reported through a degraded result.
    pub async fn process_file(&self, path: &Path) -> Result<ProcessingResult, InputError> {
        let size = validate_input(path)?;
        info!("Processing W-2 file {} ({} bytes)", path.display(), size);

        let extracted = match self.text_extractor.extract(path).await {
            Ok(extracted) => extracted,
            Err(e) => {
                error!("Text extraction failed for {}: {}", path.display(), e);
                return Ok(ProcessingResult::failed(format!("Text extraction failed: {}", e)));
            }
        };

        Ok(self.process_text(&extracted.text, &extracted.method).await)
    }

    /// Process already extracted text. Never fails.
    pub async fn process_text(&self, text: &str, extraction_method: &str) -> ProcessingResult {
        match self.run(text, extraction_method).await {
            Ok(result) => {
                info!(
                    "W-2 processed: confidence={:?}, {} insight(s), {} warning(s)",
                    result.quality.confidence,
                    result.insights.len(),
                    result.quality.warnings.len()
                );
                result
            }
            Err(e) => {
                error!("W-2 processing failed: {:#}", e);
                ProcessingResult::failed(format!("{:#}", e))
            }
        }
    }

    async fn run(&self, text: &str, extraction_method: &str) -> Result<ProcessingResult> {
        let raw = self
            .structured_extractor
            .extract_fields(text)
            .await
            .context("Structured extraction failed")?;

        let fields = normalize_fields(raw).context("Could not normalize extracted data")?;
        let address = employee_address(&fields.employee);

        let insights = self
            .insight_generator
            .generate_insights(&fields, &address)
            .await
            .context("Insight generation failed")?;

        let quality = generate_quality_report(&fields, text, extraction_method);

        Ok(ProcessingResult {
            insights: insights_from_value(&insights),
            fields: Some(fields),
            quality,
        })
    }
}

fn address(street: &str, city: &str, state: &str, zip: &str) -> Address {
    Address {
        street: Some(street.into()),
        city: Some(city.into()),
        state: Some(state.into()),
        zip: Some(zip.into()),
        extra: Map::new(),
    }
}

/// Canned result returned in test mode, without touching any collaborator.
pub fn sample_result() -> ProcessingResult {
    let fields = W2Fields {
        employee: Employee {
            name: Some("John A. Doe".into()),
            ssn: Some("***-**-1234".into()),
            address: Some(address("123 Main Street", "New York", "NY", "10001")),
            extra: Map::new(),
        },
        employer: Employer {
            name: Some("Tech Solutions Inc.".into()),
            ein: Some("***-**-5678".into()),
            address: Some(address("456 Business Avenue", "New York", "NY", "10002")),
            state_id: Some("NY-123456789".into()),
            extra: Map::new(),
        },
        federal: FederalAmounts {
            wages_tips: Some(Amount::Number(75000.0)),
            federal_income_tax: Some(Amount::Number(15000.0)),
            social_security_wages: Some(Amount::Number(75000.0)),
            social_security_tax: Some(Amount::Number(4650.0)),
            medicare_wages: Some(Amount::Number(75000.0)),
            medicare_tax: Some(Amount::Number(1087.5)),
            social_security_tips: Some(Amount::Number(0.0)),
            allocated_tips: Some(Amount::Number(0.0)),
            dependent_care_benefits: Some(Amount::Number(0.0)),
            nonqualified_plans: Some(Amount::Number(0.0)),
            extra: Map::new(),
        },
        state_local: vec![StateLocalRecord {
            state: Some("NY".into()),
            employer_state_id: Some("NY-123456789".into()),
            state_wages: Some(Amount::Number(75000.0)),
            state_income_tax: Some(Amount::Number(4500.0)),
            extra: Map::new(),
        }],
        other_boxes: json!({
            "box_12": {"D": 5000.0},
            "box_13": {
                "statutory_employee": false,
                "retirement_plan": true,
                "third_party_sick_pay": false
            },
            "box_14": {"other_info": "Professional dues: 300.00"}
        })
        .as_object()
        .cloned()
        .unwrap_or_default(),
    };

    let insights = [
        "• Test mode: Using simulated W-2 data",
        "• Address validation: ZIP code 10001 corresponds to NY state, matches employer state",
        "• Federal withholding at 20.0% of Box 1 wages ($15,000 / $75,000)",
        "• Social Security wages below annual limit of $160,200 for 2023",
        "• Single state income reported for New York with $4,500 state tax withheld",
        "• All critical W-2 boxes present and consistent",
        "• Retirement plan participation indicated in Box 13",
    ];

    ProcessingResult {
        fields: Some(fields),
        insights: insights.iter().map(|s| s.to_string()).collect(),
        quality: QualityReport {
            confidence: Confidence::High,
            warnings: vec!["Test mode - no actual processing performed".to_string()],
            text_quality: TextQuality::Good,
            extraction_method: "test_mode".to_string(),
            text_length: 0,
            critical_fields_missing: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingExtractor, StaticExtractor, StaticInsights, StaticText};
    use serde_json::json;

    #[tokio::test]
    async fn test_process_text_happy_path() {
        let processor = W2Processor::new(
            Arc::new(StaticText::new("unused", "direct_text")),
            Arc::new(StaticExtractor::new(json!({
                "employee": {"name": "Jane Roe", "ssn": "987-65-4321",
                             "address": {"street": "9 Elm St", "city": "Dayton", "state": "ohio", "zip": "45402"}},
                "federal": {"wages_tips": "$50,000.00", "federal_income_tax": "7,500"}
            }))),
            Arc::new(StaticInsights::new(json!({"insights": ["• ok"]}))),
        );

        let result = processor.process_text(&"W-2 text ".repeat(30), "direct_text").await;

        let fields = result.fields.expect("fields present");
        assert_eq!(fields.employee.ssn, Some("***-**-4321".into()));
        assert_eq!(fields.federal.wages_tips, Some(Amount::Number(50000.0)));
        assert_eq!(result.insights, vec!["• ok".to_string()]);
        assert_eq!(result.quality.confidence, Confidence::High);
        assert_eq!(result.quality.extraction_method, "direct_text");
    }

    #[tokio::test]
    async fn test_extraction_failure_degrades() {
        let processor = W2Processor::new(
            Arc::new(StaticText::new("unused", "direct_text")),
            Arc::new(FailingExtractor),
            Arc::new(StaticInsights::new(json!({"insights": []}))),
        );

        let result = processor.process_text("some text", "ocr").await;

        assert!(result.is_failed());
        assert_eq!(result.quality.confidence, Confidence::Low);
        assert_eq!(result.quality.extraction_method, "failed");
        assert_eq!(result.insights.len(), 1);
        assert!(result.insights[0].starts_with("• Processing error: Structured extraction failed"));
        assert!(result.quality.warnings[0].starts_with("Processing failed: Structured extraction failed"));
    }

    #[test]
    fn test_sample_result_is_complete() {
        let result = sample_result();
        let fields = result.fields.as_ref().unwrap();
        assert_eq!(fields.employee.name, Some("John A. Doe".into()));
        assert_eq!(fields.state_local.len(), 1);
        assert_eq!(result.insights.len(), 7);
        assert_eq!(result.quality.extraction_method, "test_mode");
        assert_eq!(result.section_count(), 5);
    }
}
