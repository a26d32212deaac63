use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered confidence tier. Later variants are worse, so `max` picks the
/// lower confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Lower the tier to `ceiling` if it is currently better. Never raises it.
    pub fn downgrade(self, ceiling: Confidence) -> Confidence {
        self.max(ceiling)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextQuality {
    Good,
    Fair,
    Poor,
    /// Only used when processing failed before the text could be judged
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub confidence: Confidence,
    pub warnings: Vec<String>,
    pub text_quality: TextQuality,
    pub extraction_method: String,
    pub text_length: usize,
    pub critical_fields_missing: usize,
}

impl QualityReport {
    /// Report attached to a result whose processing failed.
    pub fn failed(reason: &str) -> Self {
        Self {
            confidence: Confidence::Low,
            warnings: vec![format!("Processing failed: {}", reason)],
            text_quality: TextQuality::Unknown,
            extraction_method: "failed".to_string(),
            text_length: 0,
            critical_fields_missing: 0,
        }
    }
}
