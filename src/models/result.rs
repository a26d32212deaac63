use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::quality::QualityReport;
use super::w2::W2Fields;

/// Output of processing one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResult {
    /// `None` when processing failed; serialized as an empty object
    #[serde(serialize_with = "serialize_fields")]
    pub fields: Option<W2Fields>,
    pub insights: Vec<String>,
    pub quality: QualityReport,
}

fn serialize_fields<S>(fields: &Option<W2Fields>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match fields {
        Some(fields) => fields.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

impl ProcessingResult {
    /// Degraded result returned in place of an error once the pipeline has
    /// started.
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        let reason = reason.to_string();
        Self {
            fields: None,
            insights: vec![format!("• Processing error: {}", reason)],
            quality: QualityReport::failed(&reason),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.fields.is_none()
    }

    /// Number of field sections present in the result.
    pub fn section_count(&self) -> usize {
        if self.fields.is_some() {
            W2Fields::SECTION_COUNT
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;
    use serde_json::json;

    #[test]
    fn test_failed_result_shape() {
        let result = ProcessingResult::failed("model unavailable");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["fields"], json!({}));
        assert_eq!(value["insights"], json!(["• Processing error: model unavailable"]));
        assert_eq!(value["quality"]["confidence"], json!("low"));
        assert_eq!(value["quality"]["warnings"], json!(["Processing failed: model unavailable"]));
        assert_eq!(value["quality"]["extraction_method"], json!("failed"));
        assert_eq!(result.quality.confidence, Confidence::Low);
        assert_eq!(result.section_count(), 0);
    }
}
