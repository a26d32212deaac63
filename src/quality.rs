//! Heuristic quality scoring for a normalized W-2.

use serde_json::Value;
use tracing::debug;

use crate::models::{Amount, Confidence, QualityReport, TextQuality, W2Fields};

/// Fields without which the extraction is considered incomplete.
pub const CRITICAL_FIELDS: [&str; 4] = [
    "employee.name",
    "employee.ssn",
    "federal.wages_tips",
    "federal.federal_income_tax",
];

/// Trimmed text shorter than this is treated as a failed extraction.
pub const POOR_TEXT_THRESHOLD: usize = 50;
/// Trimmed text shorter than this is usable but suspect.
pub const FAIR_TEXT_THRESHOLD: usize = 200;

pub const LOW_EXTRACTION_WARNING: &str = "Low text extraction - possible OCR issues";
pub const WAGE_INCONSISTENCY_WARNING: &str =
    "Social Security wages exceed Box 1 wages - possible data inconsistency";

/// Follow a dotted path through nested objects. A segment that is missing,
/// null or an empty string ends the lookup.
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, segment| {
        match current.get(segment) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
        }
    })
}

/// Critical field paths that have no usable value.
pub fn missing_critical_fields(fields: &W2Fields) -> Vec<&'static str> {
    let tree = serde_json::to_value(fields).unwrap_or_default();
    CRITICAL_FIELDS
        .iter()
        .copied()
        .filter(|path| lookup_path(&tree, path).is_none())
        .collect()
}

/// Tier for the trimmed length of the extracted text.
pub fn text_quality_for_length(text_length: usize) -> TextQuality {
    if text_length < POOR_TEXT_THRESHOLD {
        TextQuality::Poor
    } else if text_length < FAIR_TEXT_THRESHOLD {
        TextQuality::Fair
    } else {
        TextQuality::Good
    }
}

/// Build the quality report for a normalized field tree.
///
/// Confidence starts at high and the checks below can only lower it:
/// missing critical fields cap it at medium, poor text forces low and fair
/// text caps it at medium. The wage consistency check only adds a warning.
pub fn generate_quality_report(
    fields: &W2Fields,
    extracted_text: &str,
    extraction_method: &str,
) -> QualityReport {
    let mut warnings = Vec::new();
    let mut confidence = Confidence::High;

    let missing = missing_critical_fields(fields);
    if !missing.is_empty() {
        warnings.push(format!("Missing critical fields: {}", missing.join(", ")));
        confidence = confidence.downgrade(Confidence::Medium);
    }

    let text_length = extracted_text.trim().chars().count();
    let text_quality = text_quality_for_length(text_length);
    match text_quality {
        TextQuality::Poor => {
            warnings.push(LOW_EXTRACTION_WARNING.to_string());
            confidence = confidence.downgrade(Confidence::Low);
        }
        TextQuality::Fair => {
            confidence = confidence.downgrade(Confidence::Medium);
        }
        TextQuality::Good | TextQuality::Unknown => {}
    }

    // A zero box counts as not reported
    let reported = |amount: &Option<Amount>| amount.as_ref().and_then(Amount::as_f64).filter(|v| *v != 0.0);
    let wages = reported(&fields.federal.wages_tips);
    let ss_wages = reported(&fields.federal.social_security_wages);
    if let (Some(wages), Some(ss_wages)) = (wages, ss_wages) {
        if ss_wages > wages {
            warnings.push(WAGE_INCONSISTENCY_WARNING.to_string());
        }
    }

    debug!(
        "Quality report: confidence={:?}, text_quality={:?}, {} warning(s)",
        confidence,
        text_quality,
        warnings.len()
    );

    QualityReport {
        confidence,
        warnings,
        text_quality,
        extraction_method: extraction_method.to_string(),
        text_length,
        critical_fields_missing: missing.len(),
    }
}
