/*!
 * Integration tests for W-2 field normalization and quality scoring
 *
 * Covers masking, state canonicalization, numeric coercion and the quality
 * report through the public API, the way a caller sees them.
 */

use serde_json::json;

use w2_analyzer::models::{Amount, Confidence, TextQuality, W2Fields};
use w2_analyzer::normalize::{
    coerce_numeric_fields, employee_address, mask_sensitive_fields, normalize_fields, normalize_state_codes,
    parse_fields, FULL_MASK,
};
use w2_analyzer::quality::{generate_quality_report, LOW_EXTRACTION_WARNING};
use w2_analyzer::test_helpers::{sample_raw_extraction, sample_w2_text};

fn fields_from(value: serde_json::Value) -> W2Fields {
    parse_fields(value).expect("fixture should parse")
}

#[test]
fn test_ssn_and_ein_masked_to_last_four() {
    let fields = fields_from(json!({
        "employee": {"ssn": "123-45-6789"},
        "employer": {"ein": "12-3456789"}
    }));

    let masked = mask_sensitive_fields(fields);

    assert_eq!(masked.employee.ssn, Some("***-**-6789".into()));
    assert_eq!(masked.employer.ein, Some("***-**-6789".into()));
}

#[test]
fn test_short_identifiers_get_full_mask_and_absent_stay_absent() {
    let masked = mask_sensitive_fields(fields_from(json!({"employee": {"ssn": "12"}})));
    assert_eq!(masked.employee.ssn, Some(FULL_MASK.into()));
    assert_eq!(masked.employer.ein, None);

    let out = serde_json::to_value(&masked).unwrap();
    assert!(out["employer"].get("ein").is_none(), "no key should be created for an absent EIN");
}

#[test]
fn test_state_normalization_scenario() {
    let fields = fields_from(json!({
        "employee": {"address": {"state": "california"}},
        "employer": {"address": {"state": "ny"}},
        "state_local": [{"state": "Atlantis"}]
    }));

    let normalized = normalize_state_codes(fields);

    assert_eq!(normalized.employee.address.unwrap().state, Some("CA".into()));
    assert_eq!(normalized.employer.address.unwrap().state, Some("NY".into()));
    assert_eq!(normalized.state_local[0].state, Some("Atlantis".into()));
}

#[test]
fn test_non_string_text_values_survive_normalization() {
    let fields = normalize_fields(json!({
        "employee": {"name": {"first": "Jane", "last": "Roe"}, "address": {"state": ["NY"], "zip": 10001}},
        "state_local": [{"state": 36}]
    }))
    .unwrap();
    let out = serde_json::to_value(&fields).unwrap();

    assert_eq!(out["employee"]["address"]["state"], json!(["NY"]));
    assert_eq!(out["employee"]["address"]["zip"], json!(10001));
    assert_eq!(out["state_local"][0]["state"], json!(36));
    assert_eq!(out["employee"]["name"], json!({"first": "Jane", "last": "Roe"}));

    let report = generate_quality_report(&fields, &sample_w2_text(), "direct_text");
    assert!(
        !report.warnings.iter().any(|w| w.contains("employee.name")),
        "a structured name is still a name: {:?}",
        report.warnings
    );
}

#[test]
fn test_numeric_ssn_is_masked() {
    let fields = normalize_fields(json!({"employee": {"ssn": 123456789}})).unwrap();
    assert_eq!(fields.employee.ssn, Some("***-**-6789".into()));
}

#[test]
fn test_numeric_conversion_scenario() {
    let fields = fields_from(json!({
        "federal": {"wages_tips": "$75,000.00", "federal_income_tax": "15000"}
    }));

    let converted = coerce_numeric_fields(fields);

    assert_eq!(converted.federal.wages_tips, Some(Amount::Number(75000.0)));
    assert_eq!(converted.federal.federal_income_tax, Some(Amount::Number(15000.0)));
}

#[test]
fn test_no_currency_strings_survive_normalization() {
    let fields = normalize_fields(sample_raw_extraction()).unwrap();
    let out = serde_json::to_value(&fields).unwrap();

    for (name, value) in out["federal"].as_object().unwrap() {
        assert!(
            value.is_number() || value.is_null(),
            "federal.{} should be a number or null, got {}",
            name,
            value
        );
    }
    assert_eq!(out["federal"]["medicare_tax"], json!(1087.5));
    assert_eq!(out["federal"]["social_security_tips"], json!(null));
    assert_eq!(out["federal"]["dependent_care_benefits"], json!(null));
    assert_eq!(out["state_local"][0]["state"], json!("NY"));
    assert_eq!(out["state_local"][0]["state_wages"], json!(75000.0));
    assert_eq!(out["other_boxes"]["box_12"], json!({"D": 5000.0}));
}

#[test]
fn test_normalization_is_idempotent() {
    let once = normalize_fields(sample_raw_extraction()).unwrap();

    assert_eq!(mask_sensitive_fields(once.clone()), once);
    assert_eq!(normalize_state_codes(once.clone()), once);
    assert_eq!(coerce_numeric_fields(once.clone()), once);
}

#[test]
fn test_employee_address_from_normalized_fields() {
    let fields = normalize_fields(sample_raw_extraction()).unwrap();
    assert_eq!(employee_address(&fields.employee), "123 Main Street, New York, NY, 10001");
}

#[test]
fn test_short_text_gives_poor_quality() {
    let fields = normalize_fields(sample_raw_extraction()).unwrap();

    let report = generate_quality_report(&fields, "0123456789", "ocr");

    assert_eq!(report.text_length, 10);
    assert_eq!(report.text_quality, TextQuality::Poor);
    assert_eq!(report.confidence, Confidence::Low);
    assert!(report.warnings.iter().any(|w| w == LOW_EXTRACTION_WARNING));
}

#[test]
fn test_missing_ssn_and_wages_reported() {
    let mut raw = sample_raw_extraction();
    raw["employee"].as_object_mut().unwrap().remove("ssn");
    raw["federal"]["wages_tips"] = json!(null);
    let fields = normalize_fields(raw).unwrap();

    let report = generate_quality_report(&fields, &sample_w2_text(), "direct_text");

    assert_eq!(report.critical_fields_missing, 2);
    assert!(report.confidence >= Confidence::Medium);
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("employee.ssn") && w.contains("federal.wages_tips")));
}

#[test]
fn test_empty_string_amount_counts_as_missing() {
    let mut raw = sample_raw_extraction();
    raw["federal"]["federal_income_tax"] = json!("");
    let fields = normalize_fields(raw).unwrap();

    let report = generate_quality_report(&fields, &sample_w2_text(), "direct_text");

    assert_eq!(report.critical_fields_missing, 1);
    assert_eq!(report.warnings, vec!["Missing critical fields: federal.federal_income_tax".to_string()]);
}

#[test]
fn test_clean_sample_is_high_confidence() {
    let fields = normalize_fields(sample_raw_extraction()).unwrap();

    let report = generate_quality_report(&fields, &sample_w2_text(), "direct_extraction");

    assert_eq!(report.confidence, Confidence::High);
    assert_eq!(report.text_quality, TextQuality::Good);
    assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
}
