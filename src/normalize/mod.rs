//! Field normalization for extracted W-2 data.
//!
//! Every step takes the field tree by value and returns the rewritten tree,
//! so a document's fields are never shared while they are being cleaned.

pub mod masking;
pub mod numeric;
pub mod states;

use serde_json::Value;
use tracing::debug;

use crate::errors::NormalizeError;
use crate::models::{Employee, TextValue, W2Fields};

pub use masking::{mask_identifier, mask_sensitive_fields, FULL_MASK};
pub use numeric::{coerce_amount, coerce_numeric_fields, parse_amount};
pub use states::{normalize_state, normalize_state_codes};

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse an untrusted extraction blob into a field tree, without cleaning.
///
/// Null or an empty object yields a tree with every section defaulted.
pub fn parse_fields(raw: Value) -> Result<W2Fields, NormalizeError> {
    match raw {
        Value::Null => Ok(W2Fields::default()),
        Value::Object(_) => Ok(serde_json::from_value(raw)?),
        other => Err(NormalizeError::NotAnObject { kind: json_kind(&other) }),
    }
}

/// Parse and clean an extraction blob: mask identifiers, canonicalize states,
/// then convert monetary text to numbers.
pub fn normalize_fields(raw: Value) -> Result<W2Fields, NormalizeError> {
    let fields = parse_fields(raw)?;
    let fields = mask_sensitive_fields(fields);
    let fields = normalize_state_codes(fields);
    let fields = coerce_numeric_fields(fields);
    debug!(
        "Normalized fields: {} state/local record(s), {} other box group(s)",
        fields.state_local.len(),
        fields.other_boxes.len()
    );
    Ok(fields)
}

/// Single-line employee address built from the present, non-empty components
/// among street, city, state and zip. Numeric components (a zip extracted as
/// a number) are rendered as text; compound values are left out.
pub fn employee_address(employee: &Employee) -> String {
    let Some(address) = employee.address.as_ref() else {
        return String::new();
    };

    [&address.street, &address.city, &address.state, &address.zip]
        .into_iter()
        .filter_map(|component| component.as_ref())
        .filter(|component| component.is_truthy())
        .filter_map(TextValue::scalar_text)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Amount};
    use serde_json::json;

    #[test]
    fn test_normalize_fields_applies_every_step() {
        let raw = json!({
            "employee": {
                "name": "John A. Doe",
                "ssn": "123-45-6789",
                "address": {"street": "1 Main St", "city": "Albany", "state": "new york", "zip": "12207"}
            },
            "employer": {"name": "Acme", "ein": "12-3456789", "address": {"state": "ca"}},
            "federal": {"wages_tips": "$75,000.00", "federal_income_tax": "15000"},
            "state_local": [{"state": "New York", "state_wages": "75,000", "state_income_tax": 4500}],
            "other_boxes": {"box_12": {"D": 5000.0}}
        });

        let fields = normalize_fields(raw).unwrap();

        assert_eq!(fields.employee.ssn, Some("***-**-6789".into()));
        assert_eq!(fields.employer.ein, Some("***-**-6789".into()));
        assert_eq!(fields.employee.address.as_ref().unwrap().state, Some("NY".into()));
        assert_eq!(fields.employer.address.as_ref().unwrap().state, Some("CA".into()));
        assert_eq!(fields.federal.wages_tips, Some(Amount::Number(75000.0)));
        assert_eq!(fields.federal.federal_income_tax, Some(Amount::Number(15000.0)));
        assert_eq!(fields.state_local[0].state, Some("NY".into()));
        assert_eq!(fields.state_local[0].state_wages, Some(Amount::Number(75000.0)));
        assert_eq!(fields.state_local[0].state_income_tax, Some(Amount::Number(4500.0)));
        assert_eq!(fields.other_boxes["box_12"], json!({"D": 5000.0}));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = json!({
            "employee": {"ssn": "123456789", "address": {"state": "Ohio"}},
            "employer": {"ein": "98"},
            "federal": {"wages_tips": "$1,000", "medicare_tax": "-"},
            "state_local": [{"state": "oh", "state_wages": "999.99"}]
        });

        let once = normalize_fields(raw).unwrap();
        let again = normalize_fields(serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn test_parse_fields_rejects_non_objects() {
        assert!(parse_fields(Value::Null).is_ok());
        assert!(matches!(
            parse_fields(json!(["employee"])),
            Err(NormalizeError::NotAnObject { kind: "array" })
        ));
        assert!(matches!(
            parse_fields(json!({"employee": "John"})),
            Err(NormalizeError::Shape(_))
        ));
    }

    #[test]
    fn test_employee_address() {
        let mut employee = Employee::default();
        assert_eq!(employee_address(&employee), "");

        employee.address = Some(Address::default());
        assert_eq!(employee_address(&employee), "");

        employee.address = Some(Address {
            street: Some("123 Main Street".into()),
            city: Some("New York".into()),
            state: Some("NY".into()),
            zip: Some("10001".into()),
            ..Default::default()
        });
        assert_eq!(employee_address(&employee), "123 Main Street, New York, NY, 10001");

        employee.address = Some(Address {
            city: Some("Austin".into()),
            state: Some("".into()),
            zip: Some("73301".into()),
            ..Default::default()
        });
        assert_eq!(employee_address(&employee), "Austin, 73301");

        employee.address = Some(Address {
            street: Some(TextValue::Other(json!({"line1": "9 Elm St"}))),
            state: Some("OH".into()),
            zip: Some(TextValue::Other(json!(45402))),
            ..Default::default()
        });
        assert_eq!(employee_address(&employee), "OH, 45402");
    }
}
