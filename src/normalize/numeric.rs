use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::{Amount, W2Fields};

static NON_NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^0-9.\-]").expect("Non-numeric regex should be valid")
});

/// Parse currency-formatted text into a number.
///
/// Everything except digits, `.` and `-` is stripped first. Returns `None`
/// when nothing usable is left or the remainder does not parse.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = NON_NUMERIC_REGEX.replace_all(raw, "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Could not parse amount '{}': {}", cleaned, e);
            None
        }
    }
}

/// Coerce one monetary slot. Only text is converted; numbers and other
/// values pass through unchanged.
pub fn coerce_amount(amount: Option<Amount>) -> Option<Amount> {
    match amount {
        Some(Amount::Text(raw)) => parse_amount(&raw).map(Amount::Number),
        other => other,
    }
}

fn coerce_in_place(slot: &mut Option<Amount>) {
    *slot = coerce_amount(slot.take());
}

/// Convert every federal and state monetary box from text to a number.
pub fn coerce_numeric_fields(mut fields: W2Fields) -> W2Fields {
    for slot in fields.federal.amounts_mut() {
        coerce_in_place(slot);
    }
    for record in &mut fields.state_local {
        coerce_in_place(&mut record.state_wages);
        coerce_in_place(&mut record.state_income_tax);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StateLocalRecord;
    use serde_json::json;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$75,000.00"), Some(75000.0));
        assert_eq!(parse_amount("15000"), Some(15000.0));
        assert_eq!(parse_amount("-1,250.50"), Some(-1250.5));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("."), None);
    }

    #[test]
    fn test_coerce_amount_passthrough() {
        assert_eq!(coerce_amount(Some(Amount::Number(42.5))), Some(Amount::Number(42.5)));
        assert_eq!(coerce_amount(None), None);
        assert_eq!(
            coerce_amount(Some(Amount::Other(json!(true)))),
            Some(Amount::Other(json!(true)))
        );
    }

    #[test]
    fn test_coerce_numeric_fields() {
        let mut fields = W2Fields::default();
        fields.federal.wages_tips = Some("$75,000.00".into());
        fields.federal.federal_income_tax = Some("15000".into());
        fields.federal.medicare_tax = Some("".into());
        fields.federal.allocated_tips = Some("-".into());
        fields.state_local.push(StateLocalRecord {
            state_wages: Some("72,500".into()),
            state_income_tax: Some("unknown".into()),
            ..Default::default()
        });

        let fields = coerce_numeric_fields(fields);

        assert_eq!(fields.federal.wages_tips, Some(Amount::Number(75000.0)));
        assert_eq!(fields.federal.federal_income_tax, Some(Amount::Number(15000.0)));
        assert_eq!(fields.federal.medicare_tax, None);
        assert_eq!(fields.federal.allocated_tips, None);
        assert_eq!(fields.state_local[0].state_wages, Some(Amount::Number(72500.0)));
        assert_eq!(fields.state_local[0].state_income_tax, None);
    }
}
