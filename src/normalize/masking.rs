use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{TextValue, W2Fields};

static NON_DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^0-9]").expect("Non-digit regex should be valid")
});

/// Mask returned when fewer than four digits are available.
pub const FULL_MASK: &str = "***-**-****";

/// Redact an identifier down to its last four digits.
///
/// SSNs and EINs share the same `***-**-NNNN` template even though an EIN is
/// formatted `NN-NNNNNNN`.
pub fn mask_identifier(raw: &str) -> String {
    let digits = NON_DIGIT_REGEX.replace_all(raw, "");
    if digits.len() >= 4 {
        format!("***-**-{}", &digits[digits.len() - 4..])
    } else {
        FULL_MASK.to_string()
    }
}

fn mask_in_place(slot: &mut Option<TextValue>) {
    let masked = slot.as_ref().filter(|value| value.is_truthy()).map(|value| match value {
        TextValue::Text(raw) => mask_identifier(raw),
        TextValue::Other(other) => mask_identifier(&other.to_string()),
    });
    if let Some(masked) = masked {
        *slot = Some(TextValue::Text(masked));
    }
}

/// Mask `employee.ssn` and `employer.ein`. Absent or empty values are left as
/// they are; a non-string identifier is masked from its digits.
pub fn mask_sensitive_fields(mut fields: W2Fields) -> W2Fields {
    mask_in_place(&mut fields.employee.ssn);
    mask_in_place(&mut fields.employer.ein);
    fields
}
