use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::{Address, TextValue, W2Fields};

/// The fifty U.S. states. Territories and DC are not recognized.
pub const US_STATES: [(&str, &str); 50] = [
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

// lowercase full name and lowercase code -> canonical code
static STATE_LOOKUP: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut lookup = HashMap::with_capacity(US_STATES.len() * 2);
    for (name, code) in US_STATES {
        lookup.insert(name.to_string(), code);
        lookup.insert(code.to_lowercase(), code);
    }
    lookup
});

/// Canonical two-letter code for a state name or abbreviation.
///
/// Matching is exact after trimming and lower-casing.
pub fn normalize_state(raw: &str) -> Option<&'static str> {
    STATE_LOOKUP.get(&raw.trim().to_lowercase()).copied()
}

fn normalize_in_place(slot: &mut Option<TextValue>) {
    if let Some(code) = slot.as_ref().and_then(TextValue::as_str).and_then(normalize_state) {
        *slot = Some(code.into());
    }
}

fn normalize_address(address: &mut Option<Address>) {
    if let Some(address) = address.as_mut() {
        normalize_in_place(&mut address.state);
    }
}

/// Rewrite every recognized state in the field tree to its canonical code.
/// Unrecognized values are kept verbatim.
pub fn normalize_state_codes(mut fields: W2Fields) -> W2Fields {
    normalize_address(&mut fields.employee.address);
    normalize_address(&mut fields.employer.address);
    for record in &mut fields.state_local {
        normalize_in_place(&mut record.state);
    }
    fields
}
