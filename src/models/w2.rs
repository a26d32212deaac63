use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Names of the ten federal monetary boxes, in form order.
pub const FEDERAL_MONETARY_FIELDS: [&str; 10] = [
    "wages_tips",
    "federal_income_tax",
    "social_security_wages",
    "social_security_tax",
    "medicare_wages",
    "medicare_tax",
    "social_security_tips",
    "allocated_tips",
    "dependent_care_benefits",
    "nonqualified_plans",
];

/// A value found in a textual slot (names, identifiers, address parts, states).
///
/// Only the `Text` arm is ever rewritten by normalization; numbers, arrays and
/// other JSON values are carried through exactly as they were extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Text(String),
    Other(Value),
}

impl TextValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TextValue::Text(s) => Some(s),
            TextValue::Other(_) => None,
        }
    }

    /// Whether the slot holds something worth acting on: a non-empty string,
    /// a non-zero number, `true` or a non-empty array or object.
    pub fn is_truthy(&self) -> bool {
        match self {
            TextValue::Text(s) => !s.is_empty(),
            TextValue::Other(Value::Null) => false,
            TextValue::Other(Value::Bool(b)) => *b,
            TextValue::Other(Value::Number(n)) => n.as_f64().map_or(true, |v| v != 0.0),
            TextValue::Other(Value::String(s)) => !s.is_empty(),
            TextValue::Other(Value::Array(items)) => !items.is_empty(),
            TextValue::Other(Value::Object(map)) => !map.is_empty(),
        }
    }

    /// Strings as they are and numbers in their JSON rendering. Compound
    /// values have no textual form.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            TextValue::Text(s) => Some(s.clone()),
            TextValue::Other(Value::Number(n)) => Some(n.to_string()),
            TextValue::Other(_) => None,
        }
    }
}

impl From<&str> for TextValue {
    fn from(value: &str) -> Self {
        TextValue::Text(value.to_string())
    }
}

impl From<String> for TextValue {
    fn from(value: String) -> Self {
        TextValue::Text(value)
    }
}

/// Deserializes a section that may be missing or explicitly null.
fn deserialize_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A value found in a monetary slot of an extracted form.
///
/// Before numeric coercion a slot may hold formatted text such as
/// `"$75,000.00"`; afterwards it holds either a number or nothing. Values of
/// any other JSON type are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Amount {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<TextValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TextValue>,
    /// Masked after normalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TextValue>,
    /// Masked after normalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ein: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_id: Option<TextValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Federal boxes 1-11. Every box is nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FederalAmounts {
    #[serde(default)]
    pub wages_tips: Option<Amount>,
    #[serde(default)]
    pub federal_income_tax: Option<Amount>,
    #[serde(default)]
    pub social_security_wages: Option<Amount>,
    #[serde(default)]
    pub social_security_tax: Option<Amount>,
    #[serde(default)]
    pub medicare_wages: Option<Amount>,
    #[serde(default)]
    pub medicare_tax: Option<Amount>,
    #[serde(default)]
    pub social_security_tips: Option<Amount>,
    #[serde(default)]
    pub allocated_tips: Option<Amount>,
    #[serde(default)]
    pub dependent_care_benefits: Option<Amount>,
    #[serde(default)]
    pub nonqualified_plans: Option<Amount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FederalAmounts {
    /// Mutable access to the ten monetary boxes, in form order.
    pub fn amounts_mut(&mut self) -> [&mut Option<Amount>; 10] {
        [
            &mut self.wages_tips,
            &mut self.federal_income_tax,
            &mut self.social_security_wages,
            &mut self.social_security_tax,
            &mut self.medicare_wages,
            &mut self.medicare_tax,
            &mut self.social_security_tips,
            &mut self.allocated_tips,
            &mut self.dependent_care_benefits,
            &mut self.nonqualified_plans,
        ]
    }
}

/// One row of boxes 15-17.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateLocalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_state_id: Option<TextValue>,
    #[serde(default)]
    pub state_wages: Option<Amount>,
    #[serde(default)]
    pub state_income_tax: Option<Amount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The full field tree of a W-2 form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct W2Fields {
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub employee: Employee,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub employer: Employer,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub federal: FederalAmounts,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub state_local: Vec<StateLocalRecord>,
    /// Boxes 12-14, passed through unmodified
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub other_boxes: Map<String, Value>,
}

impl W2Fields {
    /// Number of top-level sections, as reported by the CLI summary.
    pub const SECTION_COUNT: usize = 5;
}
