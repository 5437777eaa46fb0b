use serde::{Deserialize, Serialize};
use std::fmt;

/// An untyped cell value as it travels on the wire.
///
/// The wire carries no type tag beyond "number or text"; what a value
/// means comes from the protocol schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

/// Column-major table values: one inner vector per column.
pub type RawColumns = Vec<Vec<Option<RawValue>>>;

impl RawValue {
    /// Empty strings carry no reading.
    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Text(text) if text.is_empty())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(number) => Some(*number),
            RawValue::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(number) => write!(f, "{number}"),
            RawValue::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_owned())
    }
}
