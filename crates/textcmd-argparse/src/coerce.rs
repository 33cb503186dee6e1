//! Conversion of raw string tokens into typed values.

use textcmd_schema::{Value, ValueType};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a valid {expected}")]
pub struct CoerceError {
    pub raw: String,
    pub expected: ValueType,
}

/// Convert `raw` into a value of type `ty`.
///
/// - `string`: always succeeds, the token is kept as is
/// - `number`: a finite decimal literal such as `12`, `-0.5` or `1e3`
/// - `boolean`: `true`/`false` in any case, or exactly `1`/`0`
pub fn coerce(raw: &str, ty: ValueType) -> Result<Value, CoerceError> {
    let value = match ty {
        ValueType::String => Some(Value::String(raw.to_string())),
        ValueType::Number => parse_number(raw).map(Value::Number),
        ValueType::Boolean => parse_bool(raw).map(Value::Boolean),
    };
    value.ok_or_else(|| CoerceError {
        raw: raw.to_string(),
        expected: ty,
    })
}

pub fn parse_number(raw: &str) -> Option<f64> {
    // `f64::from_str` also accepts "inf" and "NaN", which are not numeric literals here.
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
