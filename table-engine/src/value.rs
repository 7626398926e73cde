//! FILENAME: table-engine/src/value.rs
//! PURPOSE: Defines the atomic cell value for tabular data.
//! CONTEXT: This file contains the `Value` enum and the `OrderedFloat`
//! wrapper that makes floating-point cells usable as hash keys, so whole
//! rows can be deduplicated and grouped without a separate key encoding.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A single cell in a table. `Null` is the missing-value sentinel used by
/// permissive parsing, unmatched join sides and absent concat columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int(i64),
    Float(OrderedFloat),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn float(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value. Only Int and Float are numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(f.as_f64()),
            _ => None,
        }
    }

    /// Null-propagating multiplication. Int * Int stays Int (falling back
    /// to Float on overflow); any other numeric pairing yields Float.
    /// Non-numeric operands yield Null.
    pub fn mul(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => match a.checked_mul(*b) {
                Some(p) => Value::Int(p),
                None => Value::float(*a as f64 * *b as f64),
            },
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => Value::float(a * b),
                _ => Value::Null,
            },
        }
    }

    /// Returns the display form of the value as a String.
    /// Used for CSV fields, pivot column labels and console previews.
    pub fn display(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int(i) => format!("{}", i),
            Value::Float(f) => {
                let n = f.as_f64();
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Total ordering across value variants, used for sorting keys and labels.
/// Null sorts first; Int and Float compare numerically with each other;
/// then DateTime, then Text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::DateTime(_) => 2,
            Value::Text(_) => 3,
        }
    }

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Text(ta), Value::Text(tb)) => ta.cmp(tb),
        (Value::DateTime(da), Value::DateTime(db)) => da.cmp(db),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(na), Some(nb)) => na.partial_cmp(&nb).unwrap_or(Ordering::Equal),
            _ => rank(a).cmp(&rank(b)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_int_keeps_int() {
        assert_eq!(Value::Int(2).mul(&Value::Int(3)), Value::Int(6));
    }

    #[test]
    fn test_mul_mixed_is_float() {
        assert_eq!(Value::Int(2).mul(&Value::float(3.0)), Value::float(6.0));
    }

    #[test]
    fn test_mul_null_propagates() {
        assert_eq!(Value::Null.mul(&Value::float(3.0)), Value::Null);
        assert_eq!(Value::Int(2).mul(&Value::Null), Value::Null);
        assert_eq!(Value::text("x").mul(&Value::Int(2)), Value::Null);
    }

    #[test]
    fn test_ordering_null_first() {
        assert_eq!(compare_values(&Value::Null, &Value::Int(0)), Ordering::Less);
        assert_eq!(
            compare_values(&Value::text("a"), &Value::text("b")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Int(2), &Value::float(1.5)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.display(), "");
        assert_eq!(Value::float(9.0).display(), "9");
        assert_eq!(Value::float(2.5).display(), "2.5");
        assert_eq!(Value::Int(42).display(), "42");
    }

    #[test]
    fn test_nan_hash_equal() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Value::float(f64::NAN));
        set.insert(Value::float(f64::NAN));
        assert_eq!(set.len(), 1);
    }
}
