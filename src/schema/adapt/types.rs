//! Core types for value coercion.

use std::fmt;

use rust_decimal::Decimal;

use crate::schema::FieldType;

/// A row value after coercion to a field's declared type
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    String(String),
    Int(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    Decimal(Decimal),
}

impl Coerced {
    /// False for NaN and infinite floats, which have no JSON representation
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Coerced::Double(d) => d.is_finite(),
            Coerced::Float(f) => f.is_finite(),
            _ => true,
        }
    }
}

/// A value that could not be converted to a field's declared type
///
/// Never fatal: the field is left unset and the miss is logged.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionMiss {
    /// Kind of the source value
    pub source_kind: &'static str,
    /// Declared type of the target field
    pub target: FieldType,
    /// Why the conversion produced no result
    pub reason: String,
}

impl fmt::Display for CoercionMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot convert {} value to {}: {}",
            self.source_kind, self.target, self.reason
        )
    }
}
