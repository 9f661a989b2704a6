//! Type-directed conversion of raw row values into declared field types.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::reader::Value;
use crate::schema::FieldType;
use crate::schema::adapt::types::{Coerced, CoercionMiss};

/// Convert a row value to the target field type
///
/// - matching type: identity
/// - target `String`: string representation of any value
/// - numeric target and numeric value: narrowing/widening cast
/// - target `Decimal`: exact parse of a numeric value or numeric string
/// - anything else, including `Null` and NaN or infinite floats for a numeric
///   target: a [`CoercionMiss`]
pub fn coerce(value: &Value, target: FieldType) -> Result<Coerced, CoercionMiss> {
    let miss = |reason: &str| CoercionMiss {
        source_kind: value.kind(),
        target,
        reason: reason.to_string(),
    };

    match (value, target) {
        (Value::Null, _) => Err(miss("value is null")),

        (Value::Text(s), FieldType::String) => Ok(Coerced::String(s.clone())),
        (v, FieldType::String) => Ok(Coerced::String(v.to_string())),

        (Value::Integer(i), FieldType::Long) => Ok(Coerced::Long(*i)),
        (Value::Numeric(d), FieldType::Decimal) => Ok(Coerced::Decimal(*d)),

        (_, t) if !t.is_scalar() => Err(miss("field is not settable from a single column")),

        (Value::Real(r), _) if !r.is_finite() => Err(miss("non-finite float")),

        (v, FieldType::Int | FieldType::Long | FieldType::Double | FieldType::Float)
            if v.is_numeric() =>
        {
            convert_numeric(v, target)
                .filter(Coerced::is_finite)
                .ok_or_else(|| miss("numeric value out of range"))
        }

        (Value::Integer(i), FieldType::Decimal) => Ok(Coerced::Decimal(Decimal::from(*i))),
        (Value::Real(r), FieldType::Decimal) => {
            parse_decimal(&format!("{r:?}"))
                .map(Coerced::Decimal)
                .ok_or_else(|| miss("float outside decimal range"))
        }
        (Value::Text(s), FieldType::Decimal) => parse_decimal(s)
            .map(Coerced::Decimal)
            .ok_or_else(|| miss(&format!("'{s}' is not a decimal number"))),

        _ => Err(miss("no conversion available")),
    }
}

/// Numeric-to-numeric conversion with `as` semantics
///
/// Narrowing an out-of-range double to `Float` yields infinity, which the
/// caller rejects.
#[allow(clippy::cast_possible_truncation)]
fn convert_numeric(value: &Value, target: FieldType) -> Option<Coerced> {
    match value {
        Value::Integer(i) => Some(match target {
            FieldType::Int => Coerced::Int(*i as i32),
            FieldType::Long => Coerced::Long(*i),
            FieldType::Double => Coerced::Double(*i as f64),
            FieldType::Float => Coerced::Float(*i as f32),
            _ => return None,
        }),
        Value::Real(r) => Some(match target {
            FieldType::Int => Coerced::Int(*r as i32),
            FieldType::Long => Coerced::Long(*r as i64),
            FieldType::Double => Coerced::Double(*r),
            FieldType::Float => Coerced::Float(*r as f32),
            _ => return None,
        }),
        Value::Numeric(d) => match target {
            FieldType::Int => d.trunc().to_i64().map(|i| Coerced::Int(i as i32)),
            FieldType::Long => d.trunc().to_i64().map(Coerced::Long),
            FieldType::Double => d.to_f64().map(Coerced::Double),
            FieldType::Float => d.to_f32().map(Coerced::Float),
            _ => None,
        },
        _ => None,
    }
}

/// Parse plain or scientific decimal notation
fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
