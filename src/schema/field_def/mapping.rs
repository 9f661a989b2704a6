//! Field mapping for record shapes
//!
//! Pairs a field definition with a typed setter. Setters are plain function
//! pointers generated by the `Shape` derive, one per settable field, so no
//! name-based lookup happens while a row is bound.

use rust_decimal::Decimal;

use super::field::{FieldDefinition, FieldType};
use crate::schema::adapt::Coerced;

/// Typed setter for one field of a record
pub enum Setter<T> {
    String(fn(&mut T, String)),
    Int(fn(&mut T, i32)),
    Long(fn(&mut T, i64)),
    Double(fn(&mut T, f64)),
    Float(fn(&mut T, f32)),
    Decimal(fn(&mut T, Decimal)),
}

impl<T> Setter<T> {
    /// The field type this setter accepts
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            Setter::String(_) => FieldType::String,
            Setter::Int(_) => FieldType::Int,
            Setter::Long(_) => FieldType::Long,
            Setter::Double(_) => FieldType::Double,
            Setter::Float(_) => FieldType::Float,
            Setter::Decimal(_) => FieldType::Decimal,
        }
    }

    /// Assign a coerced value; returns false if the value has the wrong type
    pub fn set(&self, target: &mut T, value: Coerced) -> bool {
        match (self, value) {
            (Setter::String(f), Coerced::String(v)) => f(target, v),
            (Setter::Int(f), Coerced::Int(v)) => f(target, v),
            (Setter::Long(f), Coerced::Long(v)) => f(target, v),
            (Setter::Double(f), Coerced::Double(v)) => f(target, v),
            (Setter::Float(f), Coerced::Float(v)) => f(target, v),
            (Setter::Decimal(f), Coerced::Decimal(v)) => f(target, v),
            _ => return false,
        }
        true
    }
}

/// A field definition together with how to assign it on a record
pub struct FieldMapping<T> {
    /// The field definition
    pub definition: FieldDefinition,
    /// Setter used by convention binding; `None` for list and nested fields
    pub setter: Option<Setter<T>>,
}

impl<T> FieldMapping<T> {
    #[must_use]
    pub fn new(definition: FieldDefinition, setter: Option<Setter<T>>) -> Self {
        debug_assert!(
            setter
                .as_ref()
                .is_none_or(|s| s.field_type() == definition.field_type),
            "setter type must match the declared field type"
        );
        Self { definition, setter }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.definition.field_type
    }
}
