//! Field definition for record shapes
//!
//! A field definition carries the bound name of a field (what a camelCased
//! column name is matched against) and its declared type.

use std::fmt;

/// Declared type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Text value
    String,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// Double-precision float
    Double,
    /// Single-precision float
    Float,
    /// Exact decimal
    Decimal,
    /// Ordered list of strings, only populated by custom binding rules
    StringList,
    /// Nested record, only populated by custom binding rules
    Object,
}

impl FieldType {
    /// Whether a single column can be coerced straight into this type
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldType::StringList | FieldType::Object)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "String"),
            FieldType::Int => write!(f, "Int"),
            FieldType::Long => write!(f, "Long"),
            FieldType::Double => write!(f, "Double"),
            FieldType::Float => write!(f, "Float"),
            FieldType::Decimal => write!(f, "Decimal"),
            FieldType::StringList => write!(f, "List<String>"),
            FieldType::Object => write!(f, "Object"),
        }
    }
}

/// A field of a record shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Bound (camelCase) name of the field
    pub name: &'static str,
    /// Declared type of the field
    pub field_type: FieldType,
    /// Name of the nested shape, for object fields
    pub nested: Option<&'static str>,
}

impl FieldDefinition {
    #[must_use]
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            nested: None,
        }
    }

    /// Attach the name of the nested shape this field holds
    #[must_use]
    pub fn with_nested(mut self, shape: &'static str) -> Self {
        self.nested = Some(shape);
        self
    }

    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name
    }
}
