//! Factory for resolving configured shape names

use super::ShapeKind;
use crate::error::{PipelineError, Result};

/// Resolve a configured shape name to a known record shape
///
/// Matching is case-insensitive and only looks at the last dotted segment,
/// so fully-qualified class names like `com.dbtojson.model.Employee` resolve
/// the same as `Employee`.
pub fn shape_from_name(name: &str) -> Result<ShapeKind> {
    let simple_name = name.trim().rsplit('.').next().unwrap_or_default();
    match simple_name.to_lowercase().as_str() {
        "product" => Ok(ShapeKind::Product),
        "person" => Ok(ShapeKind::Person),
        "employee" => Ok(ShapeKind::Employee),
        _ => Err(PipelineError::UnknownShape(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_and_qualified_names() {
        assert_eq!(shape_from_name("Product").unwrap(), ShapeKind::Product);
        assert_eq!(shape_from_name("person").unwrap(), ShapeKind::Person);
        assert_eq!(
            shape_from_name("com.dbtojson.model.Employee").unwrap(),
            ShapeKind::Employee
        );
    }

    #[test]
    fn test_unknown_name() {
        let err = shape_from_name("com.dbtojson.model.Invoice").unwrap_err();
        assert_eq!(err.to_string(), "Unknown record shape: com.dbtojson.model.Invoice");
    }

    #[test]
    fn test_nested_only_shapes_are_not_bindable() {
        assert!(shape_from_name("Address").is_err());
    }
}
