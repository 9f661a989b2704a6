//! Tests for the helpers behind the `Shape` derive.
//!
//! The derive itself is exercised by the main crate's record models.

use crate::utils::{classify_field_type, snake_to_camel, FieldKind};
use syn::parse_quote;

#[test]
fn test_snake_to_camel() {
    assert_eq!(snake_to_camel("employee_age"), "employeeAge");
    assert_eq!(snake_to_camel("id"), "id");
    assert_eq!(snake_to_camel("date_of_birth"), "dateOfBirth");
}

#[test]
fn test_classify_scalar_options() {
    let ty: syn::Type = parse_quote!(Option<i64>);
    assert_eq!(classify_field_type(&ty), Some(FieldKind::Long));

    let ty: syn::Type = parse_quote!(Option<String>);
    assert_eq!(classify_field_type(&ty), Some(FieldKind::String));

    let ty: syn::Type = parse_quote!(Option<rust_decimal::Decimal>);
    assert_eq!(classify_field_type(&ty), Some(FieldKind::Decimal));
}

#[test]
fn test_classify_lists_and_objects() {
    let ty: syn::Type = parse_quote!(Option<Vec<String>>);
    assert_eq!(classify_field_type(&ty), Some(FieldKind::StringList));

    let ty: syn::Type = parse_quote!(Option<Address>);
    assert_eq!(classify_field_type(&ty), Some(FieldKind::Object));
}

#[test]
fn test_non_option_is_rejected() {
    let ty: syn::Type = parse_quote!(i64);
    assert_eq!(classify_field_type(&ty), None);
}
