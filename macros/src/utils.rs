//! Utility functions for procedural macros
//!
//! Type inspection and naming helpers used by the `Shape` derive.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

/// The field kinds a record shape can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int,
    Long,
    Double,
    Float,
    Decimal,
    StringList,
    Object,
}

impl FieldKind {
    /// Path to the matching `FieldType` variant in the main crate
    pub fn field_type_tokens(self) -> TokenStream {
        match self {
            FieldKind::String => quote! { ::db_to_json::schema::FieldType::String },
            FieldKind::Int => quote! { ::db_to_json::schema::FieldType::Int },
            FieldKind::Long => quote! { ::db_to_json::schema::FieldType::Long },
            FieldKind::Double => quote! { ::db_to_json::schema::FieldType::Double },
            FieldKind::Float => quote! { ::db_to_json::schema::FieldType::Float },
            FieldKind::Decimal => quote! { ::db_to_json::schema::FieldType::Decimal },
            FieldKind::StringList => quote! { ::db_to_json::schema::FieldType::StringList },
            FieldKind::Object => quote! { ::db_to_json::schema::FieldType::Object },
        }
    }

    /// Path to the matching `Setter` variant, if the kind is settable from a single column
    pub fn setter_variant(self) -> Option<TokenStream> {
        match self {
            FieldKind::String => Some(quote! { ::db_to_json::schema::Setter::String }),
            FieldKind::Int => Some(quote! { ::db_to_json::schema::Setter::Int }),
            FieldKind::Long => Some(quote! { ::db_to_json::schema::Setter::Long }),
            FieldKind::Double => Some(quote! { ::db_to_json::schema::Setter::Double }),
            FieldKind::Float => Some(quote! { ::db_to_json::schema::Setter::Float }),
            FieldKind::Decimal => Some(quote! { ::db_to_json::schema::Setter::Decimal }),
            FieldKind::StringList | FieldKind::Object => None,
        }
    }
}

/// Classify an `Option<T>` field type
///
/// Returns `None` when the type is not an `Option`.
pub fn classify_field_type(ty: &Type) -> Option<FieldKind> {
    let inner = option_inner_type(ty)?;
    let Some(ident) = last_segment_ident(inner) else {
        return Some(FieldKind::Object);
    };

    let kind = match ident.as_str() {
        "String" => FieldKind::String,
        "i32" => FieldKind::Int,
        "i64" => FieldKind::Long,
        "f64" => FieldKind::Double,
        "f32" => FieldKind::Float,
        "Decimal" => FieldKind::Decimal,
        "Vec" => match vec_inner_ident(inner).as_deref() {
            Some("String") => FieldKind::StringList,
            _ => FieldKind::Object,
        },
        _ => FieldKind::Object,
    };
    Some(kind)
}

/// Extract the `T` of an `Option<T>`
fn option_inner_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(syn::GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

fn last_segment_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

fn vec_inner_ident(ty: &Type) -> Option<String> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(syn::GenericArgument::Type(inner)) => last_segment_ident(inner),
            _ => None,
        },
        _ => None,
    }
}

/// Convert a snake_case identifier to camelCase
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, part) in name.split('_').enumerate() {
        if i == 0 {
            out.push_str(part);
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
