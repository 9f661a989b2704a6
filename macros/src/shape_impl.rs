//! Shape derive macro implementation
//!
//! Generates a `Shaped` implementation holding the struct's field table.
//! Each settable field gets a plain `fn` setter; list and nested-object
//! fields are described but left to a custom binding rule.

use darling::{ast, FromDeriveInput, FromField};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::utils::{classify_field_type, snake_to_camel, FieldKind};

/// Receiver for the struct that derives Shape
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(shape), supports(struct_named))]
pub struct ShapeReceiver {
    /// The struct identifier
    ident: syn::Ident,
    /// The struct data with parsed fields
    data: ast::Data<(), ShapeFieldReceiver>,
    /// Registry name of the shape
    #[darling(default)]
    name: Option<String>,
}

/// Receiver for the fields in the struct
#[derive(Debug, FromField)]
#[darling(attributes(field))]
pub struct ShapeFieldReceiver {
    /// The field identifier
    ident: Option<syn::Ident>,
    /// The field type
    ty: syn::Type,
    /// Bound name override
    #[darling(default)]
    name: Option<String>,
    /// Name of the nested shape for object fields
    #[darling(default)]
    nested: Option<String>,
}

/// Process the Shape derive macro
pub fn process_derive_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let receiver = match ShapeReceiver::from_derive_input(&input) {
        Ok(receiver) => receiver,
        Err(err) => return err.write_errors().into(),
    };

    let ast::Data::Struct(fields) = &receiver.data else {
        unreachable!("Darling ensures this is a struct")
    };

    match generate_shape_impl(&receiver, fields) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_shape_impl(
    receiver: &ShapeReceiver,
    fields: &ast::Fields<ShapeFieldReceiver>,
) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &receiver.ident;
    let shape_name = receiver
        .name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());

    let mut mappings = Vec::new();
    for field in fields.iter() {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let Some(kind) = classify_field_type(&field.ty) else {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "record shape fields must be Option<_> so unset values can be omitted",
            ));
        };
        if kind == FieldKind::Object && field.nested.is_none() {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "object fields need #[field(nested = \"ShapeName\")]",
            ));
        }

        let bound_name = field
            .name
            .clone()
            .unwrap_or_else(|| snake_to_camel(&field_ident.to_string()));
        let field_type = kind.field_type_tokens();

        let definition = match &field.nested {
            Some(nested) => quote! {
                ::db_to_json::schema::FieldDefinition::new(#bound_name, #field_type)
                    .with_nested(#nested)
            },
            None => quote! {
                ::db_to_json::schema::FieldDefinition::new(#bound_name, #field_type)
            },
        };

        let setter = match kind.setter_variant() {
            Some(variant) => quote! {
                ::std::option::Option::Some(#variant(
                    |record: &mut #struct_name, value| record.#field_ident = ::std::option::Option::Some(value)
                ))
            },
            None => quote! { ::std::option::Option::None },
        };

        mappings.push(quote! {
            ::db_to_json::schema::FieldMapping::new(#definition, #setter)
        });
    }

    Ok(quote! {
        impl ::db_to_json::schema::Shaped for #struct_name {
            fn shape() -> &'static ::db_to_json::schema::RecordShape<Self> {
                static SHAPE: ::std::sync::LazyLock<::db_to_json::schema::RecordShape<#struct_name>> =
                    ::std::sync::LazyLock::new(|| {
                        ::db_to_json::schema::RecordShape::new(#shape_name, vec![#(#mappings),*])
                    });
                &SHAPE
            }
        }
    })
}
