//! Generation of the `ToProperties` and `FromProperties` impls.
//!
//! Both derives parse the struct's fields through darling, turn each
//! non-ignored field into a read or write fragment keyed by its external
//! name, and splice the fragments into a trait impl.

use crate::helpers::combine_token_streams;
use darling::{ast, util::Ignored, FromDeriveInput, FromField};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

#[derive(FromDeriveInput)]
#[darling(attributes(property), supports(struct_named))]
struct PropertiesInput {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<Ignored, PropertyField>,
}

/// Struct field with its `#[property(...)]` options.
#[derive(FromField)]
#[darling(attributes(property))]
struct PropertyField {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    #[darling(default)]
    rename: Option<String>,
    #[darling(default)]
    ignore: bool,
    #[darling(default)]
    with: Option<syn::Path>,
}

impl PropertyField {
    fn external_name(&self) -> String {
        self.rename
            .clone()
            .unwrap_or_else(|| self.ident.as_ref().expect("named fields only").to_string())
    }
}

fn parse_fields(input: &PropertiesInput) -> syn::Result<Vec<&PropertyField>> {
    let fields = match &input.data {
        ast::Data::Struct(fields) => &fields.fields,
        ast::Data::Enum(..) => unreachable!("darling rejects non-struct inputs"),
    };

    // An external name containing an operator could never be read back;
    // reject it here, at binding construction, rather than at runtime
    for field in fields {
        if let Some(rename) = &field.rename {
            if rename.contains('=') || rename.contains('~') {
                return Err(syn::Error::new_spanned(
                    field.ident.as_ref().expect("named fields only"),
                    format!("property names cannot contain `=` or `~` : {rename}"),
                ));
            }
        }
    }

    Ok(fields.iter().filter(|field| !field.ignore).collect())
}

pub fn to_properties(item: TokenStream) -> TokenStream {
    let derive_input = parse_macro_input!(item as DeriveInput);
    let input = match PropertiesInput::from_derive_input(&derive_input) {
        Ok(input) => input,
        Err(error) => return error.write_errors().into(),
    };
    let fields = match parse_fields(&input) {
        Ok(fields) => fields,
        Err(error) => return error.to_compile_error().into(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let writes = combine_token_streams(fields.iter().map(|field| {
        let field_ident = field.ident.as_ref().expect("named fields only");
        let name = field.external_name();

        // A value rendered as None is omitted, no tombstone is written
        match &field.with {
            Some(converter) => quote! {
                if let Some(value) = ::propfile::serialize::PropertyConverter::to_property(
                    &<#converter as ::core::default::Default>::default(),
                    &self.#field_ident,
                ) {
                    file.set(#name, value);
                }
            },
            None => quote! {
                if let Some(value) =
                    ::propfile::serialize::ToPropertyValue::to_property_value(&self.#field_ident)
                {
                    file.set(#name, value);
                }
            },
        }
    }));

    quote!(
        #[automatically_derived]
        impl #impl_generics ::propfile::serialize::ToProperties for #ident #ty_generics #where_clause {
            fn to_properties(&self) -> ::propfile::PropertyFile {
                #[allow(unused_mut)]
                let mut file = ::propfile::PropertyFile::new();
                #writes
                file
            }
        }
    )
    .into()
}

pub fn from_properties(item: TokenStream) -> TokenStream {
    let derive_input = parse_macro_input!(item as DeriveInput);
    let input = match PropertiesInput::from_derive_input(&derive_input) {
        Ok(input) => input,
        Err(error) => return error.write_errors().into(),
    };
    let fields = match parse_fields(&input) {
        Ok(fields) => fields,
        Err(error) => return error.to_compile_error().into(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let reads = combine_token_streams(fields.iter().map(|field| {
        let field_ident = field.ident.as_ref().expect("named fields only");
        let ty = &field.ty;
        let name = field.external_name();

        let convert: TokenStream2 = match &field.with {
            Some(converter) => quote! {
                ::propfile::serialize::PropertyConverter::from_property(
                    &<#converter as ::core::default::Default>::default(),
                    value,
                )
            },
            None => quote! {
                <#ty as ::propfile::serialize::FromPropertyValue>::from_property_value(value)
            },
        };

        // A field the store cannot supply keeps its default; the caller
        // sees that through the warning list
        quote! {
            match file.get(#name) {
                Some(value) => {
                    parsed.#field_ident = match #convert {
                        Some(converted) => converted,
                        None => return Err(::propfile::Error::conversion(#name, value)),
                    };
                }
                None if file.contains(#name) => {
                    warnings.push(::propfile::serialize::MappingWarning {
                        field: #name,
                        kind: ::propfile::serialize::MappingWarningKind::NullValue,
                    });
                }
                None => {
                    warnings.push(::propfile::serialize::MappingWarning {
                        field: #name,
                        kind: ::propfile::serialize::MappingWarningKind::MissingValue,
                    });
                }
            }
        }
    }));

    quote!(
        #[automatically_derived]
        impl #impl_generics ::propfile::serialize::FromProperties for #ident #ty_generics #where_clause {
            fn from_properties(
                file: &::propfile::PropertyFile,
            ) -> ::core::result::Result<
                (Self, ::std::vec::Vec<::propfile::serialize::MappingWarning>),
                ::propfile::Error,
            > {
                #[allow(unused_mut)]
                let mut parsed = <Self as ::core::default::Default>::default();
                #[allow(unused_mut)]
                let mut warnings = ::std::vec::Vec::new();
                #reads
                ::core::result::Result::Ok((parsed, warnings))
            }
        }
    )
    .into()
}
