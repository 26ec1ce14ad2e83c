//! Procedural macros for acton-admin
//!
//! Provides `#[derive(AdminModel)]`, which turns a plain struct into an
//! admin-panel schema at compile time. Field kinds are inferred from the
//! declared Rust types so the runtime never has to inspect values.
//!
//! # Example
//!
//! ```rust,ignore
//! use acton_admin::AdminModel;
//!
//! #[derive(AdminModel)]
//! struct Base {
//!     #[admin(rename = "ID")]
//!     id: i64,
//!     deleted_at: Option<chrono::NaiveDateTime>,
//! }
//!
//! #[derive(AdminModel)]
//! struct User {
//!     #[admin(embed)]
//!     model: Base,
//!     name: String,
//!     nickname: Option<String>,
//!     #[admin(skip)]
//!     cache: Vec<u8>,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type};

/// Derive `acton_admin::AdminModel` for a struct with named fields
///
/// Supported attributes:
/// - `#[admin(name = "...")]` on the struct overrides the model name
/// - `#[admin(embed)]` promotes the fields of an embedded `AdminModel`
/// - `#[admin(rename = "...")]` overrides a field's display name
/// - `#[admin(kind = "...")]` forces a field kind (`bool`, `integer`, `float`,
///   `timestamp`, `nullable_timestamp`, `duration`, `text`)
/// - `#[admin(skip)]` leaves a field out of the admin panel
#[proc_macro_derive(AdminModel, attributes(admin))]
pub fn derive_admin_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct FieldOptions {
    embed: bool,
    skip: bool,
    rename: Option<String>,
    kind: Option<LitStr>,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut model_name = ident.to_string();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("admin")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                model_name = value.value();
                Ok(())
            } else {
                Err(meta.error("unsupported admin attribute on struct, expected `name`"))
            }
        })?;
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            ident,
            "AdminModel can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            ident,
            "AdminModel requires a struct with named fields",
        ));
    };

    let mut entries = Vec::new();
    for field in &fields.named {
        let options = field_options(field)?;
        if options.skip {
            continue;
        }

        let raw = field
            .ident
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let raw = raw.strip_prefix("r#").unwrap_or(&raw);
        let name = options.rename.unwrap_or_else(|| pascal_case(raw));

        if options.embed {
            let ty = &field.ty;
            entries.push(quote! {
                .embed(#name, <#ty as ::acton_admin::AdminModel>::schema())
            });
            continue;
        }

        let kind = match options.kind {
            Some(lit) => explicit_kind(&lit)?,
            None => infer_kind(&field.ty),
        };
        if is_option(&field.ty) {
            entries.push(quote! { .optional(#name, #kind) });
        } else {
            entries.push(quote! { .field(#name, #kind) });
        }
    }

    Ok(quote! {
        impl #impl_generics ::acton_admin::AdminModel for #ident #ty_generics #where_clause {
            fn schema() -> ::acton_admin::ModelSchema {
                ::acton_admin::ModelSchema::builder(#model_name)
                    #(#entries)*
                    .build()
            }
        }
    })
}

fn field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("admin")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("embed") {
                options.embed = true;
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
            } else if meta.path.is_ident("kind") {
                options.kind = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error(
                    "unsupported admin attribute, expected `embed`, `skip`, `rename` or `kind`",
                ));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

fn explicit_kind(lit: &LitStr) -> syn::Result<TokenStream2> {
    let variant = match lit.value().as_str() {
        "bool" | "boolean" => quote!(Bool),
        "integer" | "int" => quote!(Integer),
        "float" => quote!(Float),
        "timestamp" => quote!(Timestamp),
        "nullable_timestamp" => quote!(NullableTimestamp),
        "duration" => quote!(Duration),
        "text" | "string" => quote!(Text),
        other => {
            return Err(syn::Error::new_spanned(
                lit,
                format!("unknown field kind `{other}`"),
            ))
        }
    };
    Ok(quote!(::acton_admin::FieldKind::#variant))
}

fn infer_kind(ty: &Type) -> TokenStream2 {
    let variant = match last_segment(ty) {
        Some((name, inner)) if name == "Option" => match inner.map(|t| kind_name(&t)) {
            Some("Timestamp") => "NullableTimestamp",
            Some(kind) => kind,
            None => "Text",
        },
        Some(_) => kind_name(ty),
        None => "Text",
    };
    let variant = syn::Ident::new(variant, proc_macro2::Span::call_site());
    quote!(::acton_admin::FieldKind::#variant)
}

/// `Option<T>` members map to nullable columns
fn is_option(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|(name, _)| name == "Option")
}

fn kind_name(ty: &Type) -> &'static str {
    match last_segment(ty).map(|(name, _)| name) {
        Some(name) => match name.as_str() {
            "bool" => "Bool",
            "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
                "Integer"
            }
            "f32" | "f64" => "Float",
            "NaiveDateTime" | "DateTime" | "PrimitiveDateTime" | "OffsetDateTime" => "Timestamp",
            "Duration" => "Duration",
            _ => "Text",
        },
        None => "Text",
    }
}

/// Last path segment of a type and its first generic type argument
fn last_segment(ty: &Type) -> Option<(String, Option<Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let inner = match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(t) => Some(t.clone()),
            _ => None,
        }),
        _ => None,
    };
    Some((segment.ident.to_string(), inner))
}

fn pascal_case(ident: &str) -> String {
    ident
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}
