//! # Sertrace Derive Macros
//!
//! This crate provides the procedural macro for `sertrace`. It automates the
//! implementation of the `Described` and `Traceable` introspection traits,
//! analyzing field attributes to determine which fields are excluded from the
//! round-trip walk.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Type, parse_macro_input};

/// Derives `Described` and `Traceable` for a named-field struct.
///
/// Field attributes:
/// - `#[trace(transient)]` — the field is marked as non-serializing; the
///   tracer records `TRANSIENT` and never descends into it.
/// - `#[trace(static_field)]` — the field is class-level/shared state rather
///   than instance state; the tracer records `STATIC_FIELD`.
///
/// `Option<T>` fields are surfaced to the tracer as nullable: a `None` value
/// becomes `FieldRef::Null` and the field's *declared* type is the inner `T`.
#[proc_macro_derive(Traceable, attributes(trace))]
pub fn derive_traceable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    if !input.generics.params.is_empty() {
        return syn::Error::new(
            name.span(),
            "Traceable cannot be derived for generic types; implement the trait by hand",
        )
        .to_compile_error()
        .into();
    }

    let data_struct = match input.data {
        Data::Struct(ds) => ds,
        _ => {
            return syn::Error::new(name.span(), "Traceable only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let fields = match data_struct.fields {
        Fields::Named(named) => named.named,
        _ => {
            return syn::Error::new(name.span(), "Traceable requires named fields")
                .to_compile_error()
                .into();
        }
    };

    let mut parsed = Vec::new();
    for field in fields {
        let flags = match parse_attributes(&field.attrs) {
            Ok(flags) => flags,
            Err(e) => return e.to_compile_error().into(),
        };
        parsed.push(TracedField {
            ident: field.ident.clone().expect("named field"),
            ty: field.ty.clone(),
            flags,
        });
    }

    let impl_described = generate_described(&name);
    let impl_traceable = generate_traceable(&name, &parsed);

    let expanded = quote! {
        #impl_described
        #impl_traceable
    };

    TokenStream::from(expanded)
}

// --- Internal Data Structures ---

struct TracedField {
    ident: syn::Ident,
    ty: Type,
    flags: FieldFlags,
}

#[derive(Default)]
struct FieldFlags {
    is_transient: bool,
    is_static: bool,
}

/// Parses `#[trace(..)]` attributes on a field.
fn parse_attributes(attrs: &[Attribute]) -> syn::Result<FieldFlags> {
    let mut flags = FieldFlags::default();

    for attr in attrs {
        if attr.path().is_ident("trace") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("transient") {
                    flags.is_transient = true;
                    return Ok(());
                }

                if meta.path.is_ident("static_field") {
                    flags.is_static = true;
                    return Ok(());
                }

                Err(meta.error("Unknown trace attribute key. Supported: transient, static_field"))
            })?;
        }
    }
    Ok(flags)
}

/// If `ty` is syntactically `Option<Inner>` (or `std::option::Option<Inner>`),
/// returns `Inner`. This is the same surface-level detection serde performs;
/// a renamed `Option` alias is not recognized.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

// --- Generator: Described ---

fn generate_described(name: &syn::Ident) -> proc_macro2::TokenStream {
    quote! {
        impl sertrace::Described for #name {
            fn type_spec() -> sertrace::TypeSpec {
                sertrace::TypeSpec::new::<Self>({
                    #[allow(unused_imports)]
                    use sertrace::codec::ProbeFallback as _;
                    sertrace::codec::SerdeProbe::<Self>::new().supported()
                })
            }

            fn round_trip(value: &Self) -> ::core::result::Result<(), sertrace::codec::CodecFailure> {
                #[allow(unused_imports)]
                use sertrace::codec::ProxyFallback as _;
                sertrace::codec::CodecProxy(value).round_trip()
            }
        }
    }
}

// --- Generator: Traceable ---

fn generate_traceable(name: &syn::Ident, fields: &[TracedField]) -> proc_macro2::TokenStream {
    let descriptors = fields.iter().map(|f| {
        let fname = f.ident.to_string();
        // The declared type of an Option field is its inner type; `None` is
        // reported as a null value, not as a value of type `Option`.
        let declared_ty = option_inner(&f.ty).unwrap_or(&f.ty);
        let is_transient = f.flags.is_transient;
        let is_static = f.flags.is_static;
        quote! {
            sertrace::FieldDescriptor {
                name: #fname,
                declared: <#declared_ty as sertrace::Described>::type_spec(),
                is_transient: #is_transient,
                is_static: #is_static,
            }
        }
    });

    let value_arms = fields.iter().enumerate().map(|(index, f)| {
        let ident = &f.ident;
        if option_inner(&f.ty).is_some() {
            quote! {
                #index => Ok(match &self.#ident {
                    ::core::option::Option::Some(value) => sertrace::FieldRef::Value(value),
                    ::core::option::Option::None => sertrace::FieldRef::Null,
                }),
            }
        } else {
            quote! {
                #index => Ok(sertrace::FieldRef::Value(&self.#ident)),
            }
        }
    });

    quote! {
        impl sertrace::Traceable for #name {
            fn type_spec(&self) -> sertrace::TypeSpec {
                <Self as sertrace::Described>::type_spec()
            }

            fn fields(&self) -> ::std::vec::Vec<sertrace::FieldDescriptor> {
                ::std::vec![ #(#descriptors),* ]
            }

            fn field_value(&self, index: usize) -> sertrace::Result<sertrace::FieldRef<'_>> {
                match index {
                    #(#value_arms)*
                    _ => Err(sertrace::SertraceError::Introspection(::std::format!(
                        "{} has no field at index {}",
                        ::core::stringify!(#name),
                        index
                    ))),
                }
            }

            fn try_round_trip(&self) -> ::core::result::Result<(), sertrace::codec::CodecFailure> {
                <Self as sertrace::Described>::round_trip(self)
            }
        }
    }
}
