use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive macro that generates checkbox row information from enum variants.
///
/// For each variant, extracts:
/// - Label (from `#[checkbox(label = "...")]`, defaults to the variant name)
///
/// On the enum itself, `#[checkbox(unmarked = "...")]` appends a label that is
/// always rendered blank. It may be repeated.
///
/// Generates an `impl Checkboxes` with `options()`, `label()` and
/// `unmarked_labels()`. The `Checkboxes` trait must be in scope.
#[proc_macro_derive(Checkboxes, attributes(checkbox))]
pub fn derive_checkboxes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => panic!("Checkboxes only supports enums"),
    };

    let unmarked = match checkbox_values(&input.attrs, "unmarked") {
        Ok(values) => values,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut idents = Vec::new();
    let mut labels = Vec::new();
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            panic!("Checkboxes only supports unit variants");
        }

        let label = match checkbox_values(&variant.attrs, "label") {
            Ok(values) => values
                .into_iter()
                .last()
                .unwrap_or_else(|| variant.ident.to_string()),
            Err(err) => return err.to_compile_error().into(),
        };

        idents.push(&variant.ident);
        labels.push(label);
    }

    let expanded = quote! {
        impl Checkboxes for #name {
            fn options() -> &'static [Self] {
                static OPTIONS: &[#name] = &[
                    #(#name::#idents),*
                ];
                OPTIONS
            }

            fn label(&self) -> &'static str {
                match self {
                    #(#name::#idents => #labels),*
                }
            }

            fn unmarked_labels() -> &'static [&'static str] {
                &[#(#unmarked),*]
            }
        }
    };

    TokenStream::from(expanded)
}

/// Collect every `key = "..."` value from `#[checkbox(...)]` attributes.
fn checkbox_values(attrs: &[Attribute], key: &str) -> syn::Result<Vec<String>> {
    let mut values = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("checkbox") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                let lit: LitStr = meta.value()?.parse()?;
                values.push(lit.value());
                Ok(())
            } else {
                Err(meta.error(format!("expected `{}`", key)))
            }
        })?;
    }
    Ok(values)
}
