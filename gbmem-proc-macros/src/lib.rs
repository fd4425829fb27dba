use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::{format_ident, quote};
use syn::Data::Enum;
use syn::{DeriveInput, LitStr};

struct VariantLabel {
    ident: Ident,
    label: String,
    explicit: bool,
}

// Collects every variant together with its `#[display("...")]` label, falling back to the variant
// name when no label is given
fn variant_labels(ast: &DeriveInput, macro_name: &str) -> syn::Result<Vec<VariantLabel>> {
    let name = &ast.ident;

    let Enum(data) = &ast.data else {
        return Err(syn::Error::new_spanned(
            name,
            format!("{macro_name} derive macro can only be applied to enums; {name} is not an enum"),
        ));
    };

    data.variants
        .iter()
        .map(|variant| {
            let variant_name = &variant.ident;
            if !variant.fields.is_empty() {
                return Err(syn::Error::new_spanned(
                    variant,
                    format!("{macro_name} macro only supports enums with only fieldless variants; {name}::{variant_name} has fields"),
                ));
            }

            let mut label = None;
            for attr in &variant.attrs {
                if attr.path().is_ident("display") {
                    let lit: LitStr = attr.parse_args()?;
                    label = Some(lit.value());
                }
            }

            Ok(VariantLabel {
                ident: variant_name.clone(),
                explicit: label.is_some(),
                label: label.unwrap_or_else(|| variant_name.to_string()),
            })
        })
        .collect()
}

/// Implement the `std::fmt::Display` trait for the given enum. Only supports enums which have only
/// fieldless variants.
///
/// Each variant displays as its name, or as the string given in a `#[display("...")]` attribute on
/// the variant.
#[proc_macro_derive(EnumDisplay, attributes(display))]
pub fn enum_display(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    let variants = match variant_labels(&ast, "EnumDisplay") {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &ast.ident;
    let match_arms = variants.iter().map(|VariantLabel { ident, label, .. }| {
        quote! {
            Self::#ident => f.write_str(#label)
        }
    });

    let gen = quote! {
        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    #(#match_arms,)*
                }
            }
        }
    };

    gen.into()
}

/// Implement the `std::str::FromStr` trait for the given enum, with `FromStr::Err` set to `String`.
/// Only supports enums which have only fieldless variants. Matching is case-insensitive and accepts
/// both the variant name and its `#[display("...")]` label.
#[proc_macro_derive(EnumFromStr, attributes(display))]
pub fn enum_from_str(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    let variants = match variant_labels(&ast, "EnumFromStr") {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &ast.ident;
    let match_arms = variants.iter().map(|VariantLabel { ident, label, explicit }| {
        let name_lowercase = ident.to_string().to_ascii_lowercase();
        let label_lowercase = label.to_ascii_lowercase();
        if *explicit && label_lowercase != name_lowercase {
            quote! {
                #name_lowercase | #label_lowercase => Ok(Self::#ident)
            }
        } else {
            quote! {
                #name_lowercase => Ok(Self::#ident)
            }
        }
    });

    let err_fmt_string = format!("invalid {name} string: '{{}}'");
    let gen = quote! {
        impl std::str::FromStr for #name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    #(#match_arms,)*
                    _ => Err(format!(#err_fmt_string, s))
                }
            }
        }
    };

    gen.into()
}

/// Implement `serde::Serialize` by serializing values through their `std::fmt::Display` impl.
#[proc_macro_derive(StrSerialize)]
pub fn str_serialize(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &ast.ident;

    let gen = quote! {
        impl serde::Serialize for #ident {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }
    };

    gen.into()
}

/// Implement `serde::Deserialize` by parsing strings through the type's `std::str::FromStr` impl.
#[proc_macro_derive(StrDeserialize)]
pub fn str_deserialize(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &ast.ident;

    let visitor = format_ident!("__{}StrVisitor", ident);
    let expecting = format!("a string naming a {ident}");
    let gen = quote! {
        struct #visitor;

        impl<'de> serde::de::Visitor<'de> for #visitor {
            type Value = #ident;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str(#expecting)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        impl<'de> serde::Deserialize<'de> for #ident {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_str(#visitor)
            }
        }
    };

    gen.into()
}
