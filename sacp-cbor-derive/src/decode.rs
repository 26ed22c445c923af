//! `CborDecode` codegen, the decode-side counterpart of `encode.rs`.
//!
//! A map-layout struct reads every entry generically as `(Value, Value)`
//! (the only shape `MapDecoder::next_entry` can give us without knowing each
//! field's concrete type up front), matches each key against a field's
//! primary/`alt_rename` key, and bridges the matched `Value` into the
//! field's real type through a `cbor_codec::encode`/`decode` round trip.
//! Entries matching no known field are collected for an `#[cbor(embed)]`
//! field, or rejected under `#[cbor(deny_unknown)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, Lifetime, LifetimeParam};

use crate::attrs::{parse_cbor_container_attrs, parse_cbor_field_attrs, CborFieldAttr};
use crate::types::{is_option_type, type_mentions_self};
use crate::util::add_where_bound;

fn decode_lifetime(generics: &Generics) -> (Generics, Lifetime) {
    let mut out = generics.clone();
    let mut name = "__cbor".to_string();
    let mut counter = 0usize;
    loop {
        let probe = Ident::new(&name, proc_macro2::Span::call_site());
        if !out.lifetimes().any(|lt| lt.lifetime.ident == probe) {
            break;
        }
        counter += 1;
        name = format!("__cbor{counter}");
    }
    let lt = Lifetime::new(&format!("'{name}"), proc_macro2::Span::call_site());
    out.params
        .insert(0, GenericParam::Lifetime(LifetimeParam::new(lt.clone())));

    let wc = out.make_where_clause();
    for lifetime in generics.lifetimes() {
        let lt_ident = &lifetime.lifetime;
        wc.predicates.push(syn::parse_quote!(#lt: #lt_ident));
    }
    (out, lt)
}

pub(crate) fn derive_cbor_decode(input: &DeriveInput) -> syn::Result<TokenStream> {
    let data = match &input.data {
        Data::Struct(s) => s,
        Data::Enum(e) => {
            return Err(syn::Error::new_spanned(
                e.enum_token,
                "CborDecode can only be derived for structs",
            ))
        }
        Data::Union(u) => {
            return Err(syn::Error::new_spanned(
                u.union_token,
                "CborDecode can only be derived for structs",
            ))
        }
    };

    let name = &input.ident;
    let name_str = name.to_string();
    let container = parse_cbor_container_attrs(&input.attrs)?;

    match &data.fields {
        Fields::Named(named) => {
            let fields = named
                .named
                .iter()
                .map(|f| {
                    let attr = parse_cbor_field_attrs(&f.attrs)?;
                    Ok((f.ident.clone().unwrap(), f.ty.clone(), attr))
                })
                .collect::<syn::Result<Vec<_>>>()?;
            if container.toarray {
                decode_array_named(input, name, &fields)
            } else {
                decode_map_named(input, name, &name_str, container.deny_unknown, &fields)
            }
        }
        Fields::Unnamed(unnamed) => decode_tuple(input, name, unnamed.unnamed.len()),
        Fields::Unit => decode_unit(input, name),
    }
}

fn key_match_expr(ident: &syn::Ident, attr: &CborFieldAttr) -> TokenStream {
    let primary = if let Some(n) = &attr.keyasint {
        quote! { __k.as_i64() == ::core::option::Option::Some(#n as i64) }
    } else {
        let key = attr
            .rename
            .as_ref()
            .map(syn::LitStr::value)
            .unwrap_or_else(|| ident.to_string());
        quote! { __k.as_text() == ::core::option::Option::Some(#key) }
    };
    match &attr.alt_rename {
        Some(alt) => quote! { (#primary || __k.as_text() == ::core::option::Option::Some(#alt)) },
        None => primary,
    }
}

fn decode_map_named(
    input: &DeriveInput,
    name: &syn::Ident,
    name_str: &str,
    deny_unknown: bool,
    fields: &[(syn::Ident, syn::Type, CborFieldAttr)],
) -> syn::Result<TokenStream> {
    let embed = {
        let mut it = fields.iter().filter(|(_, _, a)| a.embed);
        let first = it.next();
        if it.next().is_some() {
            return Err(syn::Error::new_spanned(
                &first.unwrap().0,
                "at most one field can carry `#[cbor(embed)]`",
            ));
        }
        first
    };

    let (generics, decode_lt) = decode_lifetime(&input.generics);
    let mut generics = generics;
    {
        let wc = generics.make_where_clause();
        for (_, ty, attr) in fields {
            if attr.skip || type_mentions_self(ty, &input.ident) {
                continue;
            }
            add_where_bound(wc, ty, quote!(for<'__cbor_v> ::cbor_codec::CborDecode<'__cbor_v>));
            if is_option_type(ty) || attr.default || attr.omitempty || attr.embed {
                add_where_bound(wc, ty, quote!(::core::default::Default));
            }
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut var_decls = Vec::new();
    let mut match_arms = Vec::new();
    let mut finals = Vec::new();

    for (ident, ty, attr) in fields {
        if attr.skip {
            finals.push(quote! { #ident: ::core::default::Default::default(), });
            continue;
        }
        if attr.embed {
            continue;
        }
        let var = format_ident!("__v_{ident}");
        var_decls.push(quote! { let mut #var: ::core::option::Option<::cbor_codec::Value> = ::core::option::Option::None; });
        let cond = key_match_expr(ident, attr);
        match_arms.push(quote! {
            if #cond {
                #var = ::core::option::Option::Some(__v);
                continue;
            }
        });

        let field_str = ident.to_string();
        let allow_missing = is_option_type(ty) || attr.default || attr.omitempty;
        let missing_branch = if allow_missing {
            quote! { ::core::default::Default::default() }
        } else {
            quote! {
                return ::core::result::Result::Err(::cbor_codec::CborError::with_context(
                    ::cbor_codec::ErrorCode::MissingField,
                    0,
                    ::cbor_codec::ErrorContext::of_field(#name_str, #field_str),
                ));
            }
        };
        finals.push(quote! {
            #ident: match #var {
                ::core::option::Option::Some(__v) => {
                    let __bytes = ::cbor_codec::encode(&__v, &::cbor_codec::EncodeMode::default())
                        .map_err(|e| e.or_context(::cbor_codec::ErrorContext::of_field(#name_str, #field_str)))?;
                    ::cbor_codec::decode(&__bytes, mode)
                        .map_err(|e| e.or_context(::cbor_codec::ErrorContext::of_field(#name_str, #field_str)))?
                }
                ::core::option::Option::None => #missing_branch,
            },
        });
    }

    if let Some((ident, _, _)) = embed {
        finals.push(quote! {
            #ident: {
                let __bytes = ::cbor_codec::encode(&::cbor_codec::Value::Map(__rest), &::cbor_codec::EncodeMode::default())
                    .map_err(|e| e.or_context(::cbor_codec::ErrorContext::of_type(#name_str)))?;
                ::cbor_codec::decode(&__bytes, mode)
                    .map_err(|e| e.or_context(::cbor_codec::ErrorContext::of_type(#name_str)))?
            },
        });
    }

    let reject_unknown = if deny_unknown && embed.is_none() {
        quote! {
            return ::core::result::Result::Err(::cbor_codec::CborError::with_context(
                ::cbor_codec::ErrorCode::UnknownFieldRejected,
                0,
                ::cbor_codec::ErrorContext::of_type(#name_str),
            ));
        }
    } else {
        quote! { __rest.push((__k, __v)); }
    };

    Ok(quote! {
        impl #impl_generics ::cbor_codec::CborDecode<#decode_lt> for #name #ty_generics #where_clause {
            fn decode(dec: &mut ::cbor_codec::Decoder<#decode_lt>) -> ::core::result::Result<Self, ::cbor_codec::CborError> {
                let mode = dec.mode();
                #(#var_decls)*
                let mut __rest: ::alloc::vec::Vec<(::cbor_codec::Value, ::cbor_codec::Value)> = ::alloc::vec::Vec::new();
                dec.read_map(|m| {
                    while let ::core::option::Option::Some((__k, __v)) = m.next_entry::<::cbor_codec::Value, ::cbor_codec::Value>()? {
                        #(#match_arms)*
                        #reject_unknown
                    }
                    Ok(())
                })?;
                ::core::result::Result::Ok(Self { #(#finals)* })
            }
        }
    })
}

fn decode_array_named(
    input: &DeriveInput,
    name: &syn::Ident,
    fields: &[(syn::Ident, syn::Type, CborFieldAttr)],
) -> syn::Result<TokenStream> {
    let (generics, decode_lt) = decode_lifetime(&input.generics);
    let mut generics = generics;
    {
        let wc = generics.make_where_clause();
        for (_, ty, _) in fields {
            if type_mentions_self(ty, &input.ident) {
                continue;
            }
            add_where_bound(wc, ty, quote!(::cbor_codec::CborDecode<#decode_lt>));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let reads = fields.iter().map(|(ident, ty, _)| {
        quote! { let #ident: #ty = a.value()?; }
    });
    let field_idents = fields.iter().map(|(ident, _, _)| ident);

    Ok(quote! {
        impl #impl_generics ::cbor_codec::CborDecode<#decode_lt> for #name #ty_generics #where_clause {
            fn decode(dec: &mut ::cbor_codec::Decoder<#decode_lt>) -> ::core::result::Result<Self, ::cbor_codec::CborError> {
                dec.read_array(|a| {
                    #(#reads)*
                    Ok(Self { #(#field_idents),* })
                })
            }
        }
    })
}

fn decode_tuple(input: &DeriveInput, name: &syn::Ident, arity: usize) -> syn::Result<TokenStream> {
    let (generics, decode_lt) = decode_lifetime(&input.generics);
    let mut generics = generics;
    let vars: Vec<_> = (0..arity).map(|i| format_ident!("v{i}")).collect();
    {
        let wc = generics.make_where_clause();
        let Data::Struct(data) = &input.data else {
            unreachable!()
        };
        let Fields::Unnamed(unnamed) = &data.fields else {
            unreachable!()
        };
        for f in &unnamed.unnamed {
            if type_mentions_self(&f.ty, &input.ident) {
                continue;
            }
            add_where_bound(wc, &f.ty, quote!(::cbor_codec::CborDecode<#decode_lt>));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::cbor_codec::CborDecode<#decode_lt> for #name #ty_generics #where_clause {
            fn decode(dec: &mut ::cbor_codec::Decoder<#decode_lt>) -> ::core::result::Result<Self, ::cbor_codec::CborError> {
                dec.read_array(|a| {
                    #( let #vars = a.value()?; )*
                    Ok(Self( #(#vars),* ))
                })
            }
        }
    })
}

fn decode_unit(input: &DeriveInput, name: &syn::Ident) -> syn::Result<TokenStream> {
    let (generics, decode_lt) = decode_lifetime(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::cbor_codec::CborDecode<#decode_lt> for #name #ty_generics #where_clause {
            fn decode(dec: &mut ::cbor_codec::Decoder<#decode_lt>) -> ::core::result::Result<Self, ::cbor_codec::CborError> {
                dec.read_null()?;
                Ok(Self)
            }
        }
    })
}
