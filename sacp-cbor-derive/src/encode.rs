//! `CborEncode`/`CborEmbed`/`CborStruct` codegen.
//!
//! Grounded on the teacher's `encode_struct`: a struct lowers to a single
//! `Vec<(Value, Value)>` of entries (built by a private `__cbor_entries`
//! method), which `CborEncode::encode` sorts against the live
//! `Encoder`'s `EncodeMode::key_order` and hands to `Encoder::value_dyn`.
//! Going through `Value` instead of writing fields straight into a
//! `MapEncoder` (the teacher's approach) is what lets a struct's fields have
//! different wire types without the derive needing per-field closures of
//! different concrete types in one `Vec`; the cost is a redundant
//! encode/decode round trip per field.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Index};

use crate::attrs::{parse_cbor_container_attrs, parse_cbor_field_attrs, CborContainerAttr, CborFieldAttr};
use crate::types::type_mentions_self;
use crate::util::add_where_bound;

pub(crate) fn derive_cbor_encode(input: &DeriveInput) -> syn::Result<TokenStream> {
    let data = match &input.data {
        Data::Struct(s) => s,
        Data::Enum(e) => {
            return Err(syn::Error::new_spanned(
                e.enum_token,
                "CborEncode can only be derived for structs",
            ))
        }
        Data::Union(u) => {
            return Err(syn::Error::new_spanned(
                u.union_token,
                "CborEncode can only be derived for structs",
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
                encode_array_named(input, name, &name_str, &fields)
            } else {
                encode_map_named(input, name, &name_str, container, &fields)
            }
        }
        Fields::Unnamed(unnamed) => {
            for f in &unnamed.unnamed {
                crate::attrs::ensure_no_cbor_attrs(&f.attrs, "tuple struct fields")?;
            }
            encode_tuple(input, name, unnamed.unnamed.len())
        }
        Fields::Unit => encode_unit(input, name),
    }
}

fn embed_field<'a>(
    fields: &'a [(syn::Ident, syn::Type, CborFieldAttr)],
) -> syn::Result<Option<&'a (syn::Ident, syn::Type, CborFieldAttr)>> {
    let mut embeds = fields.iter().filter(|(_, _, a)| a.embed);
    let first = embeds.next();
    if embeds.next().is_some() {
        return Err(syn::Error::new_spanned(
            &first.unwrap().0,
            "at most one field can carry `#[cbor(embed)]`",
        ));
    }
    Ok(first)
}

fn field_key_str(ident: &syn::Ident, attr: &CborFieldAttr) -> String {
    attr.rename
        .as_ref()
        .map(syn::LitStr::value)
        .unwrap_or_else(|| ident.to_string())
}

/// The compile-time `FieldKey`/`FieldDescriptor` expression for one field.
fn field_descriptor_tokens(ident: &syn::Ident, attr: &CborFieldAttr, embedded: bool) -> TokenStream {
    let rust_name = ident.to_string();
    let key = if let Some(n) = &attr.keyasint {
        quote! { ::cbor_codec::FieldKey::Int(#n) }
    } else {
        let k = field_key_str(ident, attr);
        quote! { ::cbor_codec::FieldKey::Text(#k) }
    };
    let alt_key = match &attr.alt_rename {
        Some(lit) => quote! { Some(::cbor_codec::FieldKey::Text(#lit)) },
        None => quote! { None },
    };
    let omit_if_default = attr.omitempty;
    quote! {
        ::cbor_codec::FieldDescriptor {
            rust_name: #rust_name,
            key: #key,
            alt_key: #alt_key,
            omit_if_default: #omit_if_default,
            embedded: #embedded,
        }
    }
}

/// Expression constructing the runtime [`Value`] key for a field (mirrors
/// `field_descriptor_tokens`'s compile-time `FieldKey`, but as a value).
fn field_key_value_tokens(ident: &syn::Ident, attr: &CborFieldAttr) -> TokenStream {
    if let Some(n) = &attr.keyasint {
        quote! {
            if (#n as i64) >= 0 {
                ::cbor_codec::Value::Uint((#n as i64) as u64)
            } else {
                ::cbor_codec::Value::Int(#n as i64)
            }
        }
    } else {
        let k = field_key_str(ident, attr);
        quote! { ::cbor_codec::Value::Text(::alloc::string::String::from(#k)) }
    }
}

fn bridge_to_value(ident: &syn::Ident, name_str: &str) -> TokenStream {
    let field_str = ident.to_string();
    quote! {
        {
            let __bytes = ::cbor_codec::encode(&self.#ident, mode)
                .map_err(|e| e.or_context(::cbor_codec::ErrorContext::of_field(#name_str, #field_str)))?;
            let __v: ::cbor_codec::Value = ::cbor_codec::decode(&__bytes, &::cbor_codec::DecodeMode::default())
                .map_err(|e| e.or_context(::cbor_codec::ErrorContext::of_field(#name_str, #field_str)))?;
            __v
        }
    }
}

fn encode_bound_where_clause(
    input: &DeriveInput,
    fields: &[(syn::Ident, syn::Type, CborFieldAttr)],
) -> syn::WhereClause {
    let mut generics = input.generics.clone();
    let wc = generics.make_where_clause();
    for (_, ty, attr) in fields {
        if attr.skip || type_mentions_self(ty, &input.ident) {
            continue;
        }
        add_where_bound(wc, ty, quote!(::cbor_codec::CborEncode));
        if attr.omitempty {
            add_where_bound(wc, ty, quote!(::core::cmp::PartialEq + ::core::default::Default));
        }
        if attr.embed {
            add_where_bound(wc, ty, quote!(::cbor_codec::CborEmbed));
        }
    }
    wc.clone()
}

fn encode_map_named(
    input: &DeriveInput,
    name: &syn::Ident,
    name_str: &str,
    container: CborContainerAttr,
    fields: &[(syn::Ident, syn::Type, CborFieldAttr)],
) -> syn::Result<TokenStream> {
    embed_field(fields)?;

    let mut generics = input.generics.clone();
    *generics.make_where_clause() = encode_bound_where_clause(input, fields);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut push_stmts = Vec::new();
    let mut descriptor_entries = Vec::new();
    let mut embed_extend = quote! {};

    for (ident, _ty, attr) in fields {
        if attr.skip {
            continue;
        }
        if attr.embed {
            descriptor_entries.push(field_descriptor_tokens(ident, attr, true));
            embed_extend = quote! {
                entries.extend(
                    ::cbor_codec::CborEmbed::embed_entries(&self.#ident, mode)
                        .map_err(|e| e.or_context(::cbor_codec::ErrorContext::of_type(#name_str)))?,
                );
            };
            continue;
        }
        descriptor_entries.push(field_descriptor_tokens(ident, attr, false));
        let key_value = field_key_value_tokens(ident, attr);
        let to_value = bridge_to_value(ident, name_str);
        let push = quote! { entries.push((#key_value, #to_value)); };
        push_stmts.push(if attr.omitempty {
            quote! {
                if self.#ident != ::core::default::Default::default() {
                    #push
                }
            }
        } else {
            push
        });
    }

    let deny_unknown = container.deny_unknown;

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            fn __cbor_entries(
                &self,
                mode: &::cbor_codec::EncodeMode,
            ) -> ::core::result::Result<::alloc::vec::Vec<(::cbor_codec::Value, ::cbor_codec::Value)>, ::cbor_codec::CborError> {
                let mut entries: ::alloc::vec::Vec<(::cbor_codec::Value, ::cbor_codec::Value)> = ::alloc::vec::Vec::new();
                #(#push_stmts)*
                #embed_extend
                Ok(entries)
            }
        }

        impl #impl_generics ::cbor_codec::CborEncode for #name #ty_generics #where_clause {
            fn encode(&self, enc: &mut ::cbor_codec::Encoder) -> ::core::result::Result<(), ::cbor_codec::CborError> {
                let mut entries = self.__cbor_entries(enc.mode())?;
                let order = enc.mode().key_order();
                entries.sort_by(|(ka, _), (kb, _)| {
                    let ab = ::cbor_codec::encode(ka, &::cbor_codec::EncodeMode::default()).unwrap_or_default();
                    let bb = ::cbor_codec::encode(kb, &::cbor_codec::EncodeMode::default()).unwrap_or_default();
                    order.cmp(&ab, &bb)
                });
                enc.value_dyn(&::cbor_codec::Value::Map(entries))
            }
        }

        impl #impl_generics ::cbor_codec::CborEmbed for #name #ty_generics #where_clause {
            fn embed_entries(
                &self,
                mode: &::cbor_codec::EncodeMode,
            ) -> ::core::result::Result<::alloc::vec::Vec<(::cbor_codec::Value, ::cbor_codec::Value)>, ::cbor_codec::CborError> {
                self.__cbor_entries(mode)
            }
        }

        impl #impl_generics ::cbor_codec::CborArrayElem for #name #ty_generics #where_clause {}

        impl #impl_generics ::cbor_codec::CborStruct for #name #ty_generics #where_clause {
            const DESCRIPTOR: ::cbor_codec::RecordDescriptor = ::cbor_codec::RecordDescriptor {
                type_name: #name_str,
                layout: ::cbor_codec::Layout::Map,
                fields: &[ #(#descriptor_entries),* ],
                deny_unknown_fields: #deny_unknown,
            };
        }
    })
}

fn encode_array_named(
    input: &DeriveInput,
    name: &syn::Ident,
    name_str: &str,
    fields: &[(syn::Ident, syn::Type, CborFieldAttr)],
) -> syn::Result<TokenStream> {
    for (ident, _ty, attr) in fields {
        if attr.skip || attr.omitempty || attr.keyasint.is_some() || attr.embed || attr.alt_rename.is_some() {
            return Err(syn::Error::new_spanned(
                ident,
                "`#[cbor(toarray)]` structs cannot use `skip`, `omitempty`, `keyasint`, `embed`, or `alt_rename` on their fields",
            ));
        }
    }

    let mut generics = input.generics.clone();
    {
        let wc = generics.make_where_clause();
        for (_, ty, _) in fields {
            if type_mentions_self(ty, &input.ident) {
                continue;
            }
            add_where_bound(wc, ty, quote!(::cbor_codec::CborEncode));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let len = fields.len();
    let value_calls = fields.iter().map(|(ident, _, _)| quote! { a.value(&self.#ident)?; });
    let descriptor_entries = fields
        .iter()
        .map(|(ident, _, attr)| field_descriptor_tokens(ident, attr, false));

    Ok(quote! {
        impl #impl_generics ::cbor_codec::CborEncode for #name #ty_generics #where_clause {
            fn encode(&self, enc: &mut ::cbor_codec::Encoder) -> ::core::result::Result<(), ::cbor_codec::CborError> {
                enc.array(#len, |a| {
                    #(#value_calls)*
                    Ok(())
                })
            }
        }

        impl #impl_generics ::cbor_codec::CborArrayElem for #name #ty_generics #where_clause {}

        impl #impl_generics ::cbor_codec::CborStruct for #name #ty_generics #where_clause {
            const DESCRIPTOR: ::cbor_codec::RecordDescriptor = ::cbor_codec::RecordDescriptor {
                type_name: #name_str,
                layout: ::cbor_codec::Layout::Array,
                fields: &[ #(#descriptor_entries),* ],
                deny_unknown_fields: false,
            };
        }
    })
}

fn encode_tuple(input: &DeriveInput, name: &syn::Ident, arity: usize) -> syn::Result<TokenStream> {
    let name_str = name.to_string();
    let indices: Vec<Index> = (0..arity).map(Index::from).collect();

    let mut generics = input.generics.clone();
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
            add_where_bound(wc, &f.ty, quote!(::cbor_codec::CborEncode));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::cbor_codec::CborEncode for #name #ty_generics #where_clause {
            fn encode(&self, enc: &mut ::cbor_codec::Encoder) -> ::core::result::Result<(), ::cbor_codec::CborError> {
                enc.array(#arity, |a| {
                    #( a.value(&self.#indices)?; )*
                    Ok(())
                })
            }
        }

        impl #impl_generics ::cbor_codec::CborArrayElem for #name #ty_generics #where_clause {}

        impl #impl_generics ::cbor_codec::CborStruct for #name #ty_generics #where_clause {
            const DESCRIPTOR: ::cbor_codec::RecordDescriptor = ::cbor_codec::RecordDescriptor {
                type_name: #name_str,
                layout: ::cbor_codec::Layout::Array,
                fields: &[],
                deny_unknown_fields: false,
            };
        }
    })
}

fn encode_unit(input: &DeriveInput, name: &syn::Ident) -> syn::Result<TokenStream> {
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::cbor_codec::CborEncode for #name #ty_generics #where_clause {
            fn encode(&self, enc: &mut ::cbor_codec::Encoder) -> ::core::result::Result<(), ::cbor_codec::CborError> {
                enc.null()
            }
        }

        impl #impl_generics ::cbor_codec::CborArrayElem for #name #ty_generics #where_clause {}

        impl #impl_generics ::cbor_codec::CborStruct for #name #ty_generics #where_clause {
            const DESCRIPTOR: ::cbor_codec::RecordDescriptor = ::cbor_codec::RecordDescriptor {
                type_name: #name_str,
                layout: ::cbor_codec::Layout::Array,
                fields: &[],
                deny_unknown_fields: false,
            };
        }
    })
}
