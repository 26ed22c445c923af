//! Procedural macro derives for `cbor-codec`.
//!
//! `#[derive(CborEncode, CborDecode)]` is struct-only: it generates a
//! `CborStruct::DESCRIPTOR` plus `CborEncode`/`CborDecode` impls (and, for
//! map-layout structs, `CborEmbed`) from a struct's fields and their
//! `#[cbor(...)]` attributes.

#![deny(clippy::all)]
#![deny(missing_docs)]

extern crate proc_macro;

mod attrs;
mod decode;
mod encode;
mod types;
mod util;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

use crate::decode::derive_cbor_decode;
use crate::encode::derive_cbor_encode;

#[proc_macro_derive(CborEncode, attributes(cbor))]
/// Derive canonical CBOR encoding for a struct.
pub fn cbor_encode_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_cbor_encode(&input) {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

#[proc_macro_derive(CborDecode, attributes(cbor))]
/// Derive canonical CBOR decoding for a struct.
pub fn cbor_decode_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_cbor_decode(&input) {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}
