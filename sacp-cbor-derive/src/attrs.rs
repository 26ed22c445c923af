use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, LitInt, LitStr};

#[derive(Default, Clone)]
pub(crate) struct CborFieldAttr {
    pub(crate) rename: Option<LitStr>,
    pub(crate) keyasint: Option<LitInt>,
    pub(crate) alt_rename: Option<LitStr>,
    pub(crate) omitempty: bool,
    pub(crate) skip: bool,
    pub(crate) default: bool,
    pub(crate) embed: bool,
}

#[derive(Default, Clone, Copy)]
pub(crate) struct CborContainerAttr {
    pub(crate) toarray: bool,
    pub(crate) deny_unknown: bool,
}

pub(crate) fn ensure_no_cbor_attrs(attrs: &[Attribute], ctx: &str) -> syn::Result<()> {
    for a in attrs {
        if a.path().is_ident("cbor") {
            return Err(syn::Error::new(
                a.span(),
                format!("`#[cbor(...)]` is not supported on {ctx}"),
            ));
        }
    }
    Ok(())
}

pub(crate) fn parse_cbor_container_attrs(attrs: &[Attribute]) -> syn::Result<CborContainerAttr> {
    let mut out = CborContainerAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("cbor") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("toarray") {
                out.toarray = true;
                return Ok(());
            }
            if meta.path.is_ident("deny_unknown") {
                out.deny_unknown = true;
                return Ok(());
            }
            Err(meta.error("unsupported `cbor(...)` container attribute (allowed: toarray, deny_unknown)"))
        })?;
    }
    Ok(out)
}

pub(crate) fn parse_cbor_field_attrs(attrs: &[Attribute]) -> syn::Result<CborFieldAttr> {
    let mut out = CborFieldAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("cbor") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                out.skip = true;
                return Ok(());
            }
            if meta.path.is_ident("default") {
                out.default = true;
                return Ok(());
            }
            if meta.path.is_ident("omitempty") {
                out.omitempty = true;
                return Ok(());
            }
            if meta.path.is_ident("embed") {
                out.embed = true;
                return Ok(());
            }
            if meta.path.is_ident("rename") {
                if out.rename.is_some() {
                    return Err(meta.error("duplicate `cbor(rename=...)`"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit);
                return Ok(());
            }
            if meta.path.is_ident("alt_rename") {
                if out.alt_rename.is_some() {
                    return Err(meta.error("duplicate `cbor(alt_rename=...)`"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                out.alt_rename = Some(lit);
                return Ok(());
            }
            if meta.path.is_ident("keyasint") {
                if out.keyasint.is_some() {
                    return Err(meta.error("duplicate `cbor(keyasint=...)`"));
                }
                let lit: LitInt = meta.value()?.parse()?;
                out.keyasint = Some(lit);
                return Ok(());
            }
            Err(meta.error(
                "unsupported `cbor(...)` field attribute (allowed: rename, alt_rename, \
                 keyasint, omitempty, skip, default, embed)",
            ))
        })?;
    }

    if out.skip
        && (out.rename.is_some()
            || out.keyasint.is_some()
            || out.alt_rename.is_some()
            || out.omitempty
            || out.embed)
    {
        return Err(syn::Error::new(
            Span::call_site(),
            "`cbor(skip)` cannot be combined with `rename`, `keyasint`, `alt_rename`, `omitempty`, or `embed`",
        ));
    }
    if out.embed
        && (out.rename.is_some()
            || out.keyasint.is_some()
            || out.alt_rename.is_some()
            || out.omitempty
            || out.default)
    {
        return Err(syn::Error::new(
            Span::call_site(),
            "`cbor(embed)` cannot be combined with `rename`, `keyasint`, `alt_rename`, `omitempty`, or `default`",
        ));
    }
    if out.rename.is_some() && out.keyasint.is_some() {
        return Err(syn::Error::new(
            Span::call_site(),
            "a field cannot have both `cbor(rename=...)` and `cbor(keyasint=...)`",
        ));
    }

    Ok(out)
}
