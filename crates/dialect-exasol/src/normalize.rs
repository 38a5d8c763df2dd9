//! Case reconciliation between the calling abstraction (lower-case means
//! case-insensitive) and Exasol (upper-case means case-insensitive).

use exadialect_core::{Ident, QualifiedName};

use crate::reserved_words::RESERVED_WORDS;

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS
        .binary_search(&name.to_lowercase().as_str())
        .is_ok()
}

/// Whether `name` can only be emitted as a quoted identifier.
pub fn requires_quotes(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return true;
    };

    is_reserved_word(name)
        || first.is_ascii_digit()
        || first == '$'
        || !name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
        || name.to_lowercase() != name
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Database spelling to abstraction spelling.
///
/// Upper-case names that are safe unquoted fold to lower case. Names that
/// are already lower case must have been quoted on the database side, so
/// they come back flagged as quoted. Anything else passes through.
pub fn normalize_name(name: Option<&str>) -> Option<Ident> {
    let name = name?;

    let lowered = name.to_lowercase();
    if name.to_uppercase() == name && !requires_quotes(&lowered) {
        return Some(Ident::unquoted(lowered));
    }
    if lowered == name {
        return Some(Ident::quoted(name));
    }
    Some(Ident::unquoted(name))
}

/// Abstraction spelling to database spelling. Not the exact inverse of
/// [`normalize_name`] for mixed-case names; both sides leave those alone.
pub fn denormalize_name(name: Option<&str>) -> Option<String> {
    let name = name.filter(|name| !name.is_empty())?;

    if name.to_lowercase() == name && !requires_quotes(name) {
        return Some(name.to_uppercase());
    }
    Some(name.to_string())
}

/// [`denormalize_name`] for an identifier, keeping quoted names verbatim.
pub fn denormalize_ident(ident: &Ident) -> String {
    if ident.quoted {
        return ident.value.clone();
    }
    denormalize_name(Some(ident.as_str())).unwrap_or_default()
}

/// SQL text for an identifier: bare when Exasol would fold it to the same
/// name anyway, quoted otherwise.
pub fn render_ident(ident: &Ident) -> String {
    if ident.quoted || requires_quotes(&ident.value) {
        quote_identifier(&ident.value)
    } else {
        ident.value.clone()
    }
}

pub fn render_qualified_name(name: &QualifiedName) -> String {
    match &name.schema {
        Some(schema) => format!("{}.{}", render_ident(schema), render_ident(&name.name)),
        None => render_ident(&name.name),
    }
}
