use std::collections::HashSet;

use crate::error::{InspectError, Result};

/// Normalize and deduplicate user-supplied source strings, preserving the
/// order of first occurrence. Existence is checked at open time, not here.
pub fn resolve_sources(inputs: &[String]) -> Result<Vec<String>> {
    if inputs.is_empty() {
        return Err(InspectError::EmptyInput);
    }

    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for raw in inputs {
        let source = normalize_source(raw);
        if source.is_empty() {
            continue;
        }
        if seen.insert(source.clone()) {
            sources.push(source);
        }
    }

    if sources.is_empty() {
        return Err(InspectError::EmptyInput);
    }
    Ok(sources)
}

/// Lexical cleanup so that spellings of the same path collapse to one entry.
/// URL-like sources (DAP endpoints etc.) pass through untouched.
pub fn normalize_source(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains("://") {
        return raw.to_string();
    }

    let mut path = raw;
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    let mut out = path.to_string();
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}
