//! Helpers for interpreting canonical instance paths.
//!
//! Paths look like `/mod:top/child/list[k1='a'][k2="b"]/leaf`. Key values
//! may contain `/`, `[` or `]`, so splitting has to skip quoted text.

use crate::error::{StoreError, StoreResult};

/// What a delete expression addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteTarget<'a> {
    /// `/module:*` -- every top-level node of a module.
    Module(&'a str),
    /// A single instance path together with its descendants.
    Subtree(&'a str),
}

/// Interpret a delete expression.
pub fn parse_delete_target(expr: &str) -> StoreResult<DeleteTarget<'_>> {
    if !expr.starts_with('/') {
        return Err(StoreError::InvalidPath {
            path: expr.to_string(),
            reason: "path must be absolute".into(),
        });
    }
    if let Some(module) = expr.strip_prefix('/').and_then(|s| s.strip_suffix(":*")) {
        if module.is_empty() || module.contains(['/', ':', '[']) {
            return Err(StoreError::InvalidPath {
                path: expr.to_string(),
                reason: "malformed module wildcard".into(),
            });
        }
        return Ok(DeleteTarget::Module(module));
    }
    Ok(DeleteTarget::Subtree(expr))
}

/// Storage key of one leaf-list entry: the leaf-list path qualified with a
/// `[.='value']` self predicate, so every entry has its own key.
pub fn leaf_list_entry(path: &str, value: &str) -> StoreResult<String> {
    match (value.contains('\''), value.contains('"')) {
        (false, _) => Ok(format!("{path}[.='{value}']")),
        (true, false) => Ok(format!("{path}[.=\"{value}\"]")),
        (true, true) => Err(StoreError::InvalidPath {
            path: path.to_string(),
            reason: "leaf-list value contains both quote characters".into(),
        }),
    }
}

/// Byte offsets where each `/`-separated segment starts, ignoring separators
/// inside quoted key values.
fn segment_starts(path: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut quote: Option<char> = None;
    for (i, c) in path.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '/') => starts.push(i),
            (None, _) => {}
        }
    }
    starts
}

/// The module that qualifies the first segment of `path`, if any.
pub fn top_module(path: &str) -> Option<&str> {
    let starts = segment_starts(path);
    let first = *starts.first()?;
    let end = starts.get(1).copied().unwrap_or(path.len());
    let segment = &path[first + 1..end];
    let name = segment.split('[').next().unwrap_or(segment);
    let (module, _) = name.split_once(':')?;
    Some(module)
}

/// Number of segments in `path`.
pub fn depth(path: &str) -> usize {
    segment_starts(path).len()
}

/// Returns `true` if `path` is `prefix` itself or lies beneath it.
///
/// A list path without predicates covers all of its instances, so
/// `/m:a/item` contains `/m:a/item[k='1']`.
pub fn is_within(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('['),
        None => false,
    }
}
