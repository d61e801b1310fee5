//! Converts a configured JSONPath into a sequence of lookups cheap enough to
//! run on every extraction. Supports the two shapes providers actually use:
//! dotted/bracketed field access (`$.foo.bar[0]`) and quoted bracket access
//! (`$['field']`).

use relay_types::ExtractionError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Field(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledPath(Vec<Segment>);

pub(crate) fn compile(field: &str, path: &str) -> Result<CompiledPath, ExtractionError> {
    let invalid = |reason: &str| ExtractionError::InvalidPath {
        field: field.to_string(),
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let rest = path.trim();
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let chars: Vec<char> = rest.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '.' => i += 1,
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|p| p + i)
                    .ok_or_else(|| invalid("unterminated '['"))?;
                let inner: String = chars[i + 1..close].iter().collect();
                let inner = inner.trim();
                if let Some(quoted) = strip_quotes(inner) {
                    segments.push(Segment::Field(quoted.to_string()));
                } else if let Ok(index) = inner.parse::<usize>() {
                    segments.push(Segment::Index(index));
                } else {
                    return Err(invalid(&format!("invalid bracket segment `{inner}`")));
                }
                i = close + 1;
            }
            _ => {
                let start = i;
                while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                if ident.is_empty() {
                    return Err(invalid("empty path segment"));
                }
                segments.push(Segment::Field(ident));
            }
        }
    }

    if segments.is_empty() {
        return Err(invalid("path has no segments"));
    }

    Ok(CompiledPath(segments))
}

fn strip_quotes(inner: &str) -> Option<&str> {
    inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
}

/// Walk `value` following `path`'s segments, returning `None` on any missing
/// field, out-of-bounds index, or type mismatch along the way.
pub(crate) fn resolve<'a>(value: &'a Value, path: &CompiledPath) -> Option<&'a Value> {
    let mut current = value;
    for segment in &path.0 {
        current = match segment {
            Segment::Field(name) => current.get(name)?,
            Segment::Index(index) => current.get(index)?,
        };
    }
    Some(current)
}
