//! Field extraction: find container-typed member declarations inside an
//! entity's class scope.
//!
//! Matching is purely line-oriented over the output of
//! [`normalize_lines`](crate::normalize::normalize_lines); nothing here tries
//! to understand C++ beyond "does this line look like a container member".

use crate::error::{GenError, Result};
use regex::Regex;

/// A recognized container category and the query that yields its element count.
#[derive(Debug, Clone)]
pub struct FieldKind {
    name: String,
    pattern: Regex,
    count_query: String,
}

impl FieldKind {
    /// Build a kind from a container keyword (itself a regex fragment, e.g.
    /// `(?:std::)?vector`). The full pattern accepts an optional leading
    /// qualifier word, an optional `<...>` suffix, then captures the field name.
    pub fn new(name: &str, keyword: &str, count_query: &str) -> Result<Self> {
        let source = format!(r"^(?:\w+\s+)?(?:{keyword})(?:<.*>)?\s+(\w+)\s*(?:[;={{].*)?$");
        let pattern = Regex::new(&source)
            .map_err(|source| GenError::InvalidPattern { kind: name.to_string(), source })?;
        Ok(Self { name: name.to_string(), pattern, count_query: count_query.to_string() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-argument query appended to the field to read its size, e.g. `size()`.
    pub fn count_query(&self) -> &str {
        &self.count_query
    }

    /// Field name declared on `line`, if the line declares this kind of container.
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern.captures(line.trim()).and_then(|c| c.get(1)).map(|m| m.as_str())
    }
}

const BUILTIN_KINDS: &[(&str, &str, &str)] = &[
    ("WaitFreeHashMap", "WaitFreeHashMap", "calc_size()"),
    ("WaitFreeHashSet", "WaitFreeHashSet", "calc_size()"),
    ("FlatHashMap", "FlatHashMap", "size()"),
    ("FlatHashSet", "FlatHashSet", "size()"),
    ("UnorderedMap", "(?:std::)?unordered_map", "size()"),
    ("UnorderedSet", "(?:std::)?unordered_set", "size()"),
    ("Map", "(?:std::)?map", "size()"),
    ("Set", "(?:std::)?set", "size()"),
    ("Vector", "(?:std::)?vector", "size()"),
    ("Deque", "(?:std::)?deque", "size()"),
    ("Queue", "(?:std::)?queue", "size()"),
];

/// The compiled-in field-kind table, in match-priority order.
pub fn default_field_kinds() -> Vec<FieldKind> {
    BUILTIN_KINDS
        .iter()
        .map(|(name, keyword, count)| {
            FieldKind::new(name, keyword, count).expect("built-in field pattern must compile")
        })
        .collect()
}

/// One matched member declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundField {
    pub kind: String,
    pub name: String,
    pub count_query: String,
}

/// Collect the container fields declared inside `class_ident`.
///
/// A line starting with `class ` switches the "inside target" flag to whether
/// that line mentions `class_ident`. Any other class opening, forward
/// declarations included, switches it off, so members following a nested
/// class inside the target are not collected.
pub fn extract_fields(lines: &[String], class_ident: &str, kinds: &[FieldKind]) -> Vec<FoundField> {
    let mut inside = false;
    let mut found = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if trimmed.starts_with("class ") {
            inside = trimmed.contains(class_ident);
            continue;
        }
        if !inside {
            continue;
        }
        for kind in kinds {
            if let Some(name) = kind.capture(trimmed) {
                found.push(FoundField {
                    kind: kind.name().to_string(),
                    name: name.to_string(),
                    count_query: kind.count_query().to_string(),
                });
                break;
            }
        }
    }

    found
}
