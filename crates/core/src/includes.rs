//! Include completion for the aggregator file.

use crate::error::{GenError, Result};
use crate::types::Entity;
use std::path::Path;

fn last_include(lines: &[String]) -> Option<usize> {
    lines.iter().rposition(|l| l.trim_start().starts_with("#include"))
}

/// Make sure `lines` include every entity's declaration file.
///
/// Missing include lines are inserted after the last existing `#include`, in
/// entity order. A file without any `#include` line is rejected. Returns the
/// new lines and how many were inserted.
pub fn complete_includes(
    path: &Path,
    lines: &[String],
    entities: &[Entity],
) -> Result<(Vec<String>, usize)> {
    let mut anchor =
        last_include(lines).ok_or_else(|| GenError::NoIncludeAnchor { path: path.to_path_buf() })?;
    let mut out = lines.to_vec();
    let mut inserted = 0;

    for entity in entities {
        let include = entity.include_line();
        if out.iter().any(|l| *l == include) {
            continue;
        }
        anchor += 1;
        out.insert(anchor, include);
        inserted += 1;
    }

    Ok((out, inserted))
}
