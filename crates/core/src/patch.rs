//! Block patching: replace the previously generated method of a source file
//! with a freshly synthesized one.
//!
//! The generated block always moves to just before the file's last line (the
//! closing namespace marker), so after one run the output is a fixed point of
//! the patch: running it again with the same replacement changes nothing.

use crate::error::{GenError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

// ---------------------------------------------------------------------------
// Block location
// ---------------------------------------------------------------------------

/// Inclusive line range of a generated block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedBlock {
    /// First line of the blank run before the signature, or the signature itself.
    pub start: usize,
    /// Line whose trimmed text is exactly `}`.
    pub end: usize,
}

/// Result of looking for a generated block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSearch {
    Absent,
    Found(GeneratedBlock),
    /// The signature was found at this index but no closing line follows it.
    Unterminated { signature: usize },
}

/// Find the first block whose signature line contains `marker`.
pub fn locate_block(lines: &[String], marker: &str) -> BlockSearch {
    let Some(signature) = lines.iter().position(|l| l.contains(marker)) else {
        return BlockSearch::Absent;
    };

    let mut start = signature;
    while start > 0 && lines[start - 1].trim().is_empty() {
        start -= 1;
    }

    match lines[signature..].iter().position(|l| l.trim() == "}") {
        Some(offset) => BlockSearch::Found(GeneratedBlock { start, end: signature + offset }),
        None => BlockSearch::Unterminated { signature },
    }
}

// ---------------------------------------------------------------------------
// Patching
// ---------------------------------------------------------------------------

/// New file content plus whether it differs from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub lines: Vec<String>,
    pub changed: bool,
}

/// Remove the existing generated block (if any) and splice `replacement`
/// in front of the last line.
///
/// Blank lines left directly before the last line collapse into a single
/// separator ahead of the replacement; `replacement` carries its own trailing
/// blank line. `path` is used only for the error of an unterminated block.
pub fn patch_lines(
    path: &Path,
    lines: &[String],
    marker: &str,
    replacement: &[String],
) -> Result<Patched> {
    let mut body: Vec<String> = match locate_block(lines, marker) {
        BlockSearch::Absent => lines.to_vec(),
        BlockSearch::Found(block) => {
            debug!(
                path = %path.display(),
                start = block.start,
                end = block.end,
                "Replacing generated block"
            );
            lines[..block.start].iter().chain(&lines[block.end + 1..]).cloned().collect()
        }
        BlockSearch::Unterminated { signature } => {
            return Err(GenError::UnterminatedBlock {
                path: path.to_path_buf(),
                line: signature + 1,
            });
        }
    };

    let last = body.pop();
    while body.last().is_some_and(|l| l.trim().is_empty()) {
        body.pop();
    }
    if !body.is_empty() {
        body.push(String::new());
    }
    body.extend(replacement.iter().cloned());
    body.extend(last);

    let changed = body.as_slice() != lines;
    Ok(Patched { lines: body, changed })
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// A text file split into lines, remembering how to write it back.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
    crlf: bool,
    trailing_newline: bool,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: content.lines().map(|l| l.to_string()).collect(),
            crlf: content.contains("\r\n"),
            trailing_newline: content.ends_with('\n'),
        })
    }

    /// Render `lines` with this file's line-ending conventions.
    pub fn render(&self, lines: &[String]) -> String {
        let eol = if self.crlf { "\r\n" } else { "\n" };
        let mut out = lines.join(eol);
        if self.trailing_newline && !lines.is_empty() {
            out.push_str(eol);
        }
        out
    }

    /// Overwrite the file with `lines`.
    pub fn write(&self, lines: &[String]) -> Result<()> {
        fs::write(&self.path, self.render(lines)).map_err(|e| GenError::io(&self.path, e))
    }
}

/// Patch `lines` (the content of `file`, possibly already edited in memory)
/// and write the result when it differs from what is on disk, unless `dry_run`
/// is set. Returns whether the file content changed.
pub fn apply_patch(
    file: &SourceFile,
    lines: &[String],
    marker: &str,
    replacement: &[String],
    dry_run: bool,
) -> Result<bool> {
    let patched = patch_lines(&file.path, lines, marker, replacement)?;
    let changed = patched.lines != file.lines;
    if changed && !dry_run {
        file.write(&patched.lines)?;
        debug!(path = %file.path.display(), "Wrote file");
    }
    Ok(changed)
}
