//! Core types shared across the generator: discovered entities, per-file
//! update results, and the end-of-run summary.

use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A manager with a declaration/implementation file pair sharing one base name.
///
/// Identity is `(dir, base_name)`; every path is derived from those two.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Entity {
    /// Directory containing both files.
    pub dir: PathBuf,
    /// File name minus the entity suffix: `Background` for `BackgroundManager.h`.
    pub base_name: String,
    /// Class name: base name plus the entity suffix.
    pub class_ident: String,
    pub declaration_path: PathBuf,
    pub implementation_path: PathBuf,
    /// Include path relative to the project root, `/`-separated.
    pub include_path: String,
}

impl Entity {
    /// Derive every path of an entity living in `dir` (absolute) under `root`.
    pub fn new(
        root: &Path,
        dir: &Path,
        base_name: &str,
        entity_suffix: &str,
        declaration_ext: &str,
        implementation_ext: &str,
    ) -> Self {
        let class_ident = format!("{base_name}{entity_suffix}");
        let declaration_file = format!("{class_ident}.{declaration_ext}");
        let implementation_file = format!("{class_ident}.{implementation_ext}");

        let rel_dir = dir.strip_prefix(root).unwrap_or(dir).to_string_lossy().replace('\\', "/");
        let include_path = if rel_dir.is_empty() {
            declaration_file.clone()
        } else {
            format!("{rel_dir}/{declaration_file}")
        };

        Self {
            dir: dir.to_path_buf(),
            base_name: base_name.to_string(),
            declaration_path: dir.join(&declaration_file),
            implementation_path: dir.join(&implementation_file),
            class_ident,
            include_path,
        }
    }

    /// The `#include` line the aggregator needs for this entity.
    pub fn include_line(&self) -> String {
        format!("#include \"{}\"", self.include_path)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of patching one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UpdateResult {
    /// The patched lines differ from the original lines.
    pub changed: bool,
    /// Number of generated entries (fields for an entity, calls for the aggregator).
    pub fields_found: usize,
}

/// An entity skipped because one of its files is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidEntity {
    pub name: String,
    pub path: PathBuf,
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub entities_found: usize,
    pub entities_updated: usize,
    pub total_fields: usize,
    pub invalid: Vec<InvalidEntity>,
    pub aggregator_changed: bool,
    pub aggregator_calls: usize,
    pub dry_run: bool,
}

impl RunSummary {
    /// True if any file was (or, in a dry run, would have been) rewritten.
    pub fn any_changed(&self) -> bool {
        self.entities_updated > 0 || self.aggregator_changed
    }
}
