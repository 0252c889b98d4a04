//! Generator configuration: compiled-in naming conventions, the exclusion set,
//! and the field-kind table, optionally overridden by a `.memstats.toml` file.

use crate::error::{GenError, Result};
use crate::fields::{default_field_kinds, FieldKind};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the optional per-project override file, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".memstats.toml";

/// Immutable settings for one run. Built once and handed to the discoverer,
/// the field extractor, and the driver.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directories to walk (relative to the project root).
    pub scan_dirs: Vec<String>,
    /// Maximum walk depth below each scan dir.
    pub max_depth: usize,
    /// Class-name suffix shared by every entity (`BackgroundManager` -> `Manager`).
    pub entity_suffix: String,
    pub declaration_ext: String,
    pub implementation_ext: String,
    /// Base names never materialized as entities.
    pub exclude: BTreeSet<String>,
    /// Base name of the aggregator entity.
    pub aggregator_name: String,
    /// Directory of the aggregator file pair (relative to the project root).
    pub aggregator_dir: String,
    pub entity_method: String,
    pub aggregator_method: String,
    /// Appended to the snake-cased base name to form the owner's member name.
    pub member_suffix: String,
    /// Expression owning every entity member in the aggregator (`td_->`).
    pub owner_expr: String,
    pub output_param: String,
    /// Ordered by match priority.
    pub field_kinds: Vec<FieldKind>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self {
            scan_dirs: vec!["td".to_string()],
            max_depth: 4,
            entity_suffix: "Manager".to_string(),
            declaration_ext: "h".to_string(),
            implementation_ext: "cpp".to_string(),
            exclude: ["Memory", "Config", "State", "Storage", "Password", "Language", "Call", "Secure"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            aggregator_name: "Memory".to_string(),
            aggregator_dir: "td/telegram".to_string(),
            entity_method: "memory_stats".to_string(),
            aggregator_method: "print_managers_memory_stats".to_string(),
            member_suffix: "_manager_".to_string(),
            owner_expr: "td_->".to_string(),
            output_param: "output".to_string(),
            field_kinds: default_field_kinds(),
        }
    }

    /// Suffix identifying a declaration file, e.g. `Manager.h`.
    pub fn declaration_suffix(&self) -> String {
        format!("{}.{}", self.entity_suffix, self.declaration_ext)
    }

    /// Replace the exclusion set.
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the field-kind table.
    pub fn with_field_kinds(mut self, kinds: Vec<FieldKind>) -> Self {
        self.field_kinds = kinds;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// .memstats.toml loading
// ---------------------------------------------------------------------------

const KNOWN_CONFIG_KEYS: &[&str] =
    &["scan_dirs", "max_depth", "exclude", "aggregator_dir", "field_kinds"];

/// Levenshtein distance over bytes, keeping a single row.
fn edit_distance(a: &str, b: &str) -> usize {
    let b = b.as_bytes();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.as_bytes().iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}

/// Closest known key to `key`, if it is within typo distance.
fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_CONFIG_KEYS
        .iter()
        .map(|known| (edit_distance(key, known), *known))
        .min()
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, known)| known)
}

fn warn_unknown_keys(table: &toml::Table) {
    for key in table.keys().filter(|k| !KNOWN_CONFIG_KEYS.contains(&k.as_str())) {
        match suggest_key(key) {
            Some(suggestion) => warn!(
                key = key.as_str(),
                suggestion,
                "Unknown key in {CONFIG_FILE_NAME}, did you mean '{suggestion}'?"
            ),
            None => warn!(
                key = key.as_str(),
                "Unknown key in {CONFIG_FILE_NAME} (known keys: {})",
                KNOWN_CONFIG_KEYS.join(", ")
            ),
        }
    }
}

fn config_error(path: &Path, message: String) -> GenError {
    GenError::Config { path: path.to_path_buf(), message }
}

/// A key that must hold an array of strings. Any other shape is rejected
/// rather than read as an empty list.
fn string_list(value: &toml::Value, key: &str, path: &Path) -> Result<Vec<String>> {
    let invalid = || config_error(path, format!("{key} must be an array of strings"));
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

fn string_value(value: &toml::Value, key: &str, path: &Path) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| config_error(path, format!("{key} must be a string")))
}

/// Apply the overrides of a parsed config table on top of `config`.
pub fn apply_overrides(config: &mut GeneratorConfig, table: &toml::Table, path: &Path) -> Result<()> {
    warn_unknown_keys(table);

    if let Some(dirs) = table.get("scan_dirs") {
        config.scan_dirs = string_list(dirs, "scan_dirs", path)?;
    }

    if let Some(depth) = table.get("max_depth") {
        let depth = depth.as_integer().filter(|d| *d > 0).ok_or_else(|| {
            config_error(path, "max_depth must be a positive integer".to_string())
        })?;
        config.max_depth = depth as usize;
    }

    // exclude: merged with the compiled-in set
    if let Some(names) = table.get("exclude") {
        config.exclude.extend(string_list(names, "exclude", path)?);
    }

    if let Some(dir) = table.get("aggregator_dir") {
        config.aggregator_dir = string_value(dir, "aggregator_dir", path)?;
    }

    // field_kinds: appended after the built-in table, so built-ins keep priority
    if let Some(kinds) = table.get("field_kinds") {
        let kinds = kinds.as_array().ok_or_else(|| {
            config_error(path, "field_kinds must be an array of tables".to_string())
        })?;
        for entry in kinds {
            let field = |key: &str| {
                entry.get(key).and_then(|v| v.as_str()).ok_or_else(|| {
                    config_error(path, format!("field_kinds entry is missing '{key}'"))
                })
            };
            let kind = FieldKind::new(field("name")?, field("keyword")?, field("count")?)?;
            config.field_kinds.push(kind);
        }
    }

    Ok(())
}

/// Build the run configuration for `project_root`.
///
/// An explicit config path must exist and parse. Without one, `.memstats.toml`
/// in the project root is used when present; a default file that does not
/// parse is reported and ignored. A value of the wrong type is always an error.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<GeneratorConfig> {
    let mut config = GeneratorConfig::new();

    let (path, required): (PathBuf, bool) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (project_root.join(CONFIG_FILE_NAME), false),
    };

    if !required && !path.exists() {
        return Ok(config);
    }

    debug!(path = %path.display(), "Loading config");
    let content = std::fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?;
    let table = match content.parse::<toml::Table>() {
        Ok(t) => t,
        Err(e) if required => return Err(config_error(&path, e.to_string())),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
            return Ok(config);
        }
    };

    apply_overrides(&mut config, &table, &path)?;
    Ok(config)
}
