//! Entity discovery: walk the scan directories and turn every `*Manager.h`
//! into an [`Entity`].

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::types::Entity;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Walk one directory (sorted, bounded depth) and return every regular file
/// whose name ends with `suffix`, in walk order.
fn walk_matching_files(dir: &Path, max_depth: usize, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkBuilder::new(dir)
        .hidden(true)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .max_depth(Some(max_depth))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let matches = entry.file_name().to_str().is_some_and(|name| name.ends_with(suffix));
        if matches {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Discover all entities under `project_root`.
///
/// Excluded base names and the aggregator itself are dropped. Duplicates (the
/// same directory and base name reached through overlapping scan dirs) keep
/// their first position.
pub fn discover_entities(project_root: &Path, config: &GeneratorConfig) -> Result<Vec<Entity>> {
    let suffix = config.declaration_suffix();
    let mut seen: HashSet<(PathBuf, String)> = HashSet::new();
    let mut entities = Vec::new();

    for scan_dir in &config.scan_dirs {
        let dir = project_root.join(scan_dir);
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "Skipping scan dir (not found)");
            continue;
        }

        for path in walk_matching_files(&dir, config.max_depth, &suffix)? {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let base_name = &file_name[..file_name.len() - suffix.len()];
            if base_name.is_empty()
                || base_name == config.aggregator_name
                || config.exclude.contains(base_name)
            {
                debug!(file = file_name, "Excluded");
                continue;
            }
            let parent = path.parent().unwrap_or(project_root).to_path_buf();
            if !seen.insert((parent.clone(), base_name.to_string())) {
                continue;
            }

            entities.push(Entity::new(
                project_root,
                &parent,
                base_name,
                &config.entity_suffix,
                &config.declaration_ext,
                &config.implementation_ext,
            ));
        }
    }

    debug!(count = entities.len(), "Discovered entities");
    Ok(entities)
}
