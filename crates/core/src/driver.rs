//! Run orchestration: discovery, per-entity patching, then the aggregator.

use crate::config::GeneratorConfig;
use crate::discover::discover_entities;
use crate::error::{GenError, Result};
use crate::fields::extract_fields;
use crate::includes::complete_includes;
use crate::normalize::normalize_lines;
use crate::patch::{apply_patch, SourceFile};
use crate::synth;
use crate::types::{Entity, InvalidEntity, RunSummary, UpdateResult};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// One generator run over a project tree.
pub struct Generator {
    root: PathBuf,
    config: GeneratorConfig,
    dry_run: bool,
}

impl Generator {
    pub fn new(root: impl Into<PathBuf>, config: GeneratorConfig) -> Self {
        Self { root: root.into(), config, dry_run: false }
    }

    /// Compute every change without writing any file.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The aggregator's own entity, whose files must exist.
    pub fn aggregator(&self) -> Entity {
        Entity::new(
            &self.root,
            &self.root.join(&self.config.aggregator_dir),
            &self.config.aggregator_name,
            &self.config.entity_suffix,
            &self.config.declaration_ext,
            &self.config.implementation_ext,
        )
    }

    /// Regenerate the `memory_stats` method of one entity.
    pub fn update_entity(&self, entity: &Entity) -> Result<UpdateResult> {
        let declaration = SourceFile::read(&entity.declaration_path)?;
        let implementation = SourceFile::read(&entity.implementation_path)?;

        let normalized = normalize_lines(&declaration.lines);
        let fields = extract_fields(&normalized, &entity.class_ident, &self.config.field_kinds);
        let method = synth::entity_method(entity, &fields, &self.config);
        let marker = synth::entity_signature_marker(&self.config);

        let changed =
            apply_patch(&implementation, &implementation.lines, &marker, &method, self.dry_run)?;
        debug!(
            entity = entity.base_name.as_str(),
            fields = fields.len(),
            changed,
            "Entity processed"
        );
        Ok(UpdateResult { changed, fields_found: fields.len() })
    }

    /// Regenerate the aggregator method and its include list.
    ///
    /// `included` gets an include line each; `called` gets a call entry each.
    pub fn update_aggregator(
        &self,
        included: &[Entity],
        called: &[Entity],
    ) -> Result<UpdateResult> {
        let aggregator = self.aggregator();
        for path in [&aggregator.declaration_path, &aggregator.implementation_path] {
            if !path.is_file() {
                return Err(GenError::MissingAggregator { path: path.clone() });
            }
        }

        let implementation = SourceFile::read(&aggregator.implementation_path)?;
        let (lines, inserted) =
            complete_includes(&implementation.path, &implementation.lines, included)?;
        if inserted > 0 {
            debug!(inserted, "Added aggregator includes");
        }

        let method = synth::aggregator_method(called, &self.config);
        let marker = synth::aggregator_signature_marker(&self.config);
        let changed = apply_patch(&implementation, &lines, &marker, &method, self.dry_run)?;
        Ok(UpdateResult { changed, fields_found: called.len() })
    }

    /// Run the whole pipeline.
    ///
    /// Entities with a missing file are reported as invalid and skipped; every
    /// other error aborts the run before the aggregator is touched.
    pub fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();
        info!(root = %self.root.display(), dry_run = self.dry_run, "Scanning for entities");

        let entities = discover_entities(&self.root, &self.config)?;
        let mut summary = RunSummary {
            entities_found: entities.len(),
            dry_run: self.dry_run,
            ..RunSummary::default()
        };

        let mut valid = Vec::with_capacity(entities.len());
        for entity in &entities {
            match self.update_entity(entity) {
                Ok(result) => {
                    if result.changed {
                        summary.entities_updated += 1;
                    }
                    summary.total_fields += result.fields_found;
                    valid.push(entity.clone());
                }
                Err(e) if e.is_not_found() => {
                    warn!(entity = entity.base_name.as_str(), error = %e, "Invalid entity, skipping");
                    summary.invalid.push(InvalidEntity {
                        name: entity.base_name.clone(),
                        path: entity.dir.clone(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let aggregator = self.update_aggregator(&entities, &valid)?;
        summary.aggregator_changed = aggregator.changed;
        summary.aggregator_calls = aggregator.fields_found;

        info!(
            entities = summary.entities_found,
            updated = summary.entities_updated,
            fields = summary.total_fields,
            invalid = summary.invalid.len(),
            aggregator_changed = summary.aggregator_changed,
            time_ms = start.elapsed().as_millis() as u64,
            "Generation complete"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const AGGREGATOR_CPP: &str =
        "#include \"td/telegram/MemoryManager.h\"\n\nnamespace td {\n\n}  // namespace td\n";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scaffold_aggregator(root: &Path) {
        write(root, "td/telegram/MemoryManager.h", "class MemoryManager {\n};\n");
        write(root, "td/telegram/MemoryManager.cpp", AGGREGATOR_CPP);
    }

    #[test]
    fn missing_aggregator_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = Generator::new(tmp.path(), GeneratorConfig::new());
        let err = generator.run().unwrap_err();
        assert!(matches!(err, GenError::MissingAggregator { .. }), "got {err:?}");
    }

    #[test]
    fn entity_without_implementation_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        scaffold_aggregator(root);
        write(root, "td/telegram/LonelyManager.h", "class LonelyManager {\n  vector<int> ids_;\n};\n");

        let summary = Generator::new(root, GeneratorConfig::new()).run().unwrap();
        assert_eq!(summary.entities_found, 1);
        assert_eq!(summary.invalid.len(), 1);
        assert_eq!(summary.invalid[0].name, "Lonely");
        assert_eq!(summary.aggregator_calls, 0);

        // still included, not called
        let agg = fs::read_to_string(root.join("td/telegram/MemoryManager.cpp")).unwrap();
        assert!(agg.contains("#include \"td/telegram/LonelyManager.h\""));
        assert!(!agg.contains("lonely_manager_"));
    }

    #[test]
    fn unterminated_entity_block_aborts_run() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        scaffold_aggregator(root);
        write(root, "td/telegram/AlphaManager.h", "class AlphaManager {\n};\n");
        write(
            root,
            "td/telegram/AlphaManager.cpp",
            "namespace td {\nvoid AlphaManager::memory_stats(vector<string> &output) {\n}  // namespace td\n",
        );

        let err = Generator::new(root, GeneratorConfig::new()).run().unwrap_err();
        assert!(matches!(err, GenError::UnterminatedBlock { .. }), "got {err:?}");
        assert_eq!(
            fs::read_to_string(root.join("td/telegram/MemoryManager.cpp")).unwrap(),
            AGGREGATOR_CPP,
            "aggregator must not be written after a fatal error"
        );
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        scaffold_aggregator(root);
        write(root, "td/telegram/AlphaManager.h", "class AlphaManager {\n  vector<int> ids_;\n};\n");
        write(root, "td/telegram/AlphaManager.cpp", "namespace td {\n}  // namespace td\n");

        let summary = Generator::new(root, GeneratorConfig::new()).dry_run(true).run().unwrap();
        assert!(summary.dry_run);
        assert_eq!(summary.entities_updated, 1);
        assert!(summary.aggregator_changed);
        assert_eq!(
            fs::read_to_string(root.join("td/telegram/AlphaManager.cpp")).unwrap(),
            "namespace td {\n}  // namespace td\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("td/telegram/MemoryManager.cpp")).unwrap(),
            AGGREGATOR_CPP
        );
    }
}
