//! Test harness for end-to-end generator runs.
//!
//! Copies a fixture tree from `tests/fixtures/<name>` into a temp dir so every
//! test patches its own private copy.

#![allow(dead_code)]

use memstats_core::{Generator, GeneratorConfig, Result, RunSummary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestHarness {
    pub root: PathBuf,
    _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a harness from a named fixture directory.
    pub fn from_fixture(name: &str) -> Self {
        let fixture_src = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
        assert!(fixture_src.exists(), "Fixture '{name}' not found at {}", fixture_src.display());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let copied = copy_tree(&fixture_src, temp_dir.path());
        assert!(
            copied.iter().any(|p| p.extension().is_some_and(|ext| ext == "h")),
            "Fixture '{name}' has no declaration files"
        );

        TestHarness { root: temp_dir.path().to_path_buf(), _temp_dir: temp_dir }
    }

    /// Run the generator with the default conventions.
    pub fn run(&self) -> RunSummary {
        self.run_with(GeneratorConfig::new()).expect("Generator run failed")
    }

    pub fn run_with(&self, config: GeneratorConfig) -> Result<RunSummary> {
        Generator::new(&self.root, config).run()
    }

    pub fn dry_run_with(&self, config: GeneratorConfig) -> Result<RunSummary> {
        Generator::new(&self.root, config).dry_run(true).run()
    }

    /// Read a file of the fixture copy.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root.join(rel))
            .unwrap_or_else(|e| panic!("Could not read {rel}: {e}"))
    }

    pub fn write(&self, rel: &str, content: &str) {
        std::fs::write(self.root.join(rel), content)
            .unwrap_or_else(|e| panic!("Could not write {rel}: {e}"));
    }

    /// Snapshot of every file under the fixture root, sorted by path.
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        let mut files = Vec::new();
        collect(&self.root, &mut files);
        files.sort();
        files
    }
}

/// Copy the fixture's source tree into `dst`, returning the copied paths
/// relative to `dst`. Config files are left out so each test opts into one
/// explicitly.
fn copy_tree(src: &Path, dst: &Path) -> Vec<PathBuf> {
    let mut copied = Vec::new();
    let mut pending = vec![PathBuf::new()];
    while let Some(rel) = pending.pop() {
        std::fs::create_dir_all(dst.join(&rel)).expect("Failed to create dir");
        for entry in std::fs::read_dir(src.join(&rel)).expect("Failed to read fixture dir") {
            let entry = entry.expect("Failed to read entry");
            let child = rel.join(entry.file_name());
            if entry.path().is_dir() {
                pending.push(child);
            } else if entry.file_name() != memstats_core::config::CONFIG_FILE_NAME {
                std::fs::copy(entry.path(), dst.join(&child)).expect("Failed to copy file");
                copied.push(child);
            }
        }
    }
    copied
}

fn collect(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    for entry in std::fs::read_dir(dir).expect("Failed to read dir") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() {
            collect(&path, out);
        } else {
            let content = std::fs::read_to_string(&path).expect("Failed to read file");
            out.push((path, content));
        }
    }
}
