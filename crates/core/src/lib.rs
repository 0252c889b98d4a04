//! memstats-gen core: keep generated `memory_stats` methods in sync with the
//! container members declared by every manager class of a C++ source tree.
//!
//! # Modules
//!
//! - [`discover`] - Find `*Manager.h` declaration files and derive entities
//! - [`normalize`] - Fold raw header lines into logical lines
//! - [`fields`] - Match container members inside the entity's class scope
//! - [`synth`] - Render the per-entity and aggregator methods
//! - [`patch`] - Replace the previously generated block of a source file
//! - [`includes`] - Keep the aggregator's include list complete
//! - [`naming`] - `PascalCase` to `snake_case`
//! - [`driver`] - Orchestrate a full run
//! - [`config`] - Conventions, exclusion set, field-kind table, `.memstats.toml`
//! - [`error`] - Error taxonomy
//! - [`types`] - Entities, update results, run summary

pub mod config;
pub mod discover;
pub mod driver;
pub mod error;
pub mod fields;
pub mod includes;
pub mod naming;
pub mod normalize;
pub mod patch;
pub mod synth;
pub mod types;

pub use config::{load_config, GeneratorConfig};
pub use driver::Generator;
pub use error::{GenError, Result};
pub use types::{Entity, InvalidEntity, RunSummary, UpdateResult};
