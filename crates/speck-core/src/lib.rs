//! Sync engine for the Speck methodology
//!
//! This crate keeps a project directory aligned with an extracted
//! methodology release:
//!
//! - **Rules**: [`RuleTable`] classifies every release path into one
//!   [`Strategy`]
//! - **Release tree**: [`ReleaseTree`] holds the extracted release in memory
//! - **Smart sync**: [`SmartSync`] plans and applies a release, producing a
//!   [`SyncOutcome`]
//! - **Legacy sync**: [`LegacySync`] copies every non-ignored file
//! - **Version store**: [`VersionStore`] persists `.speck/VERSION`
//! - **Settings**: [`SettingsResolver`] layers defaults, the global config
//!   file and overrides
//!
//! ```text
//!                  speck-cli
//!                      |
//!                 speck-core
//!                  /       \
//!            speck-fs   speck-merge
//! ```

pub mod error;
pub mod legacy;
pub mod rules;
pub mod settings;
pub mod sync;
pub mod tree;
pub mod version;

pub use error::{Error, Result};
pub use legacy::{IgnoreList, LegacyPlan, LegacySync};
pub use rules::{PatternKind, Rule, RuleTable, RuleTableBuilder, Strategy};
pub use settings::{Settings, SettingsOverrides, SettingsResolver};
pub use sync::{
    FileError, FileWarning, Operation, PlannedStep, SmartSync, SyncOptions, SyncOutcome, SyncPlan,
};
pub use tree::{FileEntry, ReleaseTree};
pub use version::{VersionMarker, VersionStore};
