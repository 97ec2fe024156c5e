//! Merge strategies and customization detectors for Speck.
//!
//! Every function in this crate is pure: it receives the release ("source")
//! content and the project ("target") content, if any, and decides what
//! should end up on disk. Nothing here touches the filesystem.
//!
//! # Strategies
//!
//! | id | file | behaviour |
//! |----|------|-----------|
//! | [`MergeStrategyId::StructuredMarker`] | `AGENTS.md` | replace the region between `SPECK:START`/`SPECK:END` markers |
//! | [`MergeStrategyId::LineSet`] | `.gitignore` | append missing lines |
//! | [`MergeStrategyId::HookConfig`] | `.cursor/hooks.json` | deep merge with array union |
//! | [`MergeStrategyId::Precedence`] | `.cursor/mcp.json` | user entries win, never created |
//! | [`MergeStrategyId::PassThrough`] | examples | always copy |
//!
//! # Detectors
//!
//! Detectors answer "has the user diverged from the template?" for files
//! that are only written while they still look like the template.

pub mod detect;
pub mod hooks;
pub mod lines;
pub mod marker;
pub mod passthrough;
pub mod precedence;
pub mod result;
pub mod strategy;

pub use detect::{CustomizationDetector, DetectorId, DetectorRegistry};
pub use result::{MergeAction, MergeResult};
pub use strategy::{MergeRegistry, MergeStrategy, MergeStrategyId};
