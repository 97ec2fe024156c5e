//! Shared test utilities for the speck workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`], a temporary directory builder with assertions
//! - [`faulty`]: [`FaultyFs`], a filesystem that fails for chosen paths

pub mod faulty;
pub mod tree;

pub use faulty::FaultyFs;
pub use tree::TestTree;
