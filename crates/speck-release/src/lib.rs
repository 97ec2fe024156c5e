//! Release retrieval for Speck
//!
//! [`ReleaseProvider`] is the seam between the sync engine and wherever
//! methodology releases are published. [`GitHubReleases`] is the production
//! implementation.

pub mod error;
pub mod github;
pub mod provider;
pub mod release;

pub use error::{Error, Result};
pub use github::{GitHubConfig, GitHubReleases};
pub use provider::{ExtractedRelease, ReleaseProvider};
pub use release::{ChangelogEntry, Release, changelog_between};
