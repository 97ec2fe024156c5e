//! Customization detectors.
//!
//! A detector is only consulted when the project already has the file; an
//! absent file is never customized. A positive answer protects the file
//! from every later sync.

mod first_line;
mod setup_steps;

use std::fmt;

pub use first_line::FirstLineDetector;
pub use setup_steps::{SetupSignature, SetupStepsDetector};

/// Identifier of a customization detector, as referenced by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorId {
    /// Title line changed
    FirstLine,
    /// Setup steps were activated
    SetupSteps,
}

impl DetectorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstLine => "first-line",
            Self::SetupSteps => "setup-steps",
        }
    }
}

impl fmt::Display for DetectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether the project's copy of a file diverged from the template.
pub trait CustomizationDetector: Send + Sync {
    fn id(&self) -> DetectorId;

    /// Why `target` counts as customized, or `None` if it does not.
    fn explain(&self, source: &str, target: &str) -> Option<String>;

    fn is_customized(&self, source: &str, target: &str) -> bool {
        self.explain(source, target).is_some()
    }
}

/// Registry that resolves a [`DetectorId`] to its implementation.
pub struct DetectorRegistry {
    first_line: FirstLineDetector,
    setup_steps: SetupStepsDetector,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            first_line: FirstLineDetector,
            setup_steps: SetupStepsDetector::new(),
        }
    }

    pub fn get(&self, id: DetectorId) -> &dyn CustomizationDetector {
        match id {
            DetectorId::FirstLine => &self.first_line,
            DetectorId::SetupSteps => &self.setup_steps,
        }
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
