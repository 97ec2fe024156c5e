use std::sync::LazyLock;

use regex::Regex;

use super::{CustomizationDetector, DetectorId};

/// A regular expression that only matches an active (uncommented) setup
/// step for one tool integration.
#[derive(Debug)]
pub struct SetupSignature {
    pub integration: &'static str,
    pub pattern: Regex,
}

fn signature(integration: &'static str, pattern: &str) -> SetupSignature {
    SetupSignature {
        integration,
        pattern: Regex::new(pattern).expect("Invalid setup signature regex"),
    }
}

static SIGNATURES: LazyLock<Vec<SetupSignature>> = LazyLock::new(|| {
    vec![
        signature("node", r"(?m)^[ \t]*-?[ \t]*uses:[ \t]*actions/setup-node@"),
        signature("python", r"(?m)^[ \t]*-?[ \t]*uses:[ \t]*actions/setup-python@"),
        signature("pnpm", r"(?m)^[ \t]*-?[ \t]*uses:[ \t]*pnpm/action-setup@"),
        signature("bun", r"(?m)^[ \t]*-?[ \t]*uses:[ \t]*oven-sh/setup-bun@"),
        signature("go", r"(?m)^[ \t]*-?[ \t]*uses:[ \t]*actions/setup-go@"),
        signature("rust", r"(?m)^[ \t]*-?[ \t]*uses:[ \t]*dtolnay/rust-toolchain@"),
        signature("java", r"(?m)^[ \t]*-?[ \t]*uses:[ \t]*actions/setup-java@"),
        signature("docker", r"(?m)^[ \t]*-?[ \t]*run:[ \t]*docker[ \t]+(build|compose)\b"),
    ]
});

/// Detects a setup-steps workflow where the user activated any of the
/// template's commented-out integration steps.
#[derive(Debug, Clone, Copy)]
pub struct SetupStepsDetector {
    signatures: &'static [SetupSignature],
}

impl SetupStepsDetector {
    pub fn new() -> Self {
        Self {
            signatures: SIGNATURES.as_slice(),
        }
    }

    /// Names of the integrations whose steps are active in `content`.
    pub fn active_integrations(&self, content: &str) -> Vec<&'static str> {
        self.signatures
            .iter()
            .filter(|sig| sig.pattern.is_match(content))
            .map(|sig| sig.integration)
            .collect()
    }
}

impl Default for SetupStepsDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomizationDetector for SetupStepsDetector {
    fn id(&self) -> DetectorId {
        DetectorId::SetupSteps
    }

    fn explain(&self, _source: &str, target: &str) -> Option<String> {
        let active = self.active_integrations(target);
        (!active.is_empty()).then(|| format!("setup steps enabled for {}", active.join(", ")))
    }
}
