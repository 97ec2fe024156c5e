use super::{CustomizationDetector, DetectorId};

/// A changed first line (usually the document title) means the user
/// rewrote the document.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLineDetector;

fn first_line(content: &str) -> &str {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .next()
        .unwrap_or("")
        .trim_end()
}

impl CustomizationDetector for FirstLineDetector {
    fn id(&self) -> DetectorId {
        DetectorId::FirstLine
    }

    fn explain(&self, source: &str, target: &str) -> Option<String> {
        let ours = first_line(source);
        let theirs = first_line(target);
        (ours != theirs).then(|| format!("first line changed to {theirs:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Specs\nbody", "# Specs\nother body", false)]
    #[case("# Specs\n", "# Specs   \r\nmore", false)]
    #[case("# Specs\n", "\u{feff}# Specs\n", false)]
    #[case("# Specs\n", "# Our Product Specs\n", true)]
    #[case("# Specs\n", "", true)]
    fn compares_first_lines(#[case] source: &str, #[case] target: &str, #[case] customized: bool) {
        assert_eq!(FirstLineDetector.is_customized(source, target), customized);
    }
}
