//! Case-insensitive dependency-name wildcards (`Microsoft.*`, `*-sdk`)

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::warn;

/// A compiled set of name patterns
#[derive(Debug, Clone)]
pub struct NamePatterns {
    set: GlobSet,
    len: usize,
}

impl NamePatterns {
    /// Compile patterns. Patterns that fail to compile are matched literally.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for glob in patterns.iter().filter_map(|p| compile(p.as_ref())) {
            builder.add(glob);
        }
        let set = builder.build().unwrap_or_else(|e| {
            warn!("failed to build name pattern set: {}", e);
            GlobSet::empty()
        });
        Self {
            set,
            len: patterns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.set.is_match(name)
    }
}

/// Whether `name` matches a single wildcard pattern
pub fn wildcard_matches(pattern: &str, name: &str) -> bool {
    compile(pattern)
        .map(|glob| glob.compile_matcher().is_match(name))
        .unwrap_or_else(|| pattern.eq_ignore_ascii_case(name))
}

fn compile(pattern: &str) -> Option<Glob> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(false)
        .build()
        .or_else(|e| {
            warn!("invalid name pattern '{}': {}; matching literally", pattern, e);
            GlobBuilder::new(&globset::escape(pattern))
                .case_insensitive(true)
                .build()
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_matches() {
        assert!(wildcard_matches("Some.*", "Some.Package"));
        assert!(wildcard_matches("some.package", "Some.Package"));
        assert!(wildcard_matches("*", "Anything"));
        assert!(!wildcard_matches("Some.*", "Other.Package"));
        assert!(!wildcard_matches("Some.Package", "Some.Package.Extra"));
    }

    #[test]
    fn test_pattern_set() {
        let patterns = NamePatterns::new(&["Microsoft.*", "Newtonsoft.Json"]);
        assert!(!patterns.is_empty());
        assert!(patterns.is_match("microsoft.extensions.logging"));
        assert!(patterns.is_match("Newtonsoft.Json"));
        assert!(!patterns.is_match("Serilog"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let patterns = NamePatterns::new::<&str>(&[]);
        assert!(patterns.is_empty());
        assert!(!patterns.is_match("Some.Package"));
    }

    #[test]
    fn test_invalid_pattern_matches_literally() {
        assert!(wildcard_matches("Some[Package", "some[package"));
    }
}
