//! Non-fatal checks on loaded configuration.
use std::collections::HashSet;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "migrate.yaml").
    pub source: String,
    /// The specific entry that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Warning about `item` in the file named by `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: '{}': {}", self.source, self.item, self.message)
    }
}

/// Trait for configuration validators.
///
/// Validation never fails a load; it only reports entries that are likely
/// mistakes so the command can warn before it starts.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;
}

/// Warn about blank and repeated ignore patterns.
pub(super) fn check_patterns(source: &str, patterns: &[String]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    for pattern in patterns {
        if pattern.trim().is_empty() {
            warnings.push(ValidationWarning::new(
                source,
                pattern,
                "ignore pattern is empty",
            ));
        } else if !seen.insert(pattern.as_str()) {
            warnings.push(ValidationWarning::new(
                source,
                pattern,
                "duplicate ignore pattern",
            ));
        }
    }
    warnings
}
