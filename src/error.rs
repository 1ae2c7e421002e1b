// Errors surfaced by manifest validation and rendering.

use std::fmt;
use thiserror::Error;

/// A problem attached to one attribute path of a manifest configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Attribute path, e.g. `metadata.name` or `spec.rules[0].host`. Empty for the whole config.
    pub path: String,
    pub summary: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            summary: summary.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.summary)
        } else {
            write!(f, "{}: {}", self.path, self.summary)
        }
    }
}

/// Non-empty list of diagnostics produced by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when some diagnostic is attached to `path`.
    #[cfg(test)]
    pub fn touches(&self, path: &str) -> bool {
        self.0.iter().any(|d| d.path == path)
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.iter().map(|d| format!("- {}", d)).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("unknown data source '{}'{}", .name, .suggestion.as_ref().map(|s| format!(", did you mean '{}'?", s)).unwrap_or_default())]
    UnknownDataSource {
        name: String,
        suggestion: Option<String>,
    },

    #[error("invalid configuration ({n} error(s)):\n{0}", n = .0.len())]
    Validation(Diagnostics),

    #[error("failed to serialize manifest: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

impl ManifestError {
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            ManifestError::Validation(d) => Some(d),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;
