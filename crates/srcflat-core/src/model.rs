use crate::error::Error;
use glob::Pattern;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::error;

/// A directory classified as a source project during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCandidate {
    pub path: PathBuf,
    /// Path relative to the scan root, or the directory name when the root itself qualifies.
    pub label: String,
}

impl ProjectCandidate {
    pub fn new(path: &Path, root: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let label = if relative.as_os_str().is_empty() {
            base_name(path)
        } else {
            relative.display().to_string()
        };

        Self {
            path: path.to_path_buf(),
            label,
        }
    }

    /// The project directory's own name.
    pub fn name(&self) -> String {
        base_name(&self.path)
    }
}

impl fmt::Display for ProjectCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Target file suffix, always stored with its leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension(String);

impl Extension {
    /// Accepts `java` or `.java`.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim().trim_start_matches('.');
        if trimmed.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "extension must not be empty (got '{}')",
                raw
            )));
        }
        Ok(Self(format!(".{}", trimmed)))
    }

    pub fn suffix(&self) -> &str {
        &self.0
    }

    /// Case-sensitive suffix match on a file name.
    pub fn matches_name(&self, name: &str) -> bool {
        name.ends_with(&self.0)
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name.as_encoded_bytes().ends_with(self.0.as_bytes()))
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory names that prune discovery, matched as glob patterns against the base name.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let patterns = names
            .iter()
            .map(AsRef::as_ref)
            .filter_map(|name| match Pattern::new(name) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid exclude pattern '{}': {}", name, e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
