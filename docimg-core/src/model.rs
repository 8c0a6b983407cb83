use std::path::PathBuf;

/// Paths reported by `git diff --name-only`, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub paths: Vec<PathBuf>,
}

/// An inline image reference `![alt](url)` found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub alt: String,
    pub url: String,
    /// Full matched text, e.g. `![logo](https://host/logo.png)`.
    pub raw: String,
}

impl ImageReference {
    pub fn with_target(&self, target: &str) -> String {
        format!("![{}]({target})", self.alt)
    }
}

/// A re-encoded image stored beside its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAsset {
    /// Path on disk of the encoded file.
    pub path: PathBuf,
    /// Target to write into the document, relative to its directory.
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    Changed { localized: usize, failed: usize },
    Unchanged { failed: usize },
}

impl RewriteOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, RewriteOutcome::Changed { .. })
    }

    pub fn failed(&self) -> usize {
        match *self {
            RewriteOutcome::Changed { failed, .. } | RewriteOutcome::Unchanged { failed } => failed,
        }
    }

    pub fn localized(&self) -> usize {
        match *self {
            RewriteOutcome::Changed { localized, .. } => localized,
            RewriteOutcome::Unchanged { .. } => 0,
        }
    }
}

/// Progress notifications emitted while walking a change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Started { total: usize },
    Processing(PathBuf),
    Updated(PathBuf),
    Missing(PathBuf),
    Finished(PathBuf),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub documents_scanned: usize,
    pub documents_changed: usize,
    pub references_localized: usize,
    pub references_failed: usize,
}
