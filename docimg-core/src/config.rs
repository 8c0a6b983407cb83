use anyhow::{Context, Result, bail};
use glob::Pattern;
use std::path::PathBuf;

const DEFAULT_BASELINE: &str = "origin/main";
const DEFAULT_DOC_PATTERN: &str = "*.md";
const DEFAULT_ENCODER: &str = "cwebp";
const DEFAULT_QUALITY: u8 = 80;

#[derive(Debug, Clone)]
pub struct Config {
    pub repo_root: PathBuf,
    pub baseline: String,
    pub doc_pattern: Pattern,
    pub encoder: String,
    pub quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            baseline: DEFAULT_BASELINE.to_string(),
            doc_pattern: Pattern::new(DEFAULT_DOC_PATTERN).unwrap_or_default(),
            encoder: DEFAULT_ENCODER.to_string(),
            quality: DEFAULT_QUALITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for absent or blank keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let doc_pattern = match get("DOCIMG_DOC_PATTERN") {
            Some(raw) => Pattern::new(raw.trim())
                .with_context(|| format!("Invalid DOCIMG_DOC_PATTERN: {raw}"))?,
            None => defaults.doc_pattern,
        };

        let quality = match get("DOCIMG_QUALITY") {
            Some(raw) => {
                let value: u8 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid DOCIMG_QUALITY: {raw}"))?;
                if value > 100 {
                    bail!("DOCIMG_QUALITY must be between 0 and 100, got {value}");
                }
                value
            }
            None => defaults.quality,
        };

        Ok(Self {
            repo_root: get("DOCIMG_REPO_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.repo_root),
            baseline: get("DOCIMG_BASELINE").unwrap_or(defaults.baseline),
            doc_pattern,
            encoder: get("DOCIMG_ENCODER").unwrap_or(defaults.encoder),
            quality,
        })
    }

    pub fn is_document(&self, path: &std::path::Path) -> bool {
        self.doc_pattern.matches_path(path)
    }
}
