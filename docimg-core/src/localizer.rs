use anyhow::{Context, Result};
use docimg_common::{ASSET_DIR_NAME, asset_file_name, local_target, url_digest};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::encoder::{EncodeError, Encoder};
use crate::fetcher::{FetchError, Fetcher};
use crate::model::{LocalAsset, RewriteOutcome};
use crate::scanner::qualifying_references;

#[derive(Debug, thiserror::Error)]
pub enum LocalizeError {
    #[error("failed to create asset directory {}: {source}", dir.display())]
    AssetDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Downloads remote images referenced by documents and rewrites the documents
/// to point at encoded local copies.
pub struct DocumentLocalizer<F, E> {
    fetcher: F,
    encoder: E,
}

impl<F: Fetcher, E: Encoder> DocumentLocalizer<F, E> {
    pub fn new(fetcher: F, encoder: E) -> Self {
        Self { fetcher, encoder }
    }

    /// Fetches `url` and encodes it into `asset_dir`.
    ///
    /// The temporary download `<hash>.download` is removed whether or not the
    /// conversion succeeds. Existing assets are re-fetched and overwritten.
    pub async fn localize_asset(
        &self,
        url: &str,
        asset_dir: &Path,
    ) -> Result<LocalAsset, LocalizeError> {
        let file_name = asset_file_name(url);
        let final_path = asset_dir.join(&file_name);
        let temp_path = asset_dir.join(format!("{}.download", url_digest(url)));

        fs::create_dir_all(asset_dir)
            .await
            .map_err(|source| LocalizeError::AssetDir {
                dir: asset_dir.to_path_buf(),
                source,
            })?;

        let had_asset = fs::try_exists(&final_path).await.unwrap_or(false);
        let result = self.fetch_and_encode(url, &temp_path, &final_path).await;
        remove_if_exists(&temp_path).await;

        match result {
            Ok(()) => Ok(LocalAsset {
                target: local_target(&file_name),
                path: final_path,
            }),
            Err(e) => {
                // partial encoder output; an asset from an earlier run stays
                if !had_asset {
                    remove_if_exists(&final_path).await;
                }
                Err(e)
            }
        }
    }

    async fn fetch_and_encode(
        &self,
        url: &str,
        temp_path: &Path,
        final_path: &Path,
    ) -> Result<(), LocalizeError> {
        self.fetcher.download(url, temp_path).await?;
        self.encoder.encode(temp_path, final_path).await?;
        Ok(())
    }

    /// Localizes every qualifying reference in the document at `path` and
    /// writes the document back if at least one target was replaced.
    pub async fn rewrite_document(&self, path: &Path) -> Result<RewriteOutcome> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read document: {}", path.display()))?;

        let references = qualifying_references(&content);
        if references.is_empty() {
            debug!("No qualifying image references in {}", path.display());
            return Ok(RewriteOutcome::Unchanged { failed: 0 });
        }

        let asset_dir = asset_dir_for(path);
        let mut updated = content;
        let mut localized = 0;
        let mut failed = 0;

        for reference in &references {
            match self.localize_asset(&reference.url, &asset_dir).await {
                Ok(asset) => {
                    debug!(
                        "{} -> {} ({})",
                        reference.url,
                        asset.target,
                        asset.path.display()
                    );
                    updated =
                        updated.replace(&reference.raw, &reference.with_target(&asset.target));
                    localized += 1;
                }
                Err(e) => {
                    warn!("Leaving {} unchanged in {}: {e}", reference.url, path.display());
                    failed += 1;
                }
            }
        }

        if localized == 0 {
            return Ok(RewriteOutcome::Unchanged { failed });
        }

        fs::write(path, updated)
            .await
            .with_context(|| format!("Failed to write document: {}", path.display()))?;
        info!(
            "Localized {localized} image(s) in {} ({failed} failed)",
            path.display()
        );
        Ok(RewriteOutcome::Changed { localized, failed })
    }
}

/// Directory holding the assets of the document at `path`.
pub fn asset_dir_for(path: &Path) -> PathBuf {
    path.parent()
        .unwrap_or_else(|| Path::new(""))
        .join(ASSET_DIR_NAME)
}

async fn remove_if_exists(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {}: {e}", path.display()),
    }
}
