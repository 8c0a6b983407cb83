pub mod changes;
pub mod config;
pub mod encoder;
pub mod fetcher;
pub mod localizer;
pub mod model;
pub mod scanner;

use anyhow::{Context, Result};
use log::{info, warn};

pub use changes::list_changed_files;
pub use config::Config;
pub use encoder::{CommandEncoder, EncodeError, Encoder};
pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use localizer::{DocumentLocalizer, LocalizeError};
pub use model::{ChangeSet, ImageReference, LocalAsset, PipelineEvent, RewriteOutcome, RunSummary};

/// Builds a localizer backed by HTTP downloads and the configured encoder.
pub fn default_localizer(config: &Config) -> Result<DocumentLocalizer<HttpFetcher, CommandEncoder>> {
    let client = docimg_common::get_http_client()?;
    Ok(DocumentLocalizer::new(
        HttpFetcher::new(client),
        CommandEncoder::new(config.encoder.clone(), config.quality),
    ))
}

/// Rewrites every changed document in `changes`, one at a time in listing order.
///
/// Per-reference failures are absorbed by the localizer; only document I/O
/// errors abort the run.
pub async fn localize_changes<F, E, R>(
    config: &Config,
    localizer: &DocumentLocalizer<F, E>,
    changes: &ChangeSet,
    mut on_event: R,
) -> Result<RunSummary>
where
    F: Fetcher,
    E: Encoder,
    R: FnMut(PipelineEvent),
{
    let documents: Vec<_> = changes.documents(config).collect();
    info!(
        "{} of {} changed files are documents",
        documents.len(),
        changes.paths.len()
    );
    on_event(PipelineEvent::Started {
        total: documents.len(),
    });

    let mut summary = RunSummary::default();
    for relative in documents {
        let path = config.repo_root.join(relative);
        let present = tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check document: {}", path.display()))?;
        if !present {
            warn!("Skipping {}: not present in the working tree", relative.display());
            on_event(PipelineEvent::Missing(relative.clone()));
            continue;
        }

        on_event(PipelineEvent::Processing(relative.clone()));
        let outcome = localizer.rewrite_document(&path).await?;
        summary.documents_scanned += 1;
        summary.references_localized += outcome.localized();
        summary.references_failed += outcome.failed();
        if outcome.is_changed() {
            summary.documents_changed += 1;
            on_event(PipelineEvent::Updated(relative.clone()));
        }
        on_event(PipelineEvent::Finished(relative.clone()));
    }

    Ok(summary)
}

/// Lists changes against the configured baseline and localizes them.
pub async fn run<F, E, R>(
    config: &Config,
    localizer: &DocumentLocalizer<F, E>,
    on_event: R,
) -> Result<RunSummary>
where
    F: Fetcher,
    E: Encoder,
    R: FnMut(PipelineEvent),
{
    let changes = list_changed_files(&config.repo_root, &config.baseline).await?;
    localize_changes(config, localizer, &changes, on_event).await
}
