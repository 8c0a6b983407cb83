use anyhow::Result;
use console::style;
use docimg_core::{Config, PipelineEvent, default_localizer};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    info!(
        "Localizing images in {} against {}",
        config.repo_root.display(),
        config.baseline
    );

    let localizer = default_localizer(&config)?;
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} documents")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let result = docimg_core::run(&config, &localizer, |event| match event {
        PipelineEvent::Started { total } => progress.set_length(total as u64),
        PipelineEvent::Processing(path) => progress.suspend(|| {
            println!("Processing {}", style(path.display()).cyan());
        }),
        PipelineEvent::Updated(path) => progress.suspend(|| {
            println!("{} {}", style("Updated images in").green(), path.display());
        }),
        PipelineEvent::Missing(_) | PipelineEvent::Finished(_) => progress.inc(1),
    })
    .await;
    progress.finish_and_clear();

    match result {
        Ok(summary) => {
            info!(
                "Done: {} documents scanned, {} updated, {} images localized, {} failed",
                summary.documents_scanned,
                summary.documents_changed,
                summary.references_localized,
                summary.references_failed
            );
            Ok(())
        }
        Err(e) => {
            error!("Image localization failed: {e:#}");
            Err(e)
        }
    }
}
