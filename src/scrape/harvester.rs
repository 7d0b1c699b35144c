use crate::db::Repository;
use crate::error::Result;
use crate::models::{HarvestReport, RunState};

use super::extractor::extract_items;
use super::fetcher::PageFetcher;

/// Drives one harvest cycle: fetch each configured source in order,
/// extract candidate items, and persist them. One bad source never
/// blocks the rest; a storage failure aborts the whole cycle.
pub struct Harvester<'a> {
    repository: &'a Repository,
    fetcher: PageFetcher,
}

impl<'a> Harvester<'a> {
    pub fn new(repository: &'a Repository, fetcher: PageFetcher) -> Self {
        Self {
            repository,
            fetcher,
        }
    }

    pub async fn run(&self, sources: &[String]) -> Result<HarvestReport> {
        self.repository
            .record_run(RunState::Running, "Harvest in progress".to_string(), 0)
            .await?;

        let mut report = HarvestReport::default();
        for source in sources {
            tracing::info!("Harvesting {}", source);

            let html = match self.fetcher.fetch(source).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", source, e);
                    report.failed_sources.push(source.clone());
                    continue;
                }
            };

            let items = extract_items(source, &html);
            tracing::debug!("Extracted {} candidate items from {}", items.len(), source);

            let summary = match self.repository.insert_items(items).await {
                Ok(summary) => summary,
                Err(e) => {
                    // Storage failure is fatal for the cycle. Recording the
                    // failed run is best-effort against the same store.
                    let _ = self
                        .repository
                        .record_run(
                            RunState::Failed,
                            format!("Harvest failed: {}", e),
                            report.inserted as i64,
                        )
                        .await;
                    return Err(e);
                }
            };

            report.inserted += summary.inserted;
            report.skipped += summary.skipped;
            report.sources_ok += 1;
        }

        let message = format!(
            "Stored {} new items, skipped {} duplicates, {} of {} sources failed",
            report.inserted,
            report.skipped,
            report.failed_sources.len(),
            sources.len(),
        );
        self.repository
            .record_run(RunState::Completed, message, report.inserted as i64)
            .await?;

        Ok(report)
    }
}
