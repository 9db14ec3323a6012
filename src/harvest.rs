use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::collectors::{
    BatchCollector, CollectorSettings, JobSource, SearchQuery, SearchSettings, StopReason,
};
use crate::error::AppError;
use crate::models::EnrichedPosting;
use crate::pipeline::{MergePolicy, OutcomeCounts, PostingPipeline};

/// Everything needed for one end-to-end run.
#[derive(Clone)]
pub struct Harvester {
    pub source: Arc<dyn JobSource>,
    pub search: SearchSettings,
    pub collector: CollectorSettings,
    pub policy: MergePolicy,
}

/// Result of a run that produced at least one posting.
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub collected: usize,
    pub pages_requested: u32,
    pub page_faults: u32,
    pub stop: StopReason,
    pub outcomes: OutcomeCounts,
    #[serde(skip)]
    pub postings: Vec<EnrichedPosting>,
}

impl Harvester {
    /// Collect, extract and filter. An empty result is `AppError::NoResults`.
    pub async fn run(&self, query: &SearchQuery, target: usize) -> Result<HarvestReport, AppError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("harvest", %run_id, search_term = %query.search_term);
        self.run_inner(run_id, query, target).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        query: &SearchQuery,
        target: usize,
    ) -> Result<HarvestReport, AppError> {
        let started_at = Utc::now();
        tracing::info!("Starting job search for term: {}", query.search_term);
        tracing::info!("Location: {}", self.search.location);
        tracing::info!(
            "Searching jobs posted in the last {} hours",
            self.search.hours_old
        );

        let collection = BatchCollector::new(
            self.source.clone(),
            self.search.clone(),
            self.collector.clone(),
        )
        .collect(query, target)
        .await;

        let collected = collection.postings.len();
        tracing::info!("Found {collected} total jobs ({:?})", collection.stop);

        let report = PostingPipeline::new(self.policy).process(collection.postings);
        let outcomes = report.counts();
        tracing::info!(
            kept = report.kept().count(),
            success = outcomes.success,
            degraded = outcomes.degraded,
            missing_description = outcomes.missing_description,
            no_summary = outcomes.no_summary,
            "Extraction finished"
        );

        let postings = report.into_kept();
        if postings.is_empty() {
            return Err(AppError::NoResults);
        }

        Ok(HarvestReport {
            run_id,
            started_at,
            collected,
            pages_requested: collection.pages_requested,
            page_faults: collection.page_faults,
            stop: collection.stop,
            outcomes,
            postings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::testing::{ScriptedSource, page_of};
    use crate::error::SourceError;
    use crate::models::{Merged, RawPosting};

    fn harvester(source: ScriptedSource) -> Harvester {
        Harvester {
            source: Arc::new(source),
            search: SearchSettings {
                sites: vec!["indeed".into()],
                location: "Nashville, TN".into(),
                country: "USA".into(),
                hours_old: 72,
                fetch_full_description: true,
            },
            collector: CollectorSettings::default(),
            policy: MergePolicy::default(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn collects_and_enriches_in_order() {
        let mut first = page_of(0, 2);
        first.push(RawPosting {
            title: Some("No description".into()),
            ..Default::default()
        });
        let source = ScriptedSource::new(vec![
            Ok(first),
            Err(SourceError::RateLimited),
            Ok(page_of(50, 1)),
        ]);

        let report = harvester(source)
            .run(&SearchQuery::new("Specialist"), 10)
            .await
            .unwrap();

        assert_eq!(report.collected, 4);
        assert_eq!(report.page_faults, 1);
        assert_eq!(report.stop, StopReason::Exhausted);
        assert_eq!(report.outcomes.missing_description, 1);

        let ids: Vec<_> = report
            .postings
            .iter()
            .map(|p| p.posting.id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["job-0", "job-1", "job-50"]);
        assert_eq!(
            report.postings[0].summary,
            Merged::Value("Specialist 0 supports our operations team.".into())
        );
        assert_eq!(report.postings[1].experience, Merged::Value("1 years".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_kept_is_no_results() {
        let source = ScriptedSource::new(vec![Ok(vec![RawPosting::default()])]);
        let err = harvester(source)
            .run(&SearchQuery::new("Specialist"), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoResults));
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_source_is_no_results_not_a_crash() {
        let err = harvester(ScriptedSource::failing())
            .run(&SearchQuery::new("Specialist"), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoResults));
    }
}
